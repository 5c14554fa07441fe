//! Query classification helpers.

use std::fmt;
use std::str::FromStr;

use crate::docs::types::Cdp;
use crate::text;

/// Controls prompt phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryType {
    #[default]
    HowTo,
    Comparison,
    Advanced,
}

impl QueryType {
    pub const ALL: [QueryType; 3] = [QueryType::HowTo, QueryType::Comparison, QueryType::Advanced];

    pub fn label(self) -> &'static str {
        match self {
            QueryType::HowTo => "How-to Question",
            QueryType::Comparison => "Cross-CDP Comparison",
            QueryType::Advanced => "Advanced Configuration",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the full label or a short form (`how-to`, `comparison`, `advanced`).
/// Anything unrecognized is a how-to question.
impl FromStr for QueryType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Ok(match lower.as_str() {
            "cross-cdp comparison" | "comparison" | "compare" => QueryType::Comparison,
            "advanced configuration" | "advanced" => QueryType::Advanced,
            _ => QueryType::HowTo,
        })
    }
}

const CDP_ALIASES: [(Cdp, &[&str]); 4] = [
    (Cdp::Segment, &["segment", "segments"]),
    (Cdp::Mparticle, &["mparticle", "m particle", "m-particle"]),
    (Cdp::Lytics, &["lytics", "lytic"]),
    (Cdp::Zeotap, &["zeotap", "zeo tap", "zeo-tap"]),
];

const COMPARISON_WORDS: &[&str] = &[
    "compare", "comparison", "difference", "differences", "versus", "vs", "better", "best",
];

const ADVANCED_WORDS: &[&str] = &[
    "advanced", "configuration", "complex", "custom", "integrate", "integration", "setup",
    "implement", "implementation",
];

/// Drop characters outside the allowed punctuation set.
pub fn sanitize_query(query: &str) -> String {
    text::strip_disallowed(query)
}

/// First CDP (in fixed order) whose name or alias appears in the query.
pub fn detect_cdp(query: &str) -> Option<Cdp> {
    let lower = query.to_lowercase();
    CDP_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|a| lower.contains(a)))
        .map(|(cdp, _)| *cdp)
}

/// Guess the query type from trigger words. Substring matching, comparison first.
pub fn detect_query_type(query: &str) -> QueryType {
    let lower = query.to_lowercase();
    if COMPARISON_WORDS.iter().any(|w| lower.contains(w)) {
        QueryType::Comparison
    } else if ADVANCED_WORDS.iter().any(|w| lower.contains(w)) {
        QueryType::Advanced
    } else {
        QueryType::HowTo
    }
}

/// Sample questions per query type, optionally scoped to one CDP.
pub fn example_questions(cdp: Option<&str>) -> Vec<(QueryType, Vec<String>)> {
    let base: [[&str; 4]; 3] = [
        [
            "How do I set up a new source?",
            "How can I create a user profile?",
            "How do I build an audience segment?",
            "How can I integrate my data?",
        ],
        [
            "How does audience creation process compare?",
            "What are the differences in data collection?",
            "Compare user identification methods",
            "Which CDP has better data export capabilities?",
        ],
        [
            "How to implement server-side tracking?",
            "Advanced custom attribute mapping?",
            "Setting up real-time personalization?",
            "Configure multi-channel identity resolution?",
        ],
    ];

    // rows of `base` follow QueryType::ALL
    QueryType::ALL
        .into_iter()
        .zip(base)
        .map(|(query_type, questions)| {
            let questions = questions
                .iter()
                .map(|q| match cdp {
                    Some(cdp) => q.replace('?', &format!(" in {}?", cdp)),
                    None => q.to_string(),
                })
                .collect();
            (query_type, questions)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_type_parse() {
        assert_eq!("Cross-CDP Comparison".parse::<QueryType>().unwrap(), QueryType::Comparison);
        assert_eq!("advanced".parse::<QueryType>().unwrap(), QueryType::Advanced);
        assert_eq!("How-to Question".parse::<QueryType>().unwrap(), QueryType::HowTo);
        assert_eq!("something else".parse::<QueryType>().unwrap(), QueryType::HowTo);
        for qt in QueryType::ALL {
            assert_eq!(qt.label().parse::<QueryType>().unwrap(), qt);
        }
    }

    #[test]
    fn test_detect_cdp() {
        assert_eq!(detect_cdp("How do I use M-Particle identity?"), Some(Cdp::Mparticle));
        assert_eq!(detect_cdp("zeo tap audiences"), Some(Cdp::Zeotap));
        assert_eq!(detect_cdp("Segment vs Lytics"), Some(Cdp::Segment));
        assert_eq!(detect_cdp("What is a CDP?"), None);
    }

    #[test]
    fn test_detect_query_type() {
        assert_eq!(detect_query_type("Compare Segment and Lytics"), QueryType::Comparison);
        assert_eq!(detect_query_type("Which is best for setup?"), QueryType::Comparison);
        assert_eq!(detect_query_type("Custom attribute mapping"), QueryType::Advanced);
        assert_eq!(detect_query_type("How do I add a source?"), QueryType::HowTo);
    }

    #[test]
    fn test_sanitize_query() {
        assert_eq!(sanitize_query("  how <do> I #track?  "), "how do I track?");
    }

    #[test]
    fn test_example_questions_scoped() {
        let examples = example_questions(Some("Lytics"));
        assert_eq!(examples.len(), 3);
        assert_eq!(examples[0].0, QueryType::HowTo);
        assert_eq!(examples[0].1[0], "How do I set up a new source in Lytics?");
        assert_eq!(examples[1].1[2], "Compare user identification methods");

        let types: Vec<QueryType> = examples.iter().map(|(qt, _)| *qt).collect();
        assert_eq!(types, QueryType::ALL.to_vec());

        let plain = example_questions(None);
        assert_eq!(plain[2].1[1], "Advanced custom attribute mapping?");
    }
}
