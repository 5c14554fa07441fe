use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Error;

/// The four supported Customer Data Platforms, in fixed iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cdp {
    Segment,
    Mparticle,
    Lytics,
    Zeotap,
}

impl Cdp {
    pub const ALL: [Cdp; 4] = [Cdp::Segment, Cdp::Mparticle, Cdp::Lytics, Cdp::Zeotap];

    /// Lowercase key used for file names and query matching.
    pub fn key(self) -> &'static str {
        match self {
            Cdp::Segment => "segment",
            Cdp::Mparticle => "mparticle",
            Cdp::Lytics => "lytics",
            Cdp::Zeotap => "zeotap",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Cdp::Segment => "Segment",
            Cdp::Mparticle => "mParticle",
            Cdp::Lytics => "Lytics",
            Cdp::Zeotap => "Zeotap",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}_docs.json", self.key())
    }
}

impl fmt::Display for Cdp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Cdp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Cdp::ALL
            .into_iter()
            .find(|cdp| cdp.key() == lower)
            .ok_or_else(|| Error::UnknownCdp(s.to_string()))
    }
}

/// A stored unit of documentation text.
///
/// Missing, `null` and non-string fields deserialize as strings (empty, or the scalar's
/// text); display defaults are applied on read through [`Document::title_or_default`] and
/// [`Document::source_or_default`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    /// De-duplication key within a result set.
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
    /// e.g. "Segment", "mParticle"
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: String,
}

/// Accept any JSON value where a string is expected. Numbers and booleans keep their text;
/// `null`, arrays and objects become empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            source: source.into(),
        }
    }

    pub fn title_or_default(&self) -> &str {
        if self.title.is_empty() {
            "Untitled Document"
        } else {
            &self.title
        }
    }

    pub fn source_or_default(&self) -> &str {
        if self.source.is_empty() {
            "Unknown"
        } else {
            &self.source
        }
    }
}

/// One document list per CDP. Every CDP always has an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CdpDocs {
    pub segment: Vec<Document>,
    pub mparticle: Vec<Document>,
    pub lytics: Vec<Document>,
    pub zeotap: Vec<Document>,
}

impl CdpDocs {
    pub fn get(&self, cdp: Cdp) -> &[Document] {
        match cdp {
            Cdp::Segment => &self.segment,
            Cdp::Mparticle => &self.mparticle,
            Cdp::Lytics => &self.lytics,
            Cdp::Zeotap => &self.zeotap,
        }
    }

    pub fn get_mut(&mut self, cdp: Cdp) -> &mut Vec<Document> {
        match cdp {
            Cdp::Segment => &mut self.segment,
            Cdp::Mparticle => &mut self.mparticle,
            Cdp::Lytics => &mut self.lytics,
            Cdp::Zeotap => &mut self.zeotap,
        }
    }

    /// All documents, segment first, zeotap last.
    pub fn iter_all(&self) -> impl Iterator<Item = &Document> {
        Cdp::ALL.into_iter().flat_map(move |cdp| self.get(cdp).iter())
    }
}

/// What happened to one CDP's file during a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub outcomes: Vec<(Cdp, LoadOutcome)>,
}

impl LoadReport {
    pub fn outcome(&self, cdp: Cdp) -> Option<&LoadOutcome> {
        self.outcomes
            .iter()
            .find(|(c, _)| *c == cdp)
            .map(|(_, outcome)| outcome)
    }

    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, LoadOutcome::Failed(_)))
            .count()
    }
}
