//! Text processing for retrieval: cleanup, keyword extraction, extractive summaries.
//!
//! Everything here is a pure function over `&str`.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_MAX_KEYWORDS: usize = 10;
pub const DEFAULT_SUMMARY_SENTENCES: usize = 3;

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "is", "are", "was", "were", "be", "been", "being",
    "in", "on", "at", "to", "for", "with", "by", "about",
];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Anything that is not a word char, whitespace, or allowed punctuation.
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^\w\s.,;:?!()\[\]{}"'`-]"#).expect("valid regex"));

/// Sentence-ending punctuation followed by the whitespace run that separates sentences.
static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// Collapse whitespace, drop characters outside the allow-list, trim.
pub fn clean(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let collapsed = WHITESPACE.replace_all(text, " ");
    let stripped = DISALLOWED.replace_all(&collapsed, "");
    stripped.trim().to_string()
}

/// Strip characters outside the allow-list without touching whitespace runs.
pub fn strip_disallowed(text: &str) -> String {
    DISALLOWED.replace_all(text, "").trim().to_string()
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Most frequent non-stop-word tokens (longer than two chars), most frequent first.
///
/// Equal counts keep the order in which the words first appeared.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    let cleaned = clean(&text.to_lowercase());

    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for word in cleaned.split_whitespace() {
        if is_stop_word(word) || word.chars().count() <= 2 {
            continue;
        }
        match index.get(word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word.to_string(), counts.len());
                counts.push((word.to_string(), 1));
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(max_keywords)
        .map(|(word, _)| word)
        .collect()
}

/// Split after `.`, `!` or `?` wherever whitespace follows.
///
/// Trailing whitespace after the final punctuation yields a trailing empty segment.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK.find_iter(text) {
        // punctuation is a single ASCII byte
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&text[start..]);
    sentences
}

/// Greedy extractive summary of at most `max_sentences` sentences.
///
/// Sentences are scored on position (first/last), keyword hits and length, then emitted
/// in score order. Text that is already short enough comes back unchanged.
pub fn summarize(text: &str, max_sentences: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.len() <= max_sentences {
        return text.to_string();
    }

    let keywords: HashSet<String> = extract_keywords(text, DEFAULT_MAX_KEYWORDS)
        .into_iter()
        .collect();
    let last = sentences.len() - 1;

    let mut scored: Vec<(usize, &str)> = sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let mut score = 0;
            if i == 0 || i == last {
                score += 3;
            }
            let lower = sentence.to_lowercase();
            score += keywords
                .iter()
                .filter(|k| lower.contains(k.as_str()))
                .count();
            if sentence.split_whitespace().count() > 5 {
                score += 1;
            }
            (score, *sentence)
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(max_sentences)
        .map(|(_, sentence)| sentence)
        .collect::<Vec<_>>()
        .join(" ")
}
