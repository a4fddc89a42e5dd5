//! Raw BBQ rows as they appear in the category JSONL files.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Number of answer fields per row (`ans0`..`ans2`).
pub const CHOICE_COUNT: usize = 3;

/// Tag marking the "not enough information" answer in `answer_info`.
const UNKNOWN_TAG: &str = "unknown";

/// One line of a BBQ category file.
///
/// Only the fields the loader reads are modeled; the rest are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub example_id: IntField,
    pub context: String,
    pub question: String,
    pub ans0: String,
    pub ans1: String,
    pub ans2: String,
    pub label: IntField,

    /// `ansN` -> descriptive tags, e.g. `["Can't be determined", "unknown"]`
    #[serde(default)]
    pub answer_info: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    pub context_condition: Option<String>,

    #[serde(default)]
    pub question_polarity: Option<String>,
}

/// An integer stored either as a JSON number or as decimal text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IntField {
    Number(i64),
    Text(String),
}

impl IntField {
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Ways `answer_info` can fail to name a single unknown choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnknownLookup {
    Found(usize),
    Missing,
    Ambiguous(Vec<usize>),
    BadKey(String),
}

impl RawRecord {
    /// Answer texts in index order.
    pub fn answers(&self) -> [&str; CHOICE_COUNT] {
        [&self.ans0, &self.ans1, &self.ans2]
    }

    /// Context and question joined into one line.
    pub fn question_text(&self) -> String {
        format!("{} {}", self.context.trim(), self.question.trim()).replace('\n', " ")
    }

    /// Find the choice whose `answer_info` tags contain the unknown marker.
    pub fn unknown_answer(&self) -> UnknownLookup {
        let mut found = Vec::new();

        for (key, tags) in &self.answer_info {
            if !has_unknown_tag(tags) {
                continue;
            }
            match choice_index_from_key(key) {
                Some(index) => found.push(index),
                None => return UnknownLookup::BadKey(key.clone()),
            }
        }

        match found.len() {
            0 => UnknownLookup::Missing,
            1 => UnknownLookup::Found(found[0]),
            _ => UnknownLookup::Ambiguous(found),
        }
    }
}

/// Trim whitespace, then drop one trailing period.
pub fn clean_choice_text(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
}

fn has_unknown_tag(tags: &serde_json::Value) -> bool {
    match tags {
        serde_json::Value::Array(items) => items.iter().any(|t| t.as_str() == Some(UNKNOWN_TAG)),
        serde_json::Value::String(s) => s.contains(UNKNOWN_TAG),
        _ => false,
    }
}

/// `ans2` -> 2. The index is the key's final character.
fn choice_index_from_key(key: &str) -> Option<usize> {
    let index = key.chars().last()?.to_digit(10)? as usize;
    (index < CHOICE_COUNT).then_some(index)
}
