//! Question-answering entries and datasets.
//!
//! A [`QuestionEntry`] is the generic record a downstream evaluator needs.
//! BBQ-specific fields live in [`BbqAnnotations`], attached as an optional
//! extension rather than a separate entry type.

use super::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Position of the choice, unique within its question
    pub index: usize,

    /// Display text
    pub text: String,
}

impl Choice {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.index, self.text)
    }
}

/// Type of the value an evaluator should expect back from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerType {
    /// Answer is a choice index
    #[default]
    Int,
    Float,
    Str,
}

/// BBQ metadata carried alongside a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BbqAnnotations {
    /// Index of the "not enough information" choice
    pub unknown_answer: usize,

    /// Row identifier in the source file (repeats across categories)
    pub example_id: i64,

    /// Whether the correct answer is the unknown choice
    pub correct_answer_unknown: bool,

    /// Category file the row was read from
    pub category: Category,

    /// `ambig` or `disambig`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_condition: Option<String>,

    /// `neg` or `nonneg`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_polarity: Option<String>,
}

impl BbqAnnotations {
    /// Build annotations, deriving `correct_answer_unknown`.
    pub fn new(
        correct_answer: usize,
        unknown_answer: usize,
        example_id: i64,
        category: Category,
    ) -> Self {
        Self {
            unknown_answer,
            example_id,
            correct_answer_unknown: correct_answer == unknown_answer,
            category,
            context_condition: None,
            question_polarity: None,
        }
    }
}

/// A single evaluable question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionEntry {
    /// Full question text (context and question joined)
    pub question: String,

    pub answer_type: AnswerType,

    /// Index of the correct choice
    pub correct_answer: usize,

    /// Choices in presentation order
    pub choices: Vec<Choice>,

    /// Present for entries loaded from BBQ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbq: Option<BbqAnnotations>,
}

impl QuestionEntry {
    /// Index of the unknown choice, if the entry carries BBQ annotations.
    pub fn unknown_answer(&self) -> Option<usize> {
        self.bbq.as_ref().map(|b| b.unknown_answer)
    }

    /// Look up a choice by its index.
    pub fn choice(&self, index: usize) -> Option<&Choice> {
        self.choices.iter().find(|c| c.index == index)
    }

    /// The correct choice.
    pub fn correct_choice(&self) -> Option<&Choice> {
        self.choice(self.correct_answer)
    }
}

/// Descriptive metadata for a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub name: String,
    pub description: String,
    pub author: String,
    pub source: String,
    pub group: String,
    pub version: String,
}

impl DatasetMetadata {
    /// Metadata of the published BBQ release.
    pub fn bbq() -> Self {
        Self {
            name: "The Bias Benchmark for QA (BBQ)".to_string(),
            description: "A dataset of question sets constructed by the authors that highlight \
                attested social biases against people belonging to protected classes along nine \
                social dimensions relevant for U.S. English-speaking contexts. Our task evaluates \
                model responses at two levels: (i) given an under-informative context, we test \
                how strongly responses reflect social biases, and (ii) given an adequately \
                informative context, we test whether the model's biases override a correct answer \
                choice. We find that models often rely on stereotypes when the context is \
                under-informative, meaning the model's outputs consistently reproduce harmful \
                biases in this setting. Though models are more accurate when the context provides \
                an informative answer, they still rely on stereotypes and average up to 3.4 \
                percentage points higher accuracy when the correct answer aligns with a social \
                bias than when it conflicts, with this difference widening to over 5 points on \
                examples targeting gender for most models tested."
                .to_string(),
            author: "Alicia Parrish and Angelica Chen and Nikita Nangia and Vishakh Padmakumar \
                and Jason Phang and Jana Thompson and Phu Mon Htut and Samuel R. Bowman."
                .to_string(),
            source: "https://github.com/nyu-mll/BBQ".to_string(),
            group: "The Machine Learning for Language Group at NYU CILVR".to_string(),
            version: "April 3rd, 2022".to_string(),
        }
    }
}

/// A loaded question-answering dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnsweringDataset {
    #[serde(flatten)]
    pub metadata: DatasetMetadata,

    /// Entries in source order
    pub questions: Vec<QuestionEntry>,
}

impl QuestionAnsweringDataset {
    pub fn new(metadata: DatasetMetadata, questions: Vec<QuestionEntry>) -> Self {
        Self {
            metadata,
            questions,
        }
    }

    /// Keep only the first `n` entries.
    pub fn truncate(&mut self, n: usize) {
        self.questions.truncate(n);
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(correct: usize, unknown: usize) -> QuestionEntry {
        QuestionEntry {
            question: "Who was forgetful?".to_string(),
            answer_type: AnswerType::Int,
            correct_answer: correct,
            choices: vec![
                Choice::new(0, "The grandfather"),
                Choice::new(1, "The grandson"),
                Choice::new(2, "Can't be determined"),
            ],
            bbq: Some(BbqAnnotations::new(correct, unknown, 7, Category::Age)),
        }
    }

    #[test]
    fn test_correct_answer_unknown_is_derived() {
        assert!(BbqAnnotations::new(2, 2, 1, Category::Age).correct_answer_unknown);
        assert!(!BbqAnnotations::new(0, 2, 1, Category::Age).correct_answer_unknown);
    }

    #[test]
    fn test_entry_lookups() {
        let e = entry(1, 2);
        assert_eq!(e.unknown_answer(), Some(2));
        assert_eq!(e.correct_choice().unwrap().text, "The grandson");
        assert!(e.choice(3).is_none());
        assert_eq!(e.choices[2].to_string(), "2: Can't be determined");
    }

    #[test]
    fn test_truncate() {
        let mut ds = QuestionAnsweringDataset::new(
            DatasetMetadata::bbq(),
            vec![entry(0, 2), entry(1, 2), entry(2, 2)],
        );
        ds.truncate(2);
        assert_eq!(ds.len(), 2);
        ds.truncate(10);
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_entry_serialization_omits_missing_extension() {
        let mut e = entry(0, 2);
        e.bbq = None;
        let json = serde_json::to_value(&e).unwrap();
        assert!(json.get("bbq").is_none());
        assert_eq!(json["answer_type"], "int");
    }
}
