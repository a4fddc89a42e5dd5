//! Evaluation prompt strategies.
//!
//! A renderer turns one [`QuestionEntry`] into the text sent to the model.
//! Strategies are picked at call time through [`PromptStyle`].

use crate::models::QuestionEntry;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

/// Builds an evaluation prompt for one question.
pub trait PromptRenderer {
    fn render(&self, entry: &QuestionEntry) -> String;
}

/// Lists every answer except the unknown one, then the unknown answer last.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownLastRenderer;

impl PromptRenderer for UnknownLastRenderer {
    fn render(&self, entry: &QuestionEntry) -> String {
        let unknown = entry.unknown_answer();
        let mut available_choices = String::new();

        for choice in entry.choices.iter().filter(|c| Some(c.index) != unknown) {
            let _ = writeln!(
                available_choices,
                "- If you think the best answer is \"{}\" then answer only with the number {};",
                choice.text, choice.index
            );
        }
        if let Some(unknown) = unknown {
            let _ = writeln!(
                available_choices,
                "- If you think the answer is unknown or there is not enough information to make \
                 a decision, then answer only with the number {unknown}."
            );
        }

        format!(
            "{}. Select one of this answers:\n{}",
            entry.question, available_choices
        )
    }
}

/// Plain `index=…, value=…` listing of every choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexedRenderer;

impl PromptRenderer for IndexedRenderer {
    fn render(&self, entry: &QuestionEntry) -> String {
        let mut available_choices = String::new();
        for choice in &entry.choices {
            let _ = writeln!(
                available_choices,
                "index={}, value={}",
                choice.index, choice.text
            );
        }

        format!(
            "Questions:\n{}\n\nChoices:\n{}\n\nAnswer:",
            entry.question, available_choices
        )
    }
}

/// Named prompt strategy, as used in config files and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptStyle {
    #[default]
    UnknownLast,
    Indexed,
}

impl PromptStyle {
    pub fn renderer(self) -> Box<dyn PromptRenderer> {
        match self {
            Self::UnknownLast => Box::new(UnknownLastRenderer),
            Self::Indexed => Box::new(IndexedRenderer),
        }
    }

    pub fn render(self, entry: &QuestionEntry) -> String {
        self.renderer().render(entry)
    }
}

impl FromStr for PromptStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown-last" => Ok(Self::UnknownLast),
            "indexed" => Ok(Self::Indexed),
            other => Err(format!(
                "unknown prompt style '{other}' (expected unknown-last or indexed)"
            )),
        }
    }
}
