//! Flat tabular view of a loaded dataset, indexed by example identifier.

use crate::models::{
    AnswerType, BiasbenchError, Category, Choice, QuestionAnsweringDataset, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// One entry with its BBQ annotations flattened into columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub example_id: i64,
    pub category: Category,
    pub question: String,
    pub answer_type: AnswerType,
    pub correct_answer: usize,
    pub choices: Vec<Choice>,
    pub unknown_answer: usize,
    pub correct_answer_unknown: bool,
}

/// Rows in dataset order plus an `example_id` index.
///
/// Identifiers restart in every category file, so one id can map to
/// several rows when more than one category is loaded.
#[derive(Debug, Clone, Default)]
pub struct DatasetTable {
    rows: Vec<TableRow>,
    by_example_id: HashMap<i64, Vec<usize>>,
}

impl DatasetTable {
    /// Build the table. Entries without BBQ annotations are skipped.
    pub fn from_dataset(dataset: &QuestionAnsweringDataset) -> Self {
        let mut table = Self::default();

        for entry in &dataset.questions {
            let Some(bbq) = &entry.bbq else {
                continue;
            };
            table
                .by_example_id
                .entry(bbq.example_id)
                .or_default()
                .push(table.rows.len());
            table.rows.push(TableRow {
                example_id: bbq.example_id,
                category: bbq.category,
                question: entry.question.clone(),
                answer_type: entry.answer_type,
                correct_answer: entry.correct_answer,
                choices: entry.choices.clone(),
                unknown_answer: bbq.unknown_answer,
                correct_answer_unknown: bbq.correct_answer_unknown,
            });
        }

        table
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every row with the given example id, in dataset order.
    pub fn get(&self, example_id: i64) -> impl Iterator<Item = &TableRow> {
        self.by_example_id
            .get(&example_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.rows[i])
    }

    /// The row for `example_id` within one category.
    pub fn get_in(&self, category: Category, example_id: i64) -> Option<&TableRow> {
        self.get(example_id).find(|r| r.category == category)
    }

    /// Write one JSON object per row.
    pub fn write_jsonl(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| BiasbenchError::io("creating output directory", e))?;
        }

        let file = File::create(path).map_err(|e| BiasbenchError::io("creating output file", e))?;
        let mut writer = BufWriter::new(file);

        for row in &self.rows {
            let json = serde_json::to_string(row).map_err(|e| {
                BiasbenchError::Internal(format!("Failed to serialize row: {}", e))
            })?;
            writeln!(writer, "{}", json).map_err(|e| BiasbenchError::io("writing output", e))?;
        }

        writer
            .flush()
            .map_err(|e| BiasbenchError::io("flushing output", e))?;

        info!(rows = self.rows.len(), path = %path.display(), "Exported dataset table");
        Ok(())
    }
}
