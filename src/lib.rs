//! biasbench - Bias Benchmark for QA (BBQ) loading and prompt rendering.
//!
//! ## Architecture
//!
//! - **Dataset**: reads the per-category BBQ JSONL files and reshapes each
//!   row into a [`QuestionEntry`] with [`BbqAnnotations`]
//! - **Prompt**: renders an entry into an evaluation prompt through a
//!   [`PromptRenderer`] chosen at call time
//!
//! ## Entry invariants
//!
//! - Exactly three choices, indexed 0, 1 and 2
//! - Exactly one choice is the unknown answer; rows violating this are
//!   rejected with an error instead of being loaded

pub mod dataset;
pub mod models;
pub mod prompt;

// Re-exports for convenience
pub use dataset::{BbqLoader, DatasetTable, TableRow, fetch_bbq_dataset};
pub use models::{
    BbqAnnotations, BiasbenchError, Category, Choice, Config, QuestionAnsweringDataset,
    QuestionEntry, Result,
};
pub use prompt::{PromptRenderer, PromptStyle};
