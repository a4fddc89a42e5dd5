//! Error types for biasbench.
//!
//! Taxonomy:
//! - Caller errors: bad parameters, bad configuration
//! - Data errors: source rows that break the entry invariants
//! - Infrastructure errors: file system failures

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for biasbench.
#[derive(Debug, Error)]
pub enum BiasbenchError {
    // ═══════════════════════════════════════════════════════════════════
    // CALLER: rejected before any data is read
    // ═══════════════════════════════════════════════════════════════════

    #[error("Configuration error: {0}")]
    Config(#[from] super::ConfigError),

    #[error("Invalid parameter: {value}. Expected one of ({allowed}).")]
    InvalidCategory { value: String, allowed: String },

    // ═══════════════════════════════════════════════════════════════════
    // DATA: a source row cannot become a valid entry
    // ═══════════════════════════════════════════════════════════════════

    #[error("Parse error in {} line {line}: {message}", .file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Invalid record in {} line {line}: {reason}", .file.display())]
    InvalidRecord {
        file: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("No choice is marked unknown in {} line {line}", .file.display())]
    MissingUnknownAnswer { file: PathBuf, line: usize },

    // ═══════════════════════════════════════════════════════════════════
    // INFRASTRUCTURE
    // ═══════════════════════════════════════════════════════════════════

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BiasbenchError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the error points at a specific row of a source file.
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::InvalidRecord { .. } | Self::MissingUnknownAnswer { .. }
        )
    }
}

/// Result type alias for biasbench.
pub type Result<T> = std::result::Result<T, BiasbenchError>;
