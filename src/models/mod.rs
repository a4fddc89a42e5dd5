//! Core data models for biasbench.

mod category;
mod config;
mod error;
mod question;

pub use category::*;
pub use config::*;
pub use error::*;
pub use question::*;
