//! Dataset module - BBQ loading and tabular export.

mod loader;
mod raw;
mod table;

pub use loader::*;
pub use raw::{IntField, RawRecord, UnknownLookup, clean_choice_text};
pub use table::*;
