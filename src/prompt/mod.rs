//! Prompt module - evaluation prompt rendering.

mod renderer;

pub use renderer::*;
