//! CLI library components for the survey chart generator.

pub mod logging;
pub mod pipeline;
pub mod summary;
pub mod types;
