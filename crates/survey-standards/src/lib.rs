#![deny(unsafe_code)]

//! Reporting standards: the built-in Round 9 codebooks and palette, TOML
//! run configuration and CSV loaders for replacement codebooks.

pub mod config;
pub mod error;
pub mod loaders;
pub mod r9;
pub mod registry;

pub use crate::config::SurveyConfig;
pub use crate::error::{Result, StandardsError};
pub use crate::loaders::{load_codebook_csv, load_color_map_csv};
pub use crate::registry::ReportingStandards;
