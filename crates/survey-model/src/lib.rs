//! Data model shared by the survey reporting crates.
//!
//! Everything here is plain data: codebooks mapping response codes to labels,
//! the label color palette, analysis variable descriptors and the percentage
//! distributions produced by the aggregation step.

pub mod codebook;
pub mod color;
pub mod distribution;
pub mod error;
pub mod lookup;
pub mod ordering;
pub mod variable;

pub use codebook::{Codebook, CodebookDomain, Codebooks, code_from_f64};
pub use color::{Color, ColorMap, DEFAULT_FALLBACK_COLOR};
pub use distribution::{Distribution, DistributionEntry};
pub use error::{ModelError, Result};
pub use lookup::CaseInsensitiveSet;
pub use ordering::TieBreak;
pub use variable::AnalysisVariable;
