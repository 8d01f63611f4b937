//! Survey table transformations.
//!
//! - **recode**: numeric codes → codebook labels
//! - **aggregate**: label counts → ordered percentage distributions
//! - **partition**: distinct partition values of a recoded column

pub mod aggregate;
pub mod partition;
pub mod recode;

pub use aggregate::{LabelOrder, RowFilter, distribution, distribution_with_denominator};
pub use partition::partitions;
pub use recode::{RecodeTarget, recode};
