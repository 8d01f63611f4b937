use std::path::PathBuf;

use polars::prelude::PolarsError;
use survey_sav::SavError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The file is missing, unreadable or not a supported `.sav`.
    #[error("failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: SavError,
    },

    /// Required columns absent after case-normalisation.
    #[error("{path} is missing required columns: {}", missing.join(", "))]
    Schema { path: PathBuf, missing: Vec<String> },

    #[error("failed to build survey table: {0}")]
    Frame(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
