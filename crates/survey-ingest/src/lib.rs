//! Survey data ingestion.
//!
//! Loads SPSS system files through `survey-sav` and hands the pipeline a
//! polars `DataFrame` restricted to the columns it asked for.

pub mod error;
pub mod survey_table;

pub use error::{IngestError, Result};
pub use survey_table::{ColumnInfo, SurveyTable, describe_survey, load_survey};
