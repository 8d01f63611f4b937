//! Load a `.sav` file into a column-selected DataFrame.

use std::path::{Path, PathBuf};

use polars::prelude::{Column, DataFrame};
use survey_model::CaseInsensitiveSet;
use survey_sav::{SavHeader, SavMetadata, SavReaderOptions, SavType, read_sav_with_metadata};

use crate::error::{IngestError, Result};

/// Dictionary facts about one loaded column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    /// Uppercased name used in the table.
    pub name: String,
    /// Spelling found in the file.
    pub source_name: String,
    pub label: Option<String>,
    pub numeric: bool,
    pub value_label_count: usize,
}

/// A loaded survey: selected columns plus their metadata.
#[derive(Debug, Clone)]
pub struct SurveyTable {
    pub data: DataFrame,
    pub columns: Vec<ColumnInfo>,
    pub header: SavHeader,
    pub source: PathBuf,
}

impl SurveyTable {
    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn column_info(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|info| info.name.eq_ignore_ascii_case(name))
    }
}

/// Load `path`, keeping `required` columns (error if absent) and whichever
/// `optional` columns exist. Columns are matched case-insensitively and
/// renamed to upper case, in the order requested.
pub fn load_survey(path: &Path, required: &[String], optional: &[String]) -> Result<SurveyTable> {
    let (df, metadata) =
        read_sav_with_metadata(path, SavReaderOptions::default()).map_err(|source| {
            IngestError::Load {
                path: path.to_path_buf(),
                source,
            }
        })?;
    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read sav file"
    );
    select_columns(path, &df, &metadata, required, optional)
}

/// Read only the dictionary-level description of a file.
pub fn describe_survey(path: &Path) -> Result<(SavMetadata, usize)> {
    let (df, metadata) =
        read_sav_with_metadata(path, SavReaderOptions::default()).map_err(|source| {
            IngestError::Load {
                path: path.to_path_buf(),
                source,
            }
        })?;
    Ok((metadata, df.height()))
}

fn select_columns(
    path: &Path,
    df: &DataFrame,
    metadata: &SavMetadata,
    required: &[String],
    optional: &[String],
) -> Result<SurveyTable> {
    let names = CaseInsensitiveSet::new(df.get_column_names_owned());

    let missing: Vec<String> = required
        .iter()
        .filter(|name| !names.contains(name))
        .map(|name| name.to_ascii_uppercase())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::Schema {
            path: path.to_path_buf(),
            missing,
        });
    }

    let mut columns: Vec<Column> = Vec::new();
    let mut infos = Vec::new();
    for wanted in required.iter().chain(optional) {
        let Some(actual) = names.get(wanted) else {
            tracing::debug!(column = %wanted, "optional column not present");
            continue;
        };
        let upper = wanted.to_ascii_uppercase();
        if infos.iter().any(|info: &ColumnInfo| info.name == upper) {
            continue;
        }
        let mut column = df.column(actual)?.clone();
        column.rename(upper.as_str().into());
        columns.push(column);

        let variable = metadata.variable(actual);
        infos.push(ColumnInfo {
            name: upper,
            source_name: actual.to_string(),
            label: variable.and_then(|var| var.label.clone()),
            numeric: variable.is_none_or(|var| matches!(var.var_type, SavType::Numeric)),
            value_label_count: variable.map_or(0, |var| var.value_labels.len()),
        });
    }

    let data = DataFrame::new(columns)?;
    Ok(SurveyTable {
        data,
        columns: infos,
        header: metadata.header.clone(),
        source: path.to_path_buf(),
    })
}
