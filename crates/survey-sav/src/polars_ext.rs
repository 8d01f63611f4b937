//! Polars DataFrame conversion.
//!
//! Numeric variables become `Float64` columns with system-missing as null,
//! string variables become `String` columns.

use std::path::Path;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use crate::error::Result;
use crate::reader::read_sav_with_options;
use crate::types::{SavDataset, SavHeader, SavReaderOptions, SavType, SavValue, SavVariable};

/// Dictionary information kept alongside a converted DataFrame.
#[derive(Debug, Clone, Default)]
pub struct SavMetadata {
    pub header: SavHeader,
    pub variables: Vec<SavVariable>,
    pub documents: Vec<String>,
    pub encoding: Option<String>,
}

impl SavMetadata {
    /// Look up a variable by name (case-insensitive).
    pub fn variable(&self, name: &str) -> Option<&SavVariable> {
        self.variables
            .iter()
            .find(|var| var.name.eq_ignore_ascii_case(name))
    }
}

/// Read a SAV file straight into a DataFrame.
pub fn read_sav_to_dataframe(path: &Path) -> Result<DataFrame> {
    let (df, _) = read_sav_with_metadata(path, SavReaderOptions::default())?;
    Ok(df)
}

/// Read a SAV file into a DataFrame and keep its dictionary.
pub fn read_sav_with_metadata(
    path: &Path,
    options: SavReaderOptions,
) -> Result<(DataFrame, SavMetadata)> {
    let dataset = read_sav_with_options(path, options)?;
    let df = dataset_to_dataframe(&dataset)?;
    let metadata = SavMetadata {
        header: dataset.header,
        variables: dataset.variables,
        documents: dataset.documents,
        encoding: dataset.encoding,
    };
    Ok((df, metadata))
}

/// Convert a dataset to a DataFrame, one column per variable.
pub fn dataset_to_dataframe(dataset: &SavDataset) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(dataset.variables.len());
    for (idx, variable) in dataset.variables.iter().enumerate() {
        let name = variable.name.as_str().into();
        let series = match variable.var_type {
            SavType::Numeric => {
                let values: Vec<Option<f64>> = dataset
                    .column_values(idx)
                    .map(|value| value.and_then(SavValue::as_f64))
                    .collect();
                Series::new(name, values)
            }
            SavType::String(_) => {
                let values: Vec<Option<String>> = dataset
                    .column_values(idx)
                    .map(|value| value.and_then(SavValue::as_str).map(str::to_string))
                    .collect();
                Series::new(name, values)
            }
        };
        columns.push(series.into_column());
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataType;

    #[test]
    fn numeric_and_string_columns_convert() {
        let mut dataset = SavDataset::with_variables(vec![
            SavVariable::numeric("COUNTRY"),
            SavVariable::string("REGION", 12),
        ]);
        dataset.add_row(vec![SavValue::numeric(2.0), SavValue::string("Luanda")]);
        dataset.add_row(vec![SavValue::missing(), SavValue::string("")]);

        let df = dataset_to_dataframe(&dataset).unwrap();
        assert_eq!(df.height(), 2);
        let country = df.column("COUNTRY").unwrap();
        assert_eq!(country.dtype(), &DataType::Float64);
        assert_eq!(country.null_count(), 1);
        assert_eq!(df.column("REGION").unwrap().dtype(), &DataType::String);
    }
}
