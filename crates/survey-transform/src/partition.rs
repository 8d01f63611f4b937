use std::collections::HashSet;

use anyhow::{Context, Result};
use polars::prelude::*;
use survey_model::CaseInsensitiveSet;

/// Distinct non-null values of a recoded column, in first-seen order.
pub fn partitions(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let lookup = CaseInsensitiveSet::new(df.get_column_names_owned());
    let name = lookup
        .get(column)
        .with_context(|| format!("partition column {column} not found"))?;
    let values = df
        .column(name)?
        .str()
        .with_context(|| format!("partition column {name} must be recoded first"))?;

    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for value in values.into_iter().flatten() {
        if seen.insert(value) {
            ordered.push(value.to_string());
        }
    }
    Ok(ordered)
}
