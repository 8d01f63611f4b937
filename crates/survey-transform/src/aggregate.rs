//! Count recoded labels and turn them into percentage distributions.

use std::cmp::Reverse;
use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use polars::prelude::*;
use survey_model::{CaseInsensitiveSet, Codebook, Distribution, TieBreak};

/// Rows a distribution is computed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    /// Every row (the whole-dataset pass).
    All,
    /// Rows whose `column` equals `value` (one partition).
    Equals { column: String, value: String },
}

impl RowFilter {
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    /// The partition value, if this filter selects one.
    pub fn partition(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Equals { value, .. } => Some(value),
        }
    }

    /// Apply the filter, returning the selected rows.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let Self::Equals { column, value } = self else {
            return Ok(df.clone());
        };
        let name = lookup_column(df, column)?;
        let values = df.column(&name)?.str().with_context(|| {
            format!("partition column {name} must hold labels")
        })?;
        let keep: Vec<bool> = values
            .into_iter()
            .map(|cell| cell == Some(value.as_str()))
            .collect();
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        Ok(df.filter(&mask)?)
    }
}

/// Resolved ordering for labels with equal counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LabelOrder {
    #[default]
    FirstSeen,
    /// Rank per label; unranked labels sort after ranked ones.
    Ranked(HashMap<String, i64>),
}

impl LabelOrder {
    /// Resolve a tie-break policy against the codebook the labels came from.
    pub fn new(tie_break: TieBreak, codebook: &Codebook) -> Self {
        match tie_break {
            TieBreak::FirstSeen => Self::FirstSeen,
            TieBreak::CodeOrder => Self::Ranked(codebook.label_ranks()),
        }
    }

    fn key(&self, label: &str) -> (u8, i64) {
        match self {
            Self::FirstSeen => (0, 0),
            Self::Ranked(ranks) => ranks.get(label).map_or((1, 0), |rank| (0, *rank)),
        }
    }
}

/// Distribution of `column` over the rows selected by `filter`, with the
/// selected row count (nulls included) as denominator.
pub fn distribution(
    df: &DataFrame,
    column: &str,
    filter: &RowFilter,
    order: &LabelOrder,
) -> Result<Distribution> {
    let rows = filter.apply(df)?;
    let denominator = rows.height();
    build_distribution(&rows, column, filter, denominator, order)
}

/// Like [`distribution`], with an explicit denominator.
pub fn distribution_with_denominator(
    df: &DataFrame,
    column: &str,
    filter: &RowFilter,
    denominator: usize,
    order: &LabelOrder,
) -> Result<Distribution> {
    let rows = filter.apply(df)?;
    build_distribution(&rows, column, filter, denominator, order)
}

fn build_distribution(
    rows: &DataFrame,
    column: &str,
    filter: &RowFilter,
    denominator: usize,
    order: &LabelOrder,
) -> Result<Distribution> {
    let name = lookup_column(rows, column)?;
    let mut counts = count_labels(rows, &name)?;
    counts.sort_by_key(|(label, count)| (Reverse(*count), order.key(label)));
    Ok(Distribution::from_counts(
        name,
        filter.partition().map(str::to_string),
        denominator,
        counts,
    ))
}

/// Non-null label counts in first-seen order.
fn count_labels(df: &DataFrame, column: &str) -> Result<Vec<(String, usize)>> {
    let values = df
        .column(column)?
        .str()
        .with_context(|| format!("column {column} must be recoded before aggregation"))?;
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for label in values.into_iter().flatten() {
        match index.get(label) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(label, counts.len());
                counts.push((label.to_string(), 1));
            }
        }
    }
    Ok(counts)
}

fn lookup_column(df: &DataFrame, column: &str) -> Result<String> {
    let lookup = CaseInsensitiveSet::new(df.get_column_names_owned());
    match lookup.get(column) {
        Some(name) => Ok(name.to_string()),
        None => bail!("column {column} not found"),
    }
}
