//! Rewrite numeric response codes as codebook labels.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use polars::prelude::*;
use survey_model::{CaseInsensitiveSet, CodebookDomain, Codebooks, code_from_f64};

/// One column to recode and the codebook it draws labels from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecodeTarget {
    pub column: String,
    pub domain: CodebookDomain,
}

impl RecodeTarget {
    pub fn new(column: impl Into<String>, domain: CodebookDomain) -> Self {
        Self {
            column: column.into(),
            domain,
        }
    }
}

/// Return a copy of `df` with every target column replaced by a string
/// column of labels. Codes without a label become null; row count, row
/// order and all other columns are unchanged.
pub fn recode(df: &DataFrame, targets: &[RecodeTarget], codebooks: &Codebooks) -> Result<DataFrame> {
    let column_lookup = CaseInsensitiveSet::new(df.get_column_names_owned());
    let mut recoded = df.clone();

    for target in targets {
        let name = column_lookup
            .get(&target.column)
            .with_context(|| format!("column {} not found for recoding", target.column))?;
        let codebook = codebooks.get(target.domain);

        let numeric = df
            .column(name)?
            .cast(&DataType::Float64)
            .with_context(|| format!("column {name} is not numeric"))?;
        let codes = numeric.f64()?;

        let mut unmapped = BTreeSet::new();
        let labels: Vec<Option<&str>> = codes
            .into_iter()
            .map(|value| {
                let value = value?;
                let label = codebook.label_for_value(value);
                if label.is_none() {
                    let code = code_from_f64(value)
                        .map_or_else(|| value.to_string(), |code| code.to_string());
                    unmapped.insert(code);
                }
                label
            })
            .collect();

        if !unmapped.is_empty() {
            tracing::debug!(
                column = %name,
                codebook = %target.domain,
                codes = ?unmapped,
                "codes without a label recoded to null"
            );
        }
        recoded.with_column(Series::new(name.into(), labels))?;
    }

    Ok(recoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_model::Codebook;

    fn codebooks() -> Codebooks {
        Codebooks::new(
            Codebook::from_entries("country", [(2, "Angola"), (3, "Benin")]).unwrap(),
            Codebook::from_entries("problem", [(3, "Unemployment"), (9999, "Don't know")])
                .unwrap(),
        )
    }

    #[test]
    fn integer_columns_are_recoded_too() {
        let df = DataFrame::new(vec![
            Series::new("COUNTRY".into(), vec![Some(2i32), Some(3), None, Some(7)]).into(),
        ])
        .unwrap();
        let targets = [RecodeTarget::new("country", CodebookDomain::Country)];
        let out = recode(&df, &targets, &codebooks()).unwrap();
        let col = out.column("COUNTRY").unwrap().str().unwrap();
        assert_eq!(col.get(0), Some("Angola"));
        assert_eq!(col.get(1), Some("Benin"));
        assert_eq!(col.get(2), None);
        assert_eq!(col.get(3), None);
    }

    #[test]
    fn missing_target_column_is_an_error() {
        let df = DataFrame::new(vec![Series::new("Q45PT1".into(), vec![3.0]).into()]).unwrap();
        let targets = [RecodeTarget::new("Q45PT2", CodebookDomain::Problem)];
        let err = recode(&df, &targets, &codebooks()).unwrap_err();
        assert!(err.to_string().contains("Q45PT2"));
    }
}
