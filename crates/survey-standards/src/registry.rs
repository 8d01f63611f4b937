//! The codebooks, palette and variable list a run works from.

use survey_model::{AnalysisVariable, CodebookDomain, Codebooks, Color, ColorMap, TieBreak};

use crate::config::SurveyConfig;
use crate::error::{Result, StandardsError};
use crate::loaders::{load_codebook_csv, load_color_map_csv};
use crate::r9;

/// Immutable reporting configuration, built once per run.
#[derive(Debug, Clone)]
pub struct ReportingStandards {
    pub codebooks: Codebooks,
    pub colors: ColorMap,
    pub variables: Vec<AnalysisVariable>,
    pub tie_break: TieBreak,
    /// Column holding the partition codes.
    pub partition_column: String,
}

impl ReportingStandards {
    /// Round 9 codebooks, palette and Q45 variables.
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            codebooks: Codebooks::new(r9::country_codebook()?, r9::problem_codebook()?),
            colors: r9::color_map(),
            variables: r9::analysis_variables(),
            tie_break: TieBreak::default(),
            partition_column: r9::COUNTRY_COLUMN.to_string(),
        })
    }

    /// Built-in defaults overridden by whatever the config file provides.
    pub fn from_config(config: &SurveyConfig) -> Result<Self> {
        let mut standards = Self::builtin()?;

        let fallback = match &config.fallback_color {
            Some(value) => Color::from_hex(value)?,
            None => standards.colors.fallback(),
        };

        if let Some(path) = &config.country_codebook {
            standards.codebooks.country =
                load_codebook_csv(path, CodebookDomain::Country.as_str())?;
        }
        if let Some(path) = &config.problem_codebook {
            standards.codebooks.problem =
                load_codebook_csv(path, CodebookDomain::Problem.as_str())?;
        }
        match &config.color_map {
            Some(path) => standards.colors = load_color_map_csv(path, fallback)?,
            None => standards.colors.set_fallback(fallback),
        }
        if !config.variables.is_empty() {
            standards.variables = config.variables.clone();
        }
        if let Some(tie_break) = config.tie_break {
            standards.tie_break = tie_break;
        }

        if standards.variables.is_empty() {
            return Err(StandardsError::InvalidConfig {
                message: "no analysis variables".to_string(),
            });
        }
        if let Some(variable) = standards
            .variables
            .iter()
            .find(|variable| variable.name.eq_ignore_ascii_case(&standards.partition_column))
        {
            return Err(StandardsError::InvalidConfig {
                message: format!(
                    "variable {} is the partition column and cannot be charted",
                    variable.name
                ),
            });
        }
        Ok(standards)
    }

    /// Problem labels the palette does not cover; they render in the fallback color.
    pub fn uncovered_labels(&self) -> Vec<String> {
        self.colors.uncovered_labels(&self.codebooks.problem)
    }

    /// Column names the loader must find.
    pub fn required_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .variables
            .iter()
            .map(|variable| variable.name.to_ascii_uppercase())
            .collect();
        columns.push(self.partition_column.to_ascii_uppercase());
        columns
    }

    pub fn optional_columns(&self) -> Vec<String> {
        r9::OPTIONAL_COLUMNS.iter().map(ToString::to_string).collect()
    }
}
