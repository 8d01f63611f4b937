//! TOML run configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use survey_model::{AnalysisVariable, TieBreak};

use crate::error::{Result, StandardsError};

/// Contents of a `--config` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveyConfig {
    pub input_path: Option<PathBuf>,
    pub output_root: Option<PathBuf>,
    pub country_codebook: Option<PathBuf>,
    pub problem_codebook: Option<PathBuf>,
    pub color_map: Option<PathBuf>,
    pub fallback_color: Option<String>,
    pub tie_break: Option<TieBreak>,
    #[serde(default)]
    pub variables: Vec<AnalysisVariable>,
}

impl SurveyConfig {
    /// Load a config file; relative paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let mut config: Self = toml::from_str(&text).map_err(|source| StandardsError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_relative_to(base);
        config.validate()?;
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for slot in [
            &mut self.input_path,
            &mut self.output_root,
            &mut self.country_codebook,
            &mut self.problem_codebook,
            &mut self.color_map,
        ] {
            if let Some(path) = slot.as_mut()
                && path.is_relative()
            {
                *path = base.join(&*path);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        for (idx, variable) in self.variables.iter().enumerate() {
            if variable.name.trim().is_empty() {
                return Err(StandardsError::InvalidConfig {
                    message: format!("variables[{idx}] has an empty name"),
                });
            }
            let duplicate = self.variables[..idx]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&variable.name));
            if duplicate {
                return Err(StandardsError::InvalidConfig {
                    message: format!("variable {} is listed twice", variable.name),
                });
            }
        }
        Ok(())
    }
}
