use serde::{Deserialize, Serialize};

use crate::codebook::CodebookDomain;

/// A column analysed and charted by the reporting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisVariable {
    /// Column name, matched case-insensitively against the data file.
    pub name: String,
    /// Chart title for the whole-dataset chart.
    pub title: String,
    #[serde(default = "default_domain")]
    pub domain: CodebookDomain,
}

fn default_domain() -> CodebookDomain {
    CodebookDomain::Problem
}

impl AnalysisVariable {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            domain: CodebookDomain::Problem,
        }
    }

    /// Title of the chart drawn for one partition.
    pub fn partition_title(&self, partition: &str) -> String {
        format!("{} in {partition}", self.title)
    }
}
