use std::path::PathBuf;

/// What happened to one chart of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartStatus {
    Written(PathBuf),
    /// Dry run: the chart would have been written here.
    Planned(PathBuf),
    Skipped { reason: String },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOutcome {
    pub variable: String,
    /// `None` for the whole-dataset chart.
    pub partition: Option<String>,
    /// `global`, `nested` or `flat`.
    pub layout: &'static str,
    pub status: ChartStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSummary {
    pub variable: String,
    pub title: String,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub output_root: PathBuf,
    pub rows: usize,
    pub partitions: Vec<String>,
    pub dry_run: bool,
    pub variables: Vec<VariableSummary>,
    pub charts: Vec<ChartOutcome>,
}

impl RunResult {
    pub fn has_failures(&self) -> bool {
        self.variables.iter().any(|summary| summary.failed > 0)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ChartOutcome> {
        self.charts
            .iter()
            .filter(|chart| matches!(chart.status, ChartStatus::Failed { .. }))
    }
}
