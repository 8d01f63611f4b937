//! Run stages: load, recode, partition, aggregate and render.
//!
//! Load and schema failures abort the run. Everything after that is per
//! chart: a chart that cannot be drawn is logged, recorded as failed and the
//! run moves on to the next one.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use survey_ingest::load_survey;
use survey_model::{AnalysisVariable, CodebookDomain, ColorMap, Distribution};
use survey_report::{
    ChartSpec, FlatLayout, NestedLayout, OutputLayout, global_chart_path, render_chart,
};
use survey_standards::ReportingStandards;
use survey_transform::{LabelOrder, RecodeTarget, RowFilter, distribution, partitions, recode};

use crate::types::{ChartOutcome, ChartStatus, RunResult, VariableSummary};

/// Default results directory when neither the CLI nor the config names one.
pub const DEFAULT_OUTPUT_ROOT: &str = "results";

/// Layout name recorded for whole-dataset charts.
pub const GLOBAL_LAYOUT: &str = "global";

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output_root: PathBuf,
    pub dry_run: bool,
    pub nested: bool,
    pub flat: bool,
}

impl RunOptions {
    pub fn new(input: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_root: output_root.into(),
            dry_run: false,
            nested: true,
            flat: true,
        }
    }

    /// Per-partition layouts enabled for this run.
    pub fn layouts(&self) -> Vec<Box<dyn OutputLayout>> {
        let mut layouts: Vec<Box<dyn OutputLayout>> = Vec::new();
        if self.nested {
            layouts.push(Box::new(NestedLayout));
        }
        if self.flat {
            layouts.push(Box::new(FlatLayout));
        }
        layouts
    }
}

/// Analysis variables plus the partition column, each with its codebook.
///
/// The partition column is recoded once, against the country codebook.
pub fn recode_targets(standards: &ReportingStandards) -> Vec<RecodeTarget> {
    let mut targets: Vec<RecodeTarget> = standards
        .variables
        .iter()
        .filter(|variable| !variable.name.eq_ignore_ascii_case(&standards.partition_column))
        .map(|variable| RecodeTarget::new(variable.name.to_ascii_uppercase(), variable.domain))
        .collect();
    targets.push(RecodeTarget::new(
        standards.partition_column.to_ascii_uppercase(),
        CodebookDomain::Country,
    ));
    targets
}

/// Load `input` and replace every targeted code with its label.
pub fn load_recoded(input: &Path, standards: &ReportingStandards) -> Result<DataFrame> {
    let ingest_span = info_span!("ingest", input = %input.display());
    let ingest_start = Instant::now();
    let table = ingest_span
        .in_scope(|| {
            load_survey(
                input,
                &standards.required_columns(),
                &standards.optional_columns(),
            )
        })
        .with_context(|| format!("load {}", input.display()))?;
    info!(
        rows = table.height(),
        columns = table.columns.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    let recode_span = info_span!("recode");
    let recode_start = Instant::now();
    let recoded = recode_span
        .in_scope(|| recode(&table.data, &recode_targets(standards), &standards.codebooks))
        .context("recode survey codes")?;
    info!(
        duration_ms = recode_start.elapsed().as_millis(),
        "recode complete"
    );
    Ok(recoded)
}

/// Full run over an already loaded standards registry.
pub fn run_pipeline(options: &RunOptions, standards: &ReportingStandards) -> Result<RunResult> {
    let run_span = info_span!("run", input = %options.input.display());
    let _run_guard = run_span.enter();

    let uncovered = standards.uncovered_labels();
    if !uncovered.is_empty() {
        debug!(labels = ?uncovered, "labels without a palette entry use the fallback color");
    }

    let recoded = load_recoded(&options.input, standards)?;
    let partition_values = partitions(&recoded, &standards.partition_column)
        .context("collect partition values")?;
    info!(partitions = partition_values.len(), "partitions found");

    let layouts = options.layouts();
    let mut variables = Vec::with_capacity(standards.variables.len());
    let mut charts = Vec::new();
    for variable in &standards.variables {
        let chart_span = info_span!("charts", variable = %variable.name);
        let chart_start = Instant::now();
        let outcomes = chart_span.in_scope(|| {
            chart_variable(
                &recoded,
                variable,
                &partition_values,
                standards,
                options,
                &layouts,
            )
        });
        let summary = summarize(variable, &outcomes);
        info!(
            variable = %variable.name,
            written = summary.written,
            skipped = summary.skipped,
            failed = summary.failed,
            duration_ms = chart_start.elapsed().as_millis(),
            "variable complete"
        );
        variables.push(summary);
        charts.extend(outcomes);
    }

    Ok(RunResult {
        input: options.input.clone(),
        output_root: options.output_root.clone(),
        rows: recoded.height(),
        partitions: partition_values,
        dry_run: options.dry_run,
        variables,
        charts,
    })
}

/// Whole-dataset chart, then one distribution per partition written through
/// every enabled layout.
pub fn chart_variable(
    df: &DataFrame,
    variable: &AnalysisVariable,
    partition_values: &[String],
    standards: &ReportingStandards,
    options: &RunOptions,
    layouts: &[Box<dyn OutputLayout>],
) -> Vec<ChartOutcome> {
    let column = variable.name.to_ascii_uppercase();
    let order = LabelOrder::new(
        standards.tie_break,
        standards.codebooks.get(variable.domain),
    );
    let mut outcomes = Vec::with_capacity(1 + partition_values.len() * layouts.len());

    let global = distribution(df, &column, &RowFilter::All, &order);
    let path = global_chart_path(&options.output_root, &column);
    let spec = ChartSpec::new(variable.title.clone());
    outcomes.push(match global {
        Ok(dist) => emit_chart(&spec, &dist, &standards.colors, path, GLOBAL_LAYOUT, options),
        Err(error) => failed(&column, None, GLOBAL_LAYOUT, &error),
    });

    for partition in partition_values {
        let filter = RowFilter::equals(&standards.partition_column, partition);
        let spec = ChartSpec::new(variable.partition_title(partition));
        match distribution(df, &column, &filter, &order) {
            Ok(dist) => {
                for layout in layouts {
                    let path = layout.chart_path(&options.output_root, &column, partition);
                    outcomes.push(emit_chart(
                        &spec,
                        &dist,
                        &standards.colors,
                        path,
                        layout.name(),
                        options,
                    ));
                }
            }
            Err(error) => {
                for layout in layouts {
                    outcomes.push(failed(&column, Some(partition), layout.name(), &error));
                }
            }
        }
    }
    outcomes
}

fn emit_chart(
    spec: &ChartSpec,
    dist: &Distribution,
    colors: &ColorMap,
    path: PathBuf,
    layout: &'static str,
    options: &RunOptions,
) -> ChartOutcome {
    let outcome = |status| ChartOutcome {
        variable: dist.variable.clone(),
        partition: dist.partition.clone(),
        layout,
        status,
    };
    let partition = dist.partition.as_deref().unwrap_or("");

    if dist.is_degenerate() {
        warn!(variable = %dist.variable, partition, layout, "partition has no rows, chart skipped");
        return outcome(ChartStatus::Skipped {
            reason: "no rows".to_string(),
        });
    }
    if dist.is_empty() {
        warn!(
            variable = %dist.variable,
            partition,
            layout,
            rows = dist.denominator,
            "no labelled responses, chart skipped"
        );
        return outcome(ChartStatus::Skipped {
            reason: "no labelled responses".to_string(),
        });
    }
    debug!(
        variable = %dist.variable,
        partition,
        bars = dist.len(),
        denominator = dist.denominator,
        total_percentage = dist.total_percentage(),
        "distribution computed"
    );
    if options.dry_run {
        return outcome(ChartStatus::Planned(path));
    }

    match render_chart(spec, dist, colors, &path) {
        Ok(()) => {
            let shown = std::path::absolute(&path).unwrap_or_else(|_| path.clone());
            match &dist.partition {
                Some(partition) => println!(
                    "Graph saved for {} in {partition} at: {}",
                    dist.variable,
                    shown.display()
                ),
                None => println!("Graph saved for {} at: {}", dist.variable, shown.display()),
            }
            info!(variable = %dist.variable, partition, layout, path = %shown.display(), "chart saved");
            outcome(ChartStatus::Written(path))
        }
        Err(error) => {
            warn!(
                variable = %dist.variable,
                partition,
                layout,
                error = %error,
                "chart not written"
            );
            outcome(ChartStatus::Failed {
                message: error.to_string(),
            })
        }
    }
}

fn failed(
    variable: &str,
    partition: Option<&String>,
    layout: &'static str,
    error: &anyhow::Error,
) -> ChartOutcome {
    warn!(
        variable,
        partition = partition.map_or("", String::as_str),
        layout,
        error = %error,
        "distribution failed"
    );
    ChartOutcome {
        variable: variable.to_string(),
        partition: partition.cloned(),
        layout,
        status: ChartStatus::Failed {
            message: format!("{error:#}"),
        },
    }
}

/// Count outcomes for one variable. Planned charts count as written.
pub fn summarize(variable: &AnalysisVariable, outcomes: &[ChartOutcome]) -> VariableSummary {
    let mut summary = VariableSummary {
        variable: variable.name.to_ascii_uppercase(),
        title: variable.title.clone(),
        ..VariableSummary::default()
    };
    for outcome in outcomes {
        match outcome.status {
            ChartStatus::Written(_) | ChartStatus::Planned(_) => summary.written += 1,
            ChartStatus::Skipped { .. } => summary.skipped += 1,
            ChartStatus::Failed { .. } => summary.failed += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_follow_flags() {
        let mut options = RunOptions::new("in.sav", "results");
        let names: Vec<_> = options.layouts().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["nested", "flat"]);

        options.nested = false;
        let names: Vec<_> = options.layouts().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["flat"]);

        options.flat = false;
        assert!(options.layouts().is_empty());
    }

    #[test]
    fn recode_targets_include_partition_column() {
        let standards = ReportingStandards::builtin().unwrap();
        let targets = recode_targets(&standards);
        let columns: Vec<_> = targets.iter().map(|t| t.column.as_str()).collect();
        assert_eq!(columns, vec!["Q45PT1", "Q45PT2", "Q45PT3", "COUNTRY"]);
        assert_eq!(targets[3].domain, CodebookDomain::Country);
        assert_eq!(targets[0].domain, CodebookDomain::Problem);
    }

    #[test]
    fn partition_column_is_recoded_once() {
        let mut standards = ReportingStandards::builtin().unwrap();
        let mut country = standards.variables[0].clone();
        country.name = "country".to_string();
        standards.variables.push(country);

        let targets = recode_targets(&standards);
        let columns: Vec<_> = targets.iter().map(|t| t.column.as_str()).collect();
        assert_eq!(columns, vec!["Q45PT1", "Q45PT2", "Q45PT3", "COUNTRY"]);
        assert_eq!(targets[3].domain, CodebookDomain::Country);
    }

    #[test]
    fn summary_counts_statuses() {
        let variable = AnalysisVariable::new("q45pt1", "First");
        let outcome = |status| ChartOutcome {
            variable: "Q45PT1".to_string(),
            partition: None,
            layout: GLOBAL_LAYOUT,
            status,
        };
        let outcomes = vec![
            outcome(ChartStatus::Written(PathBuf::from("a.png"))),
            outcome(ChartStatus::Planned(PathBuf::from("b.png"))),
            outcome(ChartStatus::Skipped {
                reason: "no rows".to_string(),
            }),
            outcome(ChartStatus::Failed {
                message: "boom".to_string(),
            }),
        ];
        let summary = summarize(&variable, &outcomes);
        assert_eq!(summary.variable, "Q45PT1");
        assert_eq!((summary.written, summary.skipped, summary.failed), (2, 1, 1));
    }
}
