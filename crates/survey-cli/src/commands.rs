use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span};

use survey_cli::pipeline::{DEFAULT_OUTPUT_ROOT, RunOptions, run_pipeline};
use survey_cli::summary::{codebook_table, header_table, variables_table};
use survey_cli::types::RunResult;
use survey_ingest::describe_survey;
use survey_model::CodebookDomain;
use survey_standards::{ReportingStandards, SurveyConfig};

use crate::cli::{CodebookArgs, InspectArgs, RunArgs};

pub fn run_charts(args: &RunArgs) -> Result<RunResult> {
    let config = load_config(args.config.as_ref())?;
    let mut standards =
        ReportingStandards::from_config(&config).context("build reporting standards")?;
    if let Some(tie_break) = args.tie_break {
        standards.tie_break = tie_break.into();
    }
    let options = run_options(args, &config)?;
    info!(
        input = %options.input.display(),
        output_root = %options.output_root.display(),
        tie_break = %standards.tie_break,
        dry_run = options.dry_run,
        "starting run"
    );
    let start = Instant::now();
    let result = run_pipeline(&options, &standards)?;
    info!(
        charts = result.charts.len(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(result)
}

pub fn run_codebook(args: &CodebookArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let standards =
        ReportingStandards::from_config(&config).context("build reporting standards")?;
    let domain = CodebookDomain::from(args.domain);
    let codebook = standards.codebooks.get(domain);
    // Only problem labels are drawn as bars.
    let colors = match domain {
        CodebookDomain::Problem => Some(&standards.colors),
        CodebookDomain::Country => None,
    };
    println!("Codebook: {} ({} entries)", codebook.name(), codebook.len());
    println!("{}", codebook_table(codebook, colors));
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let span = info_span!("inspect", input = %args.input.display());
    let (metadata, rows) = span
        .in_scope(|| describe_survey(&args.input))
        .with_context(|| format!("inspect {}", args.input.display()))?;
    println!("{}", header_table(&metadata, rows));
    println!("{}", variables_table(&metadata.variables));
    for line in &metadata.documents {
        println!("{line}");
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<SurveyConfig> {
    match path {
        Some(path) => SurveyConfig::load(path)
            .with_context(|| format!("load config {}", path.display())),
        None => Ok(SurveyConfig::default()),
    }
}

/// CLI flags first, then the config file, then built-in defaults.
fn run_options(args: &RunArgs, config: &SurveyConfig) -> Result<RunOptions> {
    let input = args
        .input
        .clone()
        .or_else(|| config.input_path.clone())
        .ok_or_else(|| anyhow!("no input file: pass INPUT or set input_path in the config"))?;
    let output_root = args
        .output_dir
        .clone()
        .or_else(|| config.output_root.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_ROOT));
    Ok(RunOptions {
        input,
        output_root,
        dry_run: args.dry_run,
        nested: !args.no_nested,
        flat: !args.no_flat,
    })
}
