//! Integration tests for the chart pipeline.

use std::path::{Path, PathBuf};

use survey_cli::pipeline::{RunOptions, run_pipeline};
use survey_cli::summary::{summary_rows, summary_table};
use survey_cli::types::{ChartStatus, RunResult};
use survey_ingest::IngestError;
use survey_report::fonts_available;
use survey_sav::{SavDataset, SavValue, SavVariable, write_sav};
use survey_standards::ReportingStandards;
use tempfile::tempdir;

/// `(country, q45pt1)` rows; Q45PT2 and Q45PT3 are system-missing.
fn write_fixture(path: &Path, rows: &[(f64, f64)]) {
    let mut dataset = SavDataset::with_variables(vec![
        SavVariable::numeric("COUNTRY"),
        SavVariable::numeric("Q45PT1"),
        SavVariable::numeric("Q45PT2"),
        SavVariable::numeric("Q45PT3"),
        SavVariable::numeric("REGION"),
    ]);
    for (country, problem) in rows {
        dataset.add_row(vec![
            SavValue::numeric(*country),
            SavValue::numeric(*problem),
            SavValue::missing(),
            SavValue::missing(),
            SavValue::numeric(1.0),
        ]);
    }
    write_sav(path, &dataset).unwrap();
}

fn dry_run(input: &Path, output_root: &Path) -> RunResult {
    let mut options = RunOptions::new(input, output_root);
    options.dry_run = true;
    let standards = ReportingStandards::builtin().unwrap();
    run_pipeline(&options, &standards).unwrap()
}

fn planned_paths(result: &RunResult, variable: &str) -> Vec<PathBuf> {
    result
        .charts
        .iter()
        .filter(|chart| chart.variable == variable)
        .filter_map(|chart| match &chart.status {
            ChartStatus::Planned(path) => Some(path.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn dry_run_plans_every_layout_without_writing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("r9.sav");
    let output_root = dir.path().join("results");
    write_fixture(&input, &[(2.0, 3.0), (2.0, 3.0), (3.0, 9999.0)]);

    let result = dry_run(&input, &output_root);

    assert_eq!(result.rows, 3);
    assert_eq!(result.partitions, vec!["Angola", "Benin"]);
    assert!(!result.has_failures());
    assert_eq!(
        planned_paths(&result, "Q45PT1"),
        vec![
            output_root.join("Q45PT1_percentage_distribution.png"),
            output_root
                .join("Angola")
                .join("Q45PT1_percentage_distribution_Angola.png"),
            output_root.join("Q45PT1_Percentage_Angola.png"),
            output_root
                .join("Benin")
                .join("Q45PT1_percentage_distribution_Benin.png"),
            output_root.join("Q45PT1_Percentage_Benin.png"),
        ]
    );
    assert!(!output_root.exists());
}

#[test]
fn unanswered_variables_are_skipped_not_failed() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("r9.sav");
    write_fixture(&input, &[(2.0, 3.0), (2.0, 3.0), (3.0, 9999.0)]);

    let result = dry_run(&input, &dir.path().join("results"));

    insta::assert_debug_snapshot!(summary_rows(&result), @r#"
    [
        [
            "Q45PT1",
            "5",
            "0",
            "0",
        ],
        [
            "Q45PT2",
            "0",
            "5",
            "0",
        ],
        [
            "Q45PT3",
            "0",
            "5",
            "0",
        ],
        [
            "TOTAL",
            "5",
            "10",
            "0",
        ],
    ]
    "#);
}

#[test]
fn summary_table_labels_dry_runs() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("r9.sav");
    write_fixture(&input, &[(2.0, 3.0)]);

    let result = dry_run(&input, &dir.path().join("results"));
    let rendered = summary_table(&result).to_string();

    assert!(rendered.contains("Planned"));
    assert!(rendered.contains("First Most Important Problem"));
    assert!(rendered.contains("TOTAL"));
}

#[test]
fn unicode_partitions_keep_their_names() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("r9.sav");
    let output_root = dir.path().join("results");
    write_fixture(&input, &[(9.0, 3.0), (29.0, 9.0)]);

    let result = dry_run(&input, &output_root);

    assert_eq!(
        result.partitions,
        vec!["Côte d'Ivoire", "São Tomé and Príncipe"]
    );
    let paths = planned_paths(&result, "Q45PT1");
    assert!(paths.contains(
        &output_root
            .join("Côte d'Ivoire")
            .join("Q45PT1_percentage_distribution_Côte d'Ivoire.png")
    ));
    assert!(paths.contains(&output_root.join("Q45PT1_Percentage_São Tomé and Príncipe.png")));
}

#[test]
fn unmapped_countries_only_count_globally() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("r9.sav");
    write_fixture(&input, &[(2.0, 3.0), (99.0, 3.0)]);

    let result = dry_run(&input, &dir.path().join("results"));

    assert_eq!(result.partitions, vec!["Angola"]);
    assert_eq!(planned_paths(&result, "Q45PT1").len(), 3);
}

#[test]
fn disabled_layouts_are_not_planned() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("r9.sav");
    let output_root = dir.path().join("results");
    write_fixture(&input, &[(2.0, 3.0)]);

    let mut options = RunOptions::new(&input, &output_root);
    options.dry_run = true;
    options.flat = false;
    let standards = ReportingStandards::builtin().unwrap();
    let result = run_pipeline(&options, &standards).unwrap();

    assert_eq!(
        planned_paths(&result, "Q45PT1"),
        vec![
            output_root.join("Q45PT1_percentage_distribution.png"),
            output_root
                .join("Angola")
                .join("Q45PT1_percentage_distribution_Angola.png"),
        ]
    );
}

#[test]
fn missing_columns_abort_before_any_chart() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("partial.sav");
    let mut dataset = SavDataset::with_variables(vec![
        SavVariable::numeric("COUNTRY"),
        SavVariable::numeric("Q45PT1"),
    ]);
    dataset.add_row(vec![SavValue::numeric(2.0), SavValue::numeric(3.0)]);
    write_sav(&input, &dataset).unwrap();

    let options = RunOptions::new(&input, dir.path().join("results"));
    let standards = ReportingStandards::builtin().unwrap();
    let error = run_pipeline(&options, &standards).unwrap_err();

    match error.downcast_ref::<IngestError>() {
        Some(IngestError::Schema { missing, .. }) => {
            assert_eq!(missing, &vec!["Q45PT2".to_string(), "Q45PT3".to_string()]);
        }
        other => panic!("expected schema error, got {other:?}"),
    }
    assert!(!dir.path().join("results").exists());
}

#[test]
fn missing_input_is_a_load_error() {
    let dir = tempdir().unwrap();
    let options = RunOptions::new(dir.path().join("absent.sav"), dir.path().join("results"));
    let standards = ReportingStandards::builtin().unwrap();
    let error = run_pipeline(&options, &standards).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<IngestError>(),
        Some(IngestError::Load { .. })
    ));
}

#[test]
fn writes_every_chart() {
    if !fonts_available() {
        eprintln!("skipping: no sans-serif font installed");
        return;
    }
    let dir = tempdir().unwrap();
    let input = dir.path().join("r9.sav");
    let output_root = dir.path().join("results");
    write_fixture(&input, &[(2.0, 3.0), (2.0, 3.0), (3.0, 9999.0)]);

    let options = RunOptions::new(&input, &output_root);
    let standards = ReportingStandards::builtin().unwrap();
    let result = run_pipeline(&options, &standards).unwrap();

    assert!(!result.has_failures());
    for path in [
        output_root.join("Q45PT1_percentage_distribution.png"),
        output_root
            .join("Angola")
            .join("Q45PT1_percentage_distribution_Angola.png"),
        output_root.join("Q45PT1_Percentage_Benin.png"),
    ] {
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n", "{}", path.display());
    }
    assert!(!output_root.join("Q45PT2_percentage_distribution.png").exists());
}
