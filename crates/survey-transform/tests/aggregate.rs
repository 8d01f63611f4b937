//! Tests for recoding and aggregation.

use polars::prelude::*;
use proptest::prelude::*;
use survey_model::{Codebook, CodebookDomain, Codebooks, TieBreak};
use survey_transform::{
    LabelOrder, RecodeTarget, RowFilter, distribution, distribution_with_denominator, partitions,
    recode,
};

fn codebooks() -> Codebooks {
    Codebooks::new(
        Codebook::from_entries("country", [(2, "Angola"), (3, "Benin"), (9, "Côte d'Ivoire")])
            .unwrap(),
        Codebook::from_entries(
            "problem",
            [
                (3, "Unemployment"),
                (4, "Poverty/Destitution"),
                (17, "Water supply"),
                (20, "Health"),
                (9999, "Don't know"),
            ],
        )
        .unwrap(),
    )
}

fn targets() -> Vec<RecodeTarget> {
    vec![
        RecodeTarget::new("Q45PT1", CodebookDomain::Problem),
        RecodeTarget::new("COUNTRY", CodebookDomain::Country),
    ]
}

fn recoded(country: Vec<Option<f64>>, q45: Vec<Option<f64>>) -> DataFrame {
    let df = DataFrame::new(vec![
        Series::new("COUNTRY".into(), country).into(),
        Series::new("Q45PT1".into(), q45).into(),
    ])
    .unwrap();
    recode(&df, &targets(), &codebooks()).unwrap()
}

fn code_order() -> LabelOrder {
    LabelOrder::new(TieBreak::CodeOrder, &codebooks().problem)
}

#[test]
fn angola_scenario() {
    let df = recoded(
        vec![Some(2.0), Some(2.0), Some(3.0)],
        vec![Some(3.0), Some(3.0), Some(9999.0)],
    );

    let global = distribution(&df, "Q45PT1", &RowFilter::All, &code_order()).unwrap();
    assert_eq!(
        global.rounded(2),
        vec![
            ("Unemployment".to_string(), 66.67),
            ("Don't know".to_string(), 33.33),
        ]
    );
    assert_eq!(global.partition, None);

    let angola = distribution(
        &df,
        "Q45PT1",
        &RowFilter::equals("COUNTRY", "Angola"),
        &code_order(),
    )
    .unwrap();
    assert_eq!(angola.rounded(2), vec![("Unemployment".to_string(), 100.0)]);
    assert_eq!(angola.partition.as_deref(), Some("Angola"));
    assert_eq!(angola.denominator, 2);
}

#[test]
fn unknown_codes_count_only_in_the_denominator() {
    let df = recoded(
        vec![Some(2.0), Some(2.0), Some(2.0), Some(2.0)],
        vec![Some(3.0), Some(9_999_999.0), None, Some(3.0)],
    );
    let q45 = df.column("Q45PT1").unwrap().str().unwrap();
    assert_eq!(q45.get(1), None);

    let dist = distribution(&df, "Q45PT1", &RowFilter::All, &code_order()).unwrap();
    assert_eq!(dist.denominator, 4);
    assert_eq!(dist.rounded(2), vec![("Unemployment".to_string(), 50.0)]);
    assert_eq!(dist.unlabelled_count(), 2);
}

#[test]
fn empty_partition_has_zero_denominator() {
    let df = recoded(vec![Some(2.0)], vec![Some(3.0)]);
    let dist = distribution(
        &df,
        "Q45PT1",
        &RowFilter::equals("COUNTRY", "Benin"),
        &code_order(),
    )
    .unwrap();
    assert!(dist.is_degenerate());
    assert!(dist.is_empty());
}

#[test]
fn ties_follow_code_order_or_first_seen() {
    let df = recoded(
        vec![Some(2.0); 4],
        vec![Some(20.0), Some(17.0), Some(4.0), Some(3.0)],
    );

    let by_code = distribution(&df, "Q45PT1", &RowFilter::All, &code_order()).unwrap();
    let labels: Vec<&str> = by_code.labels().collect();
    assert_eq!(
        labels,
        ["Unemployment", "Poverty/Destitution", "Water supply", "Health"]
    );

    let first_seen = distribution(&df, "Q45PT1", &RowFilter::All, &LabelOrder::FirstSeen).unwrap();
    let labels: Vec<&str> = first_seen.labels().collect();
    assert_eq!(
        labels,
        ["Health", "Water supply", "Poverty/Destitution", "Unemployment"]
    );
}

#[test]
fn unranked_labels_sort_after_ranked_ones() {
    let df = DataFrame::new(vec![
        Series::new("Q45PT1".into(), vec!["Other text", "Health", "Unemployment"]).into(),
    ])
    .unwrap();
    let dist = distribution(&df, "Q45PT1", &RowFilter::All, &code_order()).unwrap();
    let labels: Vec<&str> = dist.labels().collect();
    assert_eq!(labels, ["Unemployment", "Health", "Other text"]);
}

#[test]
fn explicit_denominator_overrides_row_count() {
    let df = recoded(vec![Some(2.0), Some(3.0)], vec![Some(3.0), Some(3.0)]);
    let dist =
        distribution_with_denominator(&df, "Q45PT1", &RowFilter::All, 8, &code_order()).unwrap();
    assert_eq!(dist.rounded(1), vec![("Unemployment".to_string(), 25.0)]);
}

#[test]
fn partitions_keep_first_seen_order_and_unicode() {
    let df = recoded(
        vec![Some(9.0), None, Some(2.0), Some(9.0), Some(77.0)],
        vec![Some(3.0); 5],
    );
    assert_eq!(
        partitions(&df, "COUNTRY").unwrap(),
        ["Côte d'Ivoire", "Angola"]
    );
}

#[test]
fn recoding_leaves_other_columns_untouched() {
    let df = DataFrame::new(vec![
        Series::new("COUNTRY".into(), vec![2.0, 3.0]).into(),
        Series::new("Q45PT1".into(), vec![3.0, 4.0]).into(),
        Series::new("URBRUR".into(), vec![1.0, 2.0]).into(),
    ])
    .unwrap();
    let out = recode(&df, &targets(), &codebooks()).unwrap();
    assert_eq!(out.height(), df.height());
    let urbrur: Vec<Option<f64>> = out
        .column("URBRUR")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(urbrur, vec![Some(1.0), Some(2.0)]);
    let country = out.column("COUNTRY").unwrap().str().unwrap();
    assert_eq!(country.get(1), Some("Benin"));
}

#[test]
fn distribution_summary_snapshot() {
    let df = recoded(
        vec![Some(2.0); 6],
        vec![
            Some(3.0),
            Some(9999.0),
            Some(3.0),
            Some(17.0),
            None,
            Some(3.0),
        ],
    );
    let dist = distribution(&df, "Q45PT1", &RowFilter::All, &code_order()).unwrap();
    let lines: Vec<String> = dist
        .entries
        .iter()
        .map(|entry| format!("{} {} {:.2}", entry.label, entry.count, entry.percentage))
        .collect();
    insta::assert_snapshot!(lines.join("\n"), @r"
    Unemployment 3 50.00
    Water supply 1 16.67
    Don't know 1 16.67
    ");
}

proptest! {
    #[test]
    fn percentages_are_bounded_and_ordered(codes in prop::collection::vec(
        prop::option::of(prop_oneof![Just(3.0), Just(4.0), Just(17.0), Just(20.0), Just(9999.0), Just(55.0)]),
        0..80,
    )) {
        let countries = vec![Some(2.0); codes.len()];
        let df = recoded(countries, codes.clone());
        let dist = distribution(&df, "Q45PT1", &RowFilter::All, &code_order()).unwrap();

        prop_assert_eq!(dist.denominator, codes.len());
        for entry in &dist.entries {
            prop_assert!(entry.percentage > 0.0 && entry.percentage <= 100.0);
        }
        for pair in dist.entries.windows(2) {
            prop_assert!(pair[0].percentage >= pair[1].percentage);
        }
        let labelled = codes
            .iter()
            .flatten()
            .filter(|code| **code != 55.0)
            .count();
        prop_assert_eq!(dist.labelled_count(), labelled);
        let total = dist.total_percentage();
        prop_assert!(total <= 100.0 + 1e-9);
        if !codes.is_empty() && labelled == codes.len() {
            prop_assert!((total - 100.0).abs() < 1e-9);
        }
    }
}
