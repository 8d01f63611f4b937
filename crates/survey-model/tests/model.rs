use proptest::prelude::*;

use survey_model::{AnalysisVariable, Codebook, CodebookDomain, Distribution};

proptest! {
    #[test]
    fn percentages_stay_within_bounds(
        counts in prop::collection::vec(0usize..500, 0..12),
        unlabelled in 0usize..500,
    ) {
        let denominator: usize = counts.iter().sum::<usize>() + unlabelled;
        let pairs = counts
            .iter()
            .enumerate()
            .map(|(idx, count)| (format!("label-{idx}"), *count))
            .collect();
        let dist = Distribution::from_counts("Q45PT1", None, denominator, pairs);

        for entry in &dist.entries {
            prop_assert!(entry.percentage >= 0.0);
            prop_assert!(entry.percentage <= 100.0);
        }
        prop_assert!(dist.total_percentage() <= 100.0 + 1e-9);
        if denominator > 0 && unlabelled == 0 {
            prop_assert!((dist.total_percentage() - 100.0).abs() < 1e-9);
        }
    }
}

#[test]
fn partition_titles_name_the_country() {
    let variable = AnalysisVariable::new("Q45PT2", "Second Most Important Problem");
    assert_eq!(variable.domain, CodebookDomain::Problem);
    assert_eq!(
        variable.partition_title("Côte d'Ivoire"),
        "Second Most Important Problem in Côte d'Ivoire"
    );
}

#[test]
fn code_for_returns_smallest_code() {
    let codebook = Codebook::from_entries("problem", [(5, "Other"), (9995, "Other")]).unwrap();
    assert_eq!(codebook.code_for("Other"), Some(5));
    assert_eq!(codebook.code_for("Unknown"), None);
}
