//! Where chart files are written.
//!
//! ```text
//! <root>/<VAR>_percentage_distribution.png
//! <root>/<Country>/<VAR>_percentage_distribution_<Country>.png   (nested)
//! <root>/<VAR>_Percentage_<Country>.png                          (flat)
//! ```

use std::path::{Path, PathBuf};

/// Maps a (variable, partition) pair to an output path.
pub trait OutputLayout {
    /// Short name used in logs and summaries.
    fn name(&self) -> &'static str;

    fn chart_path(&self, root: &Path, variable: &str, partition: &str) -> PathBuf;
}

/// One subdirectory per partition.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedLayout;

/// Every partition chart directly under the results root.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatLayout;

impl OutputLayout for NestedLayout {
    fn name(&self) -> &'static str {
        "nested"
    }

    fn chart_path(&self, root: &Path, variable: &str, partition: &str) -> PathBuf {
        let partition = path_component(partition);
        root.join(&partition)
            .join(format!("{variable}_percentage_distribution_{partition}.png"))
    }
}

impl OutputLayout for FlatLayout {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn chart_path(&self, root: &Path, variable: &str, partition: &str) -> PathBuf {
        let partition = path_component(partition);
        root.join(format!("{variable}_Percentage_{partition}.png"))
    }
}

/// Path of the whole-dataset chart.
pub fn global_chart_path(root: &Path, variable: &str) -> PathBuf {
    root.join(format!("{variable}_percentage_distribution.png"))
}

/// Make a partition value safe as one path component. Only separators
/// change; Unicode is kept as is.
pub fn path_component(value: &str) -> String {
    let replaced: String = value
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '-' } else { ch })
        .collect();
    match replaced.as_str() {
        "" => "_".to_string(),
        "." | ".." => replaced.replace('.', "_"),
        _ => replaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_become_dashes() {
        assert_eq!(path_component("Congo/Brazzaville"), "Congo-Brazzaville");
        assert_eq!(path_component(r"A\B"), "A-B");
        assert_eq!(path_component(".."), "__");
    }

    #[test]
    fn global_chart_sits_in_the_root() {
        assert_eq!(
            global_chart_path(Path::new("out"), "Q45PT1"),
            Path::new("out/Q45PT1_percentage_distribution.png")
        );
    }
}
