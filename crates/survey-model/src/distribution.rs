//! Percentage distributions of one analysis variable.

/// One bar of a distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionEntry {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Ordered label → percentage series for one (variable, partition) pair.
///
/// `denominator` is the number of rows in the partition, nulls included, so
/// the percentages add up to less than 100 whenever some rows had no label.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub variable: String,
    pub partition: Option<String>,
    pub denominator: usize,
    pub entries: Vec<DistributionEntry>,
}

impl Distribution {
    /// Build a distribution from already ordered `(label, count)` pairs.
    pub fn from_counts(
        variable: impl Into<String>,
        partition: Option<String>,
        denominator: usize,
        counts: Vec<(String, usize)>,
    ) -> Self {
        let entries = if denominator == 0 {
            Vec::new()
        } else {
            counts
                .into_iter()
                .map(|(label, count)| DistributionEntry {
                    percentage: 100.0 * count as f64 / denominator as f64,
                    label,
                    count,
                })
                .collect()
        };
        Self {
            variable: variable.into(),
            partition,
            denominator,
            entries,
        }
    }

    /// No rows in the partition; percentages are undefined.
    pub fn is_degenerate(&self) -> bool {
        self.denominator == 0
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Rows that carried a label.
    pub fn labelled_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// Rows counted in the denominator but not drawn.
    pub fn unlabelled_count(&self) -> usize {
        self.denominator.saturating_sub(self.labelled_count())
    }

    pub fn total_percentage(&self) -> f64 {
        self.entries.iter().map(|entry| entry.percentage).sum()
    }

    pub fn max_percentage(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| entry.percentage)
            .fold(0.0, f64::max)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }

    pub fn top(&self) -> Option<&DistributionEntry> {
        self.entries.first()
    }

    /// `(label, percentage)` pairs rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Vec<(String, f64)> {
        let factor = 10f64.powi(decimals as i32);
        self.entries
            .iter()
            .map(|entry| {
                (
                    entry.label.clone(),
                    (entry.percentage * factor).round() / factor,
                )
            })
            .collect()
    }
}
