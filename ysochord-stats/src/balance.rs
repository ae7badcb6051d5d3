//! Category Balance
//!
//! Label frequencies of one categorical column, the share of the largest
//! category, the max/min imbalance ratio, and rare-category detection. These
//! are the sample-size caveats that accompany every effect size.

use crate::error::{Result, StatsError};
use std::collections::BTreeMap;

/// Count of one label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    /// Category label
    pub label: String,
    /// Observations carrying it
    pub count: usize,
}

/// Frequency summary of a categorical column
#[derive(Debug, Clone)]
pub struct CategoryBalance {
    /// Number of observations
    pub total: usize,
    /// Label counts, most frequent first (ties by label)
    pub counts: Vec<CategoryCount>,
}

impl CategoryBalance {
    /// The most frequent category
    pub fn largest(&self) -> &CategoryCount {
        &self.counts[0]
    }

    /// The least frequent category
    pub fn smallest(&self) -> &CategoryCount {
        &self.counts[self.counts.len() - 1]
    }

    /// Percentage of observations in the largest category
    pub fn max_share(&self) -> f64 {
        100.0 * self.largest().count as f64 / self.total as f64
    }

    /// Largest count divided by smallest count
    pub fn imbalance_ratio(&self) -> f64 {
        self.largest().count as f64 / self.smallest().count as f64
    }

    /// Categories with fewer than `threshold` observations
    pub fn rare_categories(&self, threshold: usize) -> Vec<&CategoryCount> {
        self.counts.iter().filter(|c| c.count < threshold).collect()
    }

    /// Percentage of observations carrying `label`
    pub fn share_of(&self, label: &str) -> Option<f64> {
        self.counts
            .iter()
            .find(|c| c.label == label)
            .map(|c| 100.0 * c.count as f64 / self.total as f64)
    }
}

/// Count label frequencies
pub fn category_balance<S: AsRef<str>>(labels: &[S]) -> Result<CategoryBalance> {
    if labels.is_empty() {
        return Err(StatsError::EmptyInput("categorical column is empty"));
    }

    let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *tally.entry(label.as_ref()).or_default() += 1;
    }

    let mut counts: Vec<CategoryCount> = tally
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect();
    // BTreeMap order already sorts ties by label; the sort is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(CategoryBalance {
        total: labels.len(),
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yso_classes() -> Vec<&'static str> {
        let mut labels = Vec::new();
        labels.extend(std::iter::repeat_n("ClassII", 12757));
        labels.extend(std::iter::repeat_n("FS", 4070));
        labels.extend(std::iter::repeat_n("ClassI", 2089));
        labels.extend(std::iter::repeat_n("ClassIII", 1659));
        labels.extend(std::iter::repeat_n("uncertain", 79));
        labels
    }

    #[test]
    fn test_reference_distribution() {
        let balance = category_balance(&yso_classes()).unwrap();

        assert_eq!(balance.total, 20654);
        assert_eq!(balance.largest().label, "ClassII");
        assert_eq!(balance.smallest().label, "uncertain");
        assert!((balance.max_share() - 61.77).abs() < 0.01);
        assert!((balance.imbalance_ratio() - 161.48).abs() < 0.01);
    }

    #[test]
    fn test_rare_categories() {
        let balance = category_balance(&yso_classes()).unwrap();
        assert!(balance.rare_categories(30).is_empty());

        let rare = balance.rare_categories(100);
        assert_eq!(rare.len(), 1);
        assert_eq!(rare[0].label, "uncertain");
    }

    #[test]
    fn test_ties_sorted_by_label() {
        let balance = category_balance(&["b", "a", "c", "a", "b"]).unwrap();
        let labels: Vec<&str> = balance.counts.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
        assert_eq!(balance.share_of("c"), Some(20.0));
        assert_eq!(balance.share_of("z"), None);
    }

    #[test]
    fn test_empty_column() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            category_balance(&empty),
            Err(StatsError::EmptyInput(_))
        ));
    }
}
