//! Read-only aggregations over the reconciled records: collapsed-node
//! labels and tables, over-large tree summaries and trait counts.

mod collapsed;
mod large_tree;
mod traits;

pub use collapsed::{
    node_number, node_table, subtree_label, summarise_collapsed_node, CollapsedNodeSummary,
};
pub use large_tree::{large_tree_table, summarise_large_tree, LargeTreeSummary};
pub use traits::{collapsed_trait_counts, tree_trait_counts, NodeTraitCounts};

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Value counts kept in first-seen order, so ties rank the way the values
/// were met.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraitCounts {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl TraitCounts {
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts = Self::default();
        for value in values {
            counts.add(value.as_ref());
        }
        counts
    }

    pub fn add(&mut self, value: &str) {
        self.add_n(value, 1);
    }

    fn add_n(&mut self, value: &str, n: usize) {
        match self.index.get(value) {
            Some(&i) => self.counts[i].1 += n,
            None => {
                self.index.insert(value.to_string(), self.counts.len());
                self.counts.push((value.to_string(), n));
            }
        }
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, value: &str) -> usize {
        self.index.get(value).map(|&i| self.counts[i].1).unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(v, n)| (v.as_str(), *n))
    }

    /// Values by descending count; `limit` keeps only the first few.
    pub fn most_common(&self, limit: Option<usize>) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        ranked
    }

    /// Counts restricted to the top `limit` values, in rank order.
    pub fn top(&self, limit: usize) -> TraitCounts {
        let mut top = TraitCounts::default();
        for (value, n) in self.most_common(Some(limit)) {
            top.add_n(value, n);
        }
        top
    }

    pub(crate) fn insert_count(&mut self, value: &str, n: usize) {
        self.add_n(value, n);
    }
}

impl Serialize for TraitCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (value, n) in &self.counts {
            map.serialize_entry(value, n)?;
        }
        map.end()
    }
}

/// `"A (3), B (1)"`.
pub fn format_counts<'a>(counts: impl IntoIterator<Item = (&'a str, usize)>) -> String {
    counts
        .into_iter()
        .map(|(value, n)| format!("{} ({})", value, n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `"<min> to <max>"`, or `missing` when there are no dates.
pub fn date_range(dates: &[NaiveDate], missing: &str) -> String {
    match (dates.iter().min(), dates.iter().max()) {
        (Some(min), Some(max)) => format!("{} to {}", min, max),
        _ => missing.to_string(),
    }
}
