use super::date_range;
use crate::export::Table;
use crate::reconcile::Reconciled;
use crate::record::{is_sentinel, NA};
use crate::tree::scanner::is_subtree_placeholder;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// Stand-in for the figure of a tree too large to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LargeTreeSummary {
    pub tree_name: String,
    pub tip_count: usize,
    pub query_count: usize,
    pub date_range: String,
    pub queries: Vec<String>,
    pub countries: BTreeSet<String>,
    pub subtrees: Vec<String>,
}

pub fn summarise_large_tree(tree: &str, tips: &[String], reconciled: &Reconciled) -> LargeTreeSummary {
    let queries: Vec<String> = reconciled
        .tree_to_queries
        .get(tree)
        .into_iter()
        .flatten()
        .filter_map(|name| reconciled.get(name))
        .map(|t| t.display_name.clone())
        .collect();

    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut countries = BTreeSet::new();
    let mut subtrees = Vec::new();
    for tip in tips {
        if is_subtree_placeholder(tip) {
            subtrees.push(tip.clone());
            continue;
        }
        if let Some(taxon) = reconciled.get(tip) {
            if !is_sentinel(&taxon.country) {
                countries.insert(taxon.country.clone());
            }
            dates.extend(taxon.sample_date);
        }
    }

    LargeTreeSummary {
        tree_name: tree.to_string(),
        tip_count: tips.len(),
        query_count: queries.len(),
        date_range: date_range(&dates, NA),
        queries,
        countries,
        subtrees,
    }
}

pub fn large_tree_table(summaries: &[LargeTreeSummary]) -> Table {
    let mut table = Table::new(
        "Tree name",
        [
            "Number of tips",
            "Number of queries",
            "Date range",
            "Queries present",
            "Countries present",
            "Subtrees present",
        ],
    );
    for summary in summaries {
        table.push_row(
            summary.tree_name.clone(),
            vec![
                summary.tip_count.to_string(),
                summary.query_count.to_string(),
                summary.date_range.clone(),
                summary.queries.join(", "),
                summary.countries.iter().cloned().collect::<Vec<_>>().join(", "),
                summary.subtrees.join(", "),
            ],
        );
    }
    table
}
