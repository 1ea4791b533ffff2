use super::collapsed::node_number;
use super::TraitCounts;
use crate::reconcile::Reconciled;
use crate::record::TaxonMap;
use crate::tree::TipScan;
use serde::Serialize;
use std::collections::BTreeMap;

const NODE_CHART_VALUES: usize = 10;

/// Node-summary counts for one collapsed node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeTraitCounts {
    pub node: String,
    pub counts: TraitCounts,
    /// More values were present than are kept in `counts`.
    pub hidden: bool,
}

/// Counts for every collapsed node of `tree` whose members carry more than
/// one node-summary value. At most ten values are kept per node; the
/// domestic country is always kept when summarising by country.
pub fn collapsed_trait_counts(
    tree: &str,
    scan: &TipScan,
    taxa: &TaxonMap,
    node_summary_field: &str,
    domestic_country: &str,
) -> Vec<NodeTraitCounts> {
    let Some(nodes) = scan.inserted_node_membership.get(tree) else {
        return Vec::new();
    };

    let mut described = Vec::new();
    for (node, members) in nodes {
        let counts = TraitCounts::from_values(
            members
                .iter()
                .filter_map(|m| taxa.get(m))
                .map(|t| t.node_summary.as_str()),
        );
        if counts.len() <= 1 {
            continue;
        }

        let hidden = counts.len() > NODE_CHART_VALUES;
        let kept = if hidden {
            let mut kept = counts.top(NODE_CHART_VALUES);
            let domestic = counts.get(domestic_country);
            if node_summary_field == "country" && domestic > 0 && kept.get(domestic_country) == 0 {
                kept.insert_count(domestic_country, domestic);
            }
            kept
        } else {
            counts
        };

        described.push(NodeTraitCounts {
            node: format!("Collapsed node {}", node_number(node)),
            counts: kept,
            hidden,
        });
    }
    described
}

/// Node-summary counts per tree over the context (non-query) sequences
/// placed directly in it.
pub fn tree_trait_counts(reconciled: &Reconciled) -> BTreeMap<String, TraitCounts> {
    let mut per_tree: BTreeMap<String, TraitCounts> = BTreeMap::new();
    for taxon in reconciled.taxa.values() {
        let Some(tree) = &taxon.tree else { continue };
        if taxon.query_id.is_some() {
            continue;
        }
        per_tree
            .entry(tree.clone())
            .or_default()
            .add(&taxon.node_summary);
    }
    per_tree
}
