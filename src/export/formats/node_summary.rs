use crate::reconcile::Reconciled;
use crate::summary::{
    collapsed_trait_counts, summarise_collapsed_node, CollapsedNodeSummary, NodeTraitCounts,
    TraitCounts,
};
use crate::tree::TipScan;
use serde::Serialize;
use std::collections::BTreeMap;

/// Collapsed-node descriptions for every tree of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeSummaryExport {
    pub node_summary_field: String,
    pub trees: BTreeMap<String, TreeNodeSummary>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeNodeSummary {
    pub collapsed_nodes: Vec<CollapsedNodeSummary>,
    /// Only nodes with more than one node-summary value.
    pub node_trait_counts: Vec<NodeTraitCounts>,
    /// Node-summary counts over the context sequences of the tree.
    pub context_trait_counts: Option<TraitCounts>,
}

impl NodeSummaryExport {
    pub fn build(
        scan: &TipScan,
        reconciled: &Reconciled,
        tree_counts: &BTreeMap<String, TraitCounts>,
        node_summary_field: &str,
        domestic_country: &str,
    ) -> Self {
        let mut trees = BTreeMap::new();
        for entry in &scan.trees {
            let collapsed_nodes = scan
                .inserted_node_membership
                .get(&entry.id)
                .into_iter()
                .flatten()
                .map(|(node, members)| summarise_collapsed_node(node, members, &reconciled.taxa))
                .collect();
            let summary = TreeNodeSummary {
                collapsed_nodes,
                node_trait_counts: collapsed_trait_counts(
                    &entry.id,
                    scan,
                    &reconciled.taxa,
                    node_summary_field,
                    domestic_country,
                ),
                context_trait_counts: tree_counts.get(&entry.id).cloned(),
            };
            trees.insert(entry.id.clone(), summary);
        }
        Self {
            node_summary_field: node_summary_field.to_string(),
            trees,
        }
    }
}
