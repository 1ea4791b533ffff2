use super::{date_range, format_counts, TraitCounts};
use crate::export::Table;
use crate::record::{is_sentinel, TaxonMap};
use crate::tree::scanner::{is_subtree_placeholder, TipScan};
use chrono::NaiveDate;
use serde::Serialize;

const COLLAPSED_PREFIX: &str = "inserted_node";
const LABEL_TOP_VALUES: usize = 5;

/// `inserted_node12` → `12`.
pub fn node_number(node: &str) -> &str {
    node.strip_prefix(COLLAPSED_PREFIX).unwrap_or(node)
}

/// `subtree_3` → `Tree 3`.
pub fn subtree_label(placeholder: &str) -> String {
    let number = placeholder.rsplit('_').next().unwrap_or(placeholder);
    format!("Tree {}", number)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollapsedNodeSummary {
    pub node: String,
    /// Tip label for the collapsed node.
    pub label: String,
    pub member_count: usize,
    pub trait_counts: TraitCounts,
    pub subtrees: Vec<String>,
}

/// Describe a collapsed node by the node-summary trait of its members,
/// e.g. `Collapsed node 4: 12 nodes in UK, Spain and Tree 2`.
pub fn summarise_collapsed_node(node: &str, members: &[String], taxa: &TaxonMap) -> CollapsedNodeSummary {
    let mut trait_counts = TraitCounts::default();
    let mut subtrees = Vec::new();

    for member in members {
        if let Some(taxon) = taxa.get(member) {
            if !is_sentinel(&taxon.node_summary) {
                trait_counts.add(&taxon.node_summary);
            }
        } else if is_subtree_placeholder(member) {
            subtrees.push(subtree_label(member));
        }
    }

    let values: Vec<&str> = if trait_counts.len() > LABEL_TOP_VALUES {
        trait_counts
            .most_common(Some(LABEL_TOP_VALUES))
            .into_iter()
            .map(|(v, _)| v)
            .collect()
    } else {
        trait_counts.iter().map(|(v, _)| v).collect()
    };
    let mut described = values.join(", ");
    let remaining = trait_counts.len().saturating_sub(LABEL_TOP_VALUES);
    if remaining == 1 {
        described.push_str(" and 1 other");
    } else if remaining > 1 {
        described.push_str(&format!(" and {} others", remaining));
    }

    let mut label = format!("Collapsed node {}: {} nodes", node_number(node), members.len());
    if !described.is_empty() {
        label.push_str(" in ");
        label.push_str(&described);
    }
    if !subtrees.is_empty() {
        label.push_str(if described.is_empty() { " in " } else { " and " });
        label.push_str(&subtrees.join(", "));
    }

    CollapsedNodeSummary {
        node: node.to_string(),
        label,
        member_count: members.len(),
        trait_counts,
        subtrees,
    }
}

/// One row per collapsed node of `tree`: whether the domestic country is
/// represented, size, date range, leading countries and admin-2 counts.
pub fn node_table(tree: &str, scan: &TipScan, taxa: &TaxonMap, domestic_country: &str) -> Table {
    let mut table = Table::new(
        "Node number",
        [
            format!("{} present", domestic_country),
            "Number of sequences".to_string(),
            "Date range".to_string(),
            "Countries".to_string(),
            "Admin 2 regions".to_string(),
        ],
    );
    let Some(nodes) = scan.inserted_node_membership.get(tree) else {
        return table;
    };

    for (node, members) in nodes {
        let mut dates: Vec<NaiveDate> = Vec::new();
        let mut countries = TraitCounts::default();
        let mut adm2 = TraitCounts::default();

        for taxon in members.iter().filter_map(|m| taxa.get(m)) {
            dates.extend(taxon.sample_date);
            countries.add(&taxon.country);
            let region = taxon.attributes.value("adm2");
            if taxon.country == domestic_country && !is_sentinel(region) {
                adm2.add(region);
            }
        }

        let adm2_cell = if adm2.is_empty() {
            "NA".to_string()
        } else {
            format_counts(adm2.iter())
        };
        table.push_row(
            node_number(node),
            vec![
                (countries.get(domestic_country) > 0).to_string(),
                members.len().to_string(),
                date_range(&dates, "no_date to no_date"),
                format_counts(countries.most_common(Some(LABEL_TOP_VALUES))),
                adm2_cell,
            ],
        );
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldSchema, Taxon};
    use std::collections::BTreeMap;

    fn taxa_with_summaries(values: &[(&str, &str)]) -> TaxonMap {
        let schema = FieldSchema::default();
        values
            .iter()
            .map(|(name, summary)| {
                let mut taxon = Taxon::new(*name, &schema);
                taxon.node_summary = summary.to_string();
                taxon.country = summary.to_string();
                (name.to_string(), taxon)
            })
            .collect()
    }

    #[test]
    fn more_than_five_values_are_truncated() {
        let counts = [("A", 5), ("B", 4), ("C", 3), ("D", 2), ("E", 2), ("F", 1), ("G", 1)];
        let mut entries = Vec::new();
        for (value, n) in counts {
            for i in 0..n {
                entries.push((format!("{}{}", value, i), value));
            }
        }
        let pairs: Vec<(&str, &str)> = entries.iter().map(|(n, v)| (n.as_str(), *v)).collect();
        let taxa = taxa_with_summaries(&pairs);
        let members: Vec<String> = entries.iter().map(|(n, _)| n.clone()).collect();

        let summary = summarise_collapsed_node("inserted_node7", &members, &taxa);
        assert_eq!(summary.member_count, 18);
        assert_eq!(
            summary.label,
            "Collapsed node 7: 18 nodes in A, B, C, D, E and 2 others"
        );
    }

    #[test]
    fn one_hidden_value_is_singular_and_subtrees_are_named() {
        let taxa = taxa_with_summaries(&[
            ("a", "UK"),
            ("b", "Spain"),
            ("c", "France"),
            ("d", "Italy"),
            ("e", "Peru"),
            ("f", "Chile"),
            ("g", "NA"),
        ]);
        let members: Vec<String> = ["a", "b", "c", "d", "e", "f", "g", "subtree_3"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let summary = summarise_collapsed_node("inserted_node2", &members, &taxa);
        assert!(summary.label.ends_with("and 1 other and Tree 3"), "{}", summary.label);
        assert_eq!(summary.subtrees, vec!["Tree 3"]);
    }

    #[test]
    fn node_table_reports_domestic_presence_and_dates() {
        let schema = FieldSchema::new(&[], &[], &[]);
        let mut taxa = TaxonMap::new();
        for (name, country, date, adm2) in [
            ("a", "UK", Some("2020-03-01"), "Leeds"),
            ("b", "UK", None, "Leeds"),
            ("c", "Spain", Some("2020-02-01"), ""),
        ] {
            let mut taxon = Taxon::new(name, &schema);
            taxon.country = country.to_string();
            taxon.fill_sample_date(date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()));
            taxon.attributes.fill("adm2", adm2).unwrap();
            taxa.insert(name.to_string(), taxon);
        }
        let mut scan = TipScan::default();
        let mut nodes = BTreeMap::new();
        nodes.insert(
            "inserted_node1".to_string(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        );
        nodes.insert("inserted_node2".to_string(), vec!["missing".to_string()]);
        scan.inserted_node_membership.insert("t_1".to_string(), nodes);

        let table = node_table("t_1", &scan, &taxa, "UK");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "Node number"), Some("1"));
        assert_eq!(table.get(0, "UK present"), Some("true"));
        assert_eq!(table.get(0, "Date range"), Some("2020-02-01 to 2020-03-01"));
        assert_eq!(table.get(0, "Countries"), Some("UK (2), Spain (1)"));
        assert_eq!(table.get(0, "Admin 2 regions"), Some("Leeds (2)"));
        assert_eq!(table.get(1, "UK present"), Some("false"));
        assert_eq!(table.get(1, "Date range"), Some("no_date to no_date"));
        assert_eq!(table.get(1, "Admin 2 regions"), Some("NA"));
    }
}
