use crate::record::{is_sentinel, Taxon, TaxonMap};
use crate::summary::{subtree_label, summarise_collapsed_node};
use crate::tree::scanner::{is_collapsed_placeholder, is_subtree_placeholder, TipScan};

const LOCATION_FIELD: &str = "location_label";

/// What a leaf stands for, with the text drawn next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipLabel {
    Sequence { text: String, query: bool },
    Collapsed { text: String, members: usize },
    Subtree(String),
    Unknown(String),
}

impl TipLabel {
    pub fn text(&self) -> &str {
        match self {
            TipLabel::Sequence { text, .. } | TipLabel::Collapsed { text, .. } => text,
            TipLabel::Subtree(text) | TipLabel::Unknown(text) => text,
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, TipLabel::Sequence { query: true, .. })
    }
}

/// `display|date`, or `display|location|date` when a location label is
/// known. Queries also carry their custom tip fields.
pub fn sequence_label(taxon: &Taxon, query: bool, custom_tip_fields: &[String]) -> String {
    let date = taxon.sample_date_label();
    let location = taxon
        .attributes
        .get(LOCATION_FIELD)
        .filter(|l| !is_sentinel(l));
    let mut label = match location {
        Some(location) => format!("{}|{}|{}", taxon.display_name, location, date),
        None => format!("{}|{}", taxon.display_name, date),
    };
    if query {
        for field in custom_tip_fields {
            label.push('|');
            label.push_str(taxon.attributes.value(field));
        }
    }
    label
}

pub fn tip_label(
    leaf: &str,
    tree: &str,
    taxa: &TaxonMap,
    scan: &TipScan,
    custom_tip_fields: &[String],
) -> TipLabel {
    if is_collapsed_placeholder(leaf) {
        let members = scan.collapsed_members(tree, leaf).unwrap_or(&[]);
        let summary = summarise_collapsed_node(leaf, members, taxa);
        return TipLabel::Collapsed {
            text: summary.label,
            members: summary.member_count,
        };
    }
    if let Some(taxon) = taxa.get(leaf) {
        let query = taxon.query_id.is_some();
        return TipLabel::Sequence {
            text: sequence_label(taxon, query, custom_tip_fields),
            query,
        };
    }
    if is_subtree_placeholder(leaf) {
        return TipLabel::Subtree(subtree_label(leaf));
    }
    TipLabel::Unknown(leaf.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldSchema;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn taxa() -> TaxonMap {
        let schema = FieldSchema::new(
            &["location_label".to_string(), "study".to_string()],
            &[],
            &[],
        );
        let mut query = Taxon::new("SeqA", &schema);
        query.query_id = Some("Q1".to_string());
        query.display_name = "patient-1".to_string();
        query.fill_sample_date(NaiveDate::from_ymd_opt(2021, 1, 5));
        query.attributes.fill("location_label", "Leeds").unwrap();
        query.attributes.fill("study", "cohort").unwrap();

        let mut context = Taxon::new("SeqB", &schema);
        context.node_summary = "UK".to_string();

        let mut taxa = TaxonMap::new();
        taxa.insert("SeqA".to_string(), query);
        taxa.insert("SeqB".to_string(), context);
        taxa
    }

    #[test]
    fn sequences_get_name_location_date_and_custom_fields() {
        let taxa = taxa();
        let scan = TipScan::default();
        let custom = vec!["study".to_string()];
        let label = tip_label("SeqA", "t_1", &taxa, &scan, &custom);
        assert_eq!(
            label,
            TipLabel::Sequence {
                text: "patient-1|Leeds|2021-01-05|cohort".to_string(),
                query: true
            }
        );
        assert_eq!(tip_label("SeqB", "t_1", &taxa, &scan, &custom).text(), "SeqB|NA");
    }

    #[test]
    fn placeholders_are_described() {
        let taxa = taxa();
        let mut scan = TipScan::default();
        let mut nodes = BTreeMap::new();
        nodes.insert("inserted_node3".to_string(), vec!["SeqB".to_string(), "gone".to_string()]);
        scan.inserted_node_membership.insert("t_1".to_string(), nodes);

        let collapsed = tip_label("inserted_node3", "t_1", &taxa, &scan, &[]);
        assert_eq!(
            collapsed,
            TipLabel::Collapsed {
                text: "Collapsed node 3: 2 nodes in UK".to_string(),
                members: 2
            }
        );
        assert_eq!(
            tip_label("subtree_4", "t_1", &taxa, &scan, &[]),
            TipLabel::Subtree("Tree 4".to_string())
        );
        assert_eq!(
            tip_label("stranger", "t_1", &taxa, &scan, &[]),
            TipLabel::Unknown("stranger".to_string())
        );
    }
}
