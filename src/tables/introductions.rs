use crate::export::Table;
use crate::reconcile::Reconciled;
use crate::record::{is_sentinel, Lineage, Taxon};
use crate::summary::TraitCounts;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Group the queries by UK lineage.
pub fn query_lineages(reconciled: &Reconciled) -> Vec<Lineage<'_>> {
    let mut grouped: BTreeMap<&str, Vec<&Taxon>> = BTreeMap::new();
    for query in reconciled.queries() {
        grouped.entry(query.uk_lineage.as_str()).or_default().push(query);
    }
    grouped
        .into_iter()
        .map(|(name, taxa)| Lineage::new(name, taxa))
        .collect()
}

/// Lineages whose earliest query is later than `min_date`.
pub fn new_introductions(reconciled: &Reconciled, min_date: NaiveDate) -> Table {
    let mut table = Table::new("Name", ["Size", "Locations", "Global lineage", "Trees"]);
    for lineage in query_lineages(reconciled) {
        if !lineage.first_date.is_some_and(|first| first > min_date) {
            continue;
        }
        let mut places = TraitCounts::default();
        let mut trees = BTreeSet::new();
        for taxon in &lineage.taxa {
            let adm2 = taxon.attributes.value("adm2");
            if !is_sentinel(adm2) {
                places.add(adm2);
            }
            trees.insert(taxon.tree_label());
        }
        let locations = places
            .iter()
            .map(|(place, n)| format!("{} ({})", place, n))
            .collect::<Vec<_>>()
            .join(" ");
        table.push_row(
            lineage.name.clone(),
            vec![
                lineage.taxa.len().to_string(),
                locations,
                lineage.global_lineages.iter().cloned().collect::<Vec<_>>().join(", "),
                trees.into_iter().collect::<Vec<_>>().join(", "),
            ],
        );
    }
    table
}
