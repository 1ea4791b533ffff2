use crate::export::Table;
use crate::reconcile::Reconciled;
use crate::record::{is_sentinel, NA};
use crate::summary::{date_range, TraitCounts};
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct ContextSummary {
    pub table: Table,
    /// Queries outside the database that took their value from the closest
    /// match.
    pub inherited: BTreeMap<String, String>,
    /// Queries with no value of their own or from their closest match.
    pub without_value: Vec<String>,
}

/// Count the queries by `field`, next to how often each value occurs among
/// domestic sequences of the record set.
pub fn context_table(reconciled: &Reconciled, field: &str, domestic_country: &str) -> ContextSummary {
    let mut summary = ContextSummary::default();
    let mut counts = TraitCounts::default();

    for query in reconciled.queries() {
        let own = query.attributes.value(field);
        let value = if !query.in_database && is_sentinel(own) {
            let inherited = query
                .closest
                .as_deref()
                .and_then(|c| reconciled.get(c))
                .map(|c| c.attributes.value(field))
                .filter(|v| !is_sentinel(v));
            match inherited {
                Some(value) => {
                    summary.inherited.insert(query.name.clone(), value.to_string());
                    value
                }
                None => {
                    summary.without_value.push(query.name.clone());
                    NA
                }
            }
        } else {
            own
        };
        if !is_sentinel(value) {
            counts.add(value);
        }
    }

    let mut table = Table::new(
        field,
        ["Date range", "Number in dataset", "Total in database"],
    );
    for (value, n) in counts.iter() {
        let mut dates: Vec<NaiveDate> = Vec::new();
        let mut total = 0usize;
        for taxon in reconciled.taxa.values() {
            if taxon.country == domestic_country && taxon.attributes.value(field) == value {
                total += 1;
                dates.extend(taxon.sample_date);
            }
        }
        table.push_row(
            value,
            vec![date_range(&dates, NA), n.to_string(), total.to_string()],
        );
    }
    summary.table = table;
    summary
}
