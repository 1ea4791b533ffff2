use crate::export::Table;
use crate::reconcile::Reconciled;
use crate::record::{Taxon, NA};

/// Table fields describing a sequence's lineage; for sequences outside the
/// database they are read from the closest match.
const CLOSEST_LINEAGE_FIELDS: [(&str, &str); 3] = [
    ("phylotype", "phylotype of closest sequence"),
    ("uk_lineage", "UK lineage of closest sequence"),
    ("lineage", "lineage of closest sequence"),
];

/// Query tables split by whether the query was found in the database.
#[derive(Debug, Clone, Default)]
pub struct QueryTables {
    pub in_database: Option<Table>,
    pub sequence_provided: Option<Table>,
}

fn escape_display_name(name: &str) -> String {
    name.replace('|', "\\|")
}

fn is_snp_field(field: &str) -> bool {
    matches!(
        field.to_lowercase().as_str(),
        "snps" | "snpdistance" | "distance"
    )
}

pub fn query_tables(reconciled: &Reconciled, table_fields: &[String], remove_snp_table: bool) -> QueryTables {
    let fields: Vec<&String> = table_fields.iter().filter(|f| !is_snp_field(f)).collect();
    let show_snps = !remove_snp_table || table_fields.iter().any(|f| f.eq_ignore_ascii_case("snps"));

    let mut in_db_columns = vec!["Sequence name in tree".to_string()];
    in_db_columns.extend(fields.iter().map(|f| f.to_string()));
    in_db_columns.push("Tree".to_string());

    let mut provided_columns = vec!["Closest sequence in tree".to_string()];
    if show_snps {
        provided_columns.push("Distance to closest sequence".to_string());
        provided_columns.push("SNPs".to_string());
    }
    provided_columns.extend(fields.iter().map(|f| {
        CLOSEST_LINEAGE_FIELDS
            .iter()
            .find(|(field, _)| *field == f.as_str())
            .map(|(_, renamed)| renamed.to_string())
            .unwrap_or_else(|| f.to_string())
    }));
    provided_columns.push("Tree".to_string());

    let mut in_db = Table::new("Query ID", in_db_columns);
    let mut provided = Table::new("Query ID", provided_columns);

    for query in reconciled.queries() {
        let index = escape_display_name(&query.display_name);
        if query.in_database {
            let mut cells = vec![query.name.clone()];
            cells.extend(fields.iter().map(|f| query.table.value(f).to_string()));
            cells.push(query.tree_label().to_string());
            in_db.push_row(index, cells);
        } else {
            let closest: Option<&Taxon> = query.closest.as_deref().and_then(|c| reconciled.get(c));
            let mut cells = vec![query.closest_label().to_string()];
            if show_snps {
                cells.push(
                    query
                        .closest_distance
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| NA.to_string()),
                );
                cells.push(query.snps.clone().unwrap_or_else(|| NA.to_string()));
            }
            cells.extend(fields.iter().map(|f| {
                let from_closest = CLOSEST_LINEAGE_FIELDS.iter().any(|(field, _)| *field == f.as_str());
                if from_closest {
                    closest
                        .map(|c| c.table.value(f).to_string())
                        .unwrap_or_else(|| NA.to_string())
                } else {
                    query.table.value(f).to_string()
                }
            }));
            cells.push(query.tree_label().to_string());
            provided.push_row(index, cells);
        }
    }

    QueryTables {
        in_database: (!in_db.is_empty()).then_some(in_db),
        sequence_provided: (!provided.is_empty()).then_some(provided),
    }
}
