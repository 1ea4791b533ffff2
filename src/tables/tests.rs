use super::*;
use crate::reconcile::Reconciled;
use crate::record::{FieldSchema, Taxon};
use chrono::NaiveDate;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn schema() -> FieldSchema {
    FieldSchema::new(
        &[],
        &["region".to_string()],
        &["lineage".to_string(), "study".to_string()],
    )
}

/// Two queries (one in the database, one placed by closest match) and two
/// database sequences.
fn records() -> Reconciled {
    let schema = schema();
    let mut reconciled = Reconciled::default();

    let mut a = Taxon::new("SeqA", &schema);
    a.query_id = Some("Q1".to_string());
    a.display_name = "patient|1".to_string();
    a.in_database = true;
    a.country = "UK".to_string();
    a.uk_lineage = "UK5".to_string();
    a.global_lineage = "B.1.1.7".to_string();
    a.tree = Some("local_1".to_string());
    a.fill_sample_date(Some(date("2021-01-05")));
    a.table.fill("lineage", "B.1.1.7").unwrap();
    a.table.fill("study", "cohort").unwrap();
    a.attributes.fill("region", "North").unwrap();
    a.attributes.fill("adm2", "Leeds").unwrap();

    let mut b = Taxon::new("SeqB", &schema);
    b.query_id = Some("Q2".to_string());
    b.display_name = "Q2".to_string();
    b.closest = Some("SeqC".to_string());
    b.closest_distance = Some(3);
    b.snps = Some("A1T".to_string());
    b.uk_lineage = "UK9".to_string();
    b.fill_sample_date(Some(date("2020-11-01")));
    b.table.fill("lineage", "query-lineage").unwrap();

    let mut c = Taxon::new("SeqC", &schema);
    c.in_database = true;
    c.country = "UK".to_string();
    c.fill_sample_date(Some(date("2020-10-01")));
    c.table.fill("lineage", "B.1.177").unwrap();
    c.attributes.fill("region", "South").unwrap();

    let mut d = Taxon::new("SeqD", &schema);
    d.in_database = true;
    d.country = "UK".to_string();
    d.fill_sample_date(Some(date("2020-12-01")));
    d.attributes.fill("region", "North").unwrap();

    for taxon in [a, b, c, d] {
        if taxon.query_id.is_some() {
            reconciled.query_order.push(taxon.name.clone());
        }
        reconciled.taxa.insert(taxon.name.clone(), taxon);
    }
    reconciled
}

#[test]
fn queries_split_by_database_membership() {
    let reconciled = records();
    let fields = vec!["lineage".to_string(), "study".to_string(), "SNPs".to_string()];
    let tables = query_tables(&reconciled, &fields, true);

    let in_db = tables.in_database.unwrap();
    assert_eq!(in_db.len(), 1);
    assert_eq!(in_db.get(0, "Query ID"), Some("patient\\|1"));
    assert_eq!(in_db.get(0, "Sequence name in tree"), Some("SeqA"));
    assert_eq!(in_db.get(0, "lineage"), Some("B.1.1.7"));
    assert_eq!(in_db.get(0, "Tree"), Some("local_1"));
    assert_eq!(in_db.get(0, "SNPs"), None);

    let provided = tables.sequence_provided.unwrap();
    assert_eq!(provided.get(0, "Closest sequence in tree"), Some("SeqC"));
    assert_eq!(provided.get(0, "Distance to closest sequence"), Some("3"));
    assert_eq!(provided.get(0, "lineage of closest sequence"), Some("B.1.177"));
    assert_eq!(provided.get(0, "study"), Some("NA"));
    assert_eq!(provided.get(0, "Tree"), Some("NA"));
}

#[test]
fn snp_columns_can_be_removed() {
    let reconciled = records();
    let tables = query_tables(&reconciled, &["lineage".to_string()], true);
    let provided = tables.sequence_provided.unwrap();
    assert!(!provided.columns.iter().any(|c| c == "SNPs"));
}

#[test]
fn context_values_are_inherited_from_the_closest_match() {
    let reconciled = records();
    let summary = context_table(&reconciled, "region", "UK");
    assert_eq!(summary.inherited.get("SeqB").map(String::as_str), Some("South"));
    assert!(summary.without_value.is_empty());

    let table = summary.table;
    assert_eq!(table.index_values().collect::<Vec<_>>(), vec!["North", "South"]);
    assert_eq!(table.get(0, "Number in dataset"), Some("1"));
    assert_eq!(table.get(0, "Total in database"), Some("2"));
    assert_eq!(table.get(0, "Date range"), Some("2020-12-01 to 2021-01-05"));
    assert_eq!(table.get(1, "Total in database"), Some("1"));
}

#[test]
fn lineages_first_seen_after_the_cutoff_are_new() {
    let reconciled = records();
    let lineages = query_lineages(&reconciled);
    assert_eq!(lineages.len(), 2);

    let table = new_introductions(&reconciled, date("2020-12-15"));
    assert_eq!(table.index_values().collect::<Vec<_>>(), vec!["UK5"]);
    assert_eq!(table.get(0, "Size"), Some("1"));
    assert_eq!(table.get(0, "Locations"), Some("Leeds (1)"));
    assert_eq!(table.get(0, "Global lineage"), Some("B.1.1.7"));
    assert_eq!(table.get(0, "Trees"), Some("local_1"));
}

#[test]
fn qc_failures_use_display_names() {
    let reconciled = records();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qc.csv");
    std::fs::write(
        &path,
        "name,reason_for_failure\nSeqA,seq_len:900\nunknown,N_content:0.25\n",
    )
    .unwrap();
    let table = qc_fail_table(&path, &reconciled).unwrap();
    assert_eq!(table.get(0, "Name"), Some("patient|1"));
    assert_eq!(table.get(0, "Reason for failure"), Some("Sequence too short: only 900 bases."));
    assert_eq!(table.get(1, "Name"), Some("unknown"));
    assert_eq!(
        table.get(1, "Reason for failure"),
        Some("Sequence has too many Ns: 25.0% of bases")
    );
}
