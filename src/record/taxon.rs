use super::attributes::{AttributeMap, FieldSchema};
use super::NA;
use crate::dates::{display_date, Epiweek};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// One sequence record, keyed by its database/tree name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Taxon {
    pub name: String,
    pub query_id: Option<String>,
    pub input_display_name: String,
    pub display_name: String,

    pub in_database: bool,
    pub protected: bool,
    pub country: String,

    pub sample_date: Option<NaiveDate>,
    pub epiweek: Option<Epiweek>,
    pub date_dict: BTreeMap<String, NaiveDate>,
    /// Every date assigned to `sample_date`, in assignment order.
    pub all_dates: Vec<NaiveDate>,

    pub global_lineage: String,
    pub uk_lineage: String,
    pub phylotype: String,

    pub closest: Option<String>,
    pub closest_distance: Option<u32>,
    pub snps: Option<String>,

    pub attributes: AttributeMap,
    pub table: AttributeMap,

    pub tree: Option<String>,
    pub node_summary: String,
}

impl Taxon {
    pub fn new(name: impl Into<String>, schema: &FieldSchema) -> Self {
        let name = name.into();
        Self {
            input_display_name: name.clone(),
            display_name: name.clone(),
            name,
            query_id: None,
            in_database: false,
            protected: false,
            country: NA.to_string(),
            sample_date: None,
            epiweek: None,
            date_dict: BTreeMap::new(),
            all_dates: Vec::new(),
            global_lineage: NA.to_string(),
            uk_lineage: NA.to_string(),
            phylotype: NA.to_string(),
            closest: None,
            closest_distance: None,
            snps: None,
            attributes: AttributeMap::seeded(&schema.attribute_keys),
            table: AttributeMap::seeded(&schema.table_keys),
            tree: None,
            node_summary: NA.to_string(),
        }
    }

    /// Set the sample date if none is known yet; keeps the epiweek and the
    /// date history in step. Returns whether the date was stored.
    pub fn fill_sample_date(&mut self, date: Option<NaiveDate>) -> bool {
        match (self.sample_date, date) {
            (None, Some(date)) => {
                self.sample_date = Some(date);
                self.epiweek = Some(Epiweek::from_date(date));
                self.all_dates.push(date);
                true
            }
            _ => false,
        }
    }

    pub fn sample_date_label(&self) -> String {
        display_date(self.sample_date)
    }

    pub fn tree_label(&self) -> &str {
        self.tree.as_deref().unwrap_or(NA)
    }

    pub fn closest_label(&self) -> &str {
        self.closest.as_deref().unwrap_or(NA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_seeds_every_declared_key_with_na() {
        let schema = FieldSchema::new(
            &["location_label".to_string()],
            &["adm1".to_string(), "lineage".to_string()],
            &["phylotype".to_string()],
        );
        let taxon = Taxon::new("England/ABC-123/2020", &schema);
        for key in &schema.attribute_keys {
            assert_eq!(taxon.attributes.get(key), Some(NA));
        }
        for key in &schema.table_keys {
            assert_eq!(taxon.table.get(key), Some(NA));
        }
        assert_eq!(taxon.display_name, "England/ABC-123/2020");
        assert_eq!(taxon.sample_date_label(), "NA");
        assert_eq!(taxon.tree_label(), "NA");
    }

    #[test]
    fn sample_date_is_filled_once() {
        let mut taxon = Taxon::new("seq", &FieldSchema::default());
        let first = NaiveDate::from_ymd_opt(2020, 4, 1).unwrap();
        let second = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        assert!(taxon.fill_sample_date(Some(first)));
        assert!(!taxon.fill_sample_date(Some(second)));
        assert_eq!(taxon.sample_date, Some(first));
        assert_eq!(taxon.all_dates, vec![first]);
        assert_eq!(taxon.epiweek, Some(Epiweek::from_date(first)));
    }
}
