use super::taxon::Taxon;
use super::NA;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Taxa sharing one lineage label, frozen at construction.
#[derive(Debug, Clone)]
pub struct Lineage<'a> {
    pub name: String,
    pub taxa: Vec<&'a Taxon>,
    pub dates: Vec<NaiveDate>,
    pub first_date: Option<NaiveDate>,
    pub global_lineages: BTreeSet<String>,
}

impl<'a> Lineage<'a> {
    pub fn new(name: impl Into<String>, taxa: Vec<&'a Taxon>) -> Self {
        let dates: Vec<NaiveDate> = taxa.iter().filter_map(|t| t.sample_date).collect();
        let first_date = dates.iter().min().copied();
        let global_lineages = taxa.iter().map(|t| t.global_lineage.clone()).collect();
        Self {
            name: name.into(),
            taxa,
            dates,
            first_date,
            global_lineages,
        }
    }

    pub fn first_date_label(&self) -> String {
        self.first_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| NA.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldSchema;

    #[test]
    fn first_date_ignores_undated_members() {
        let schema = FieldSchema::default();
        let mut a = Taxon::new("a", &schema);
        a.fill_sample_date(NaiveDate::from_ymd_opt(2020, 6, 2));
        a.global_lineage = "B.1.1".to_string();
        let mut b = Taxon::new("b", &schema);
        b.fill_sample_date(NaiveDate::from_ymd_opt(2020, 5, 30));
        b.global_lineage = "B.1.1".to_string();
        let c = Taxon::new("c", &schema);

        let lineage = Lineage::new("UK123", vec![&a, &b, &c]);
        assert_eq!(lineage.dates.len(), 2);
        assert_eq!(lineage.first_date, NaiveDate::from_ymd_opt(2020, 5, 30));
        assert_eq!(lineage.global_lineages.len(), 2);
        assert!(lineage.global_lineages.contains("NA"));
    }

    #[test]
    fn undated_lineage_reports_na() {
        let schema = FieldSchema::default();
        let a = Taxon::new("a", &schema);
        let lineage = Lineage::new("UK9", vec![&a]);
        assert_eq!(lineage.first_date, None);
        assert_eq!(lineage.first_date_label(), "NA");
    }
}
