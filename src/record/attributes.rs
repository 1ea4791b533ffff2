use super::{is_sentinel, NA};
use crate::error::{ReportError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// The attribute and table keys every record of a run carries.
///
/// Built once from configuration; each `Taxon` gets maps seeded from it so a
/// key can never go missing, only move from `"NA"` to a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    pub attribute_keys: Vec<String>,
    pub table_keys: Vec<String>,
}

impl FieldSchema {
    pub fn new(
        label_fields: &[String],
        tree_fields: &[String],
        table_fields: &[String],
    ) -> Self {
        let mut attribute_keys: Vec<String> = Vec::new();
        for field in label_fields
            .iter()
            .chain(tree_fields)
            .map(|f| clean_key(f))
            .chain(["adm1".to_string(), "adm2".to_string()])
        {
            if !field.is_empty() && !attribute_keys.contains(&field) {
                attribute_keys.push(field);
            }
        }

        let mut table_keys: Vec<String> = Vec::new();
        for field in table_fields.iter().map(|f| clean_key(f)) {
            if !field.is_empty() && !table_keys.contains(&field) {
                table_keys.push(field);
            }
        }

        Self {
            attribute_keys,
            table_keys,
        }
    }
}

/// Field names are compared with whitespace removed.
pub fn clean_key(field: &str) -> String {
    field.chars().filter(|c| !c.is_whitespace()).collect()
}

/// String map with a fixed key set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeMap {
    values: BTreeMap<String, String>,
}

impl AttributeMap {
    pub fn seeded<'a>(keys: impl IntoIterator<Item = &'a String>) -> Self {
        Self {
            values: keys.into_iter().map(|k| (k.clone(), NA.to_string())).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value or `"NA"` when the key is unknown.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or(NA)
    }

    pub fn is_declared(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_unset(&self, key: &str) -> bool {
        self.get(key).map(is_sentinel).unwrap_or(false)
    }

    /// Fill a declared key that still holds a sentinel. Empty and `"NA"`
    /// values are ignored. Returns whether the value was stored.
    pub fn fill(&mut self, key: &str, value: &str) -> Result<bool> {
        let slot = self
            .values
            .get_mut(key)
            .ok_or_else(|| ReportError::UndeclaredField(key.to_string()))?;
        if !is_sentinel(slot) || is_sentinel(value) {
            return Ok(false);
        }
        *slot = value.to_string();
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn schema_strips_spaces_and_deduplicates() {
        let schema = FieldSchema::new(
            &strings(&["location label", "adm2"]),
            &strings(&["adm1", "phylotype"]),
            &strings(&["sample date", "lineage"]),
        );
        assert_eq!(
            schema.attribute_keys,
            strings(&["locationlabel", "adm2", "adm1", "phylotype"])
        );
        assert_eq!(schema.table_keys, strings(&["sampledate", "lineage"]));
    }

    #[test]
    fn fill_never_clobbers_a_populated_value() {
        let keys = strings(&["adm2"]);
        let mut map = AttributeMap::seeded(&keys);
        assert!(map.is_unset("adm2"));
        assert!(!map.fill("adm2", "").unwrap());
        assert!(!map.fill("adm2", "NA").unwrap());
        assert!(map.fill("adm2", "FIFE").unwrap());
        assert!(!map.fill("adm2", "EDINBURGH").unwrap());
        assert_eq!(map.value("adm2"), "FIFE");
    }

    #[test]
    fn undeclared_keys_are_rejected() {
        let keys = strings(&["adm2"]);
        let mut map = AttributeMap::seeded(&keys);
        assert!(matches!(
            map.fill("colour", "red"),
            Err(ReportError::UndeclaredField(k)) if k == "colour"
        ));
        assert_eq!(map.get("colour"), None);
        assert_eq!(map.len(), 1);
    }
}
