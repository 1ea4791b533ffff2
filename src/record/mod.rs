mod attributes;
mod lineage;
mod taxon;

pub use attributes::{clean_key, AttributeMap, FieldSchema};
pub use lineage::Lineage;
pub use taxon::Taxon;

use std::collections::BTreeMap;

/// Sentinel for an unknown value.
pub const NA: &str = "NA";

/// Name-keyed record set produced by reconciliation.
pub type TaxonMap = BTreeMap<String, Taxon>;

/// True for the values that mean "unknown": `"NA"` and the empty string.
pub fn is_sentinel(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == NA
}
