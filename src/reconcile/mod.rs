//! Metadata reconciliation.
//!
//! Three passes build one record per sequence: the filtered comparison file
//! creates the query records, the user's query file overlays what they
//! supplied, and the background metadata backfills the rest and adds the
//! context sequences shown in the trees. Every pass only fills values that
//! are still unknown, so running them in order never loses information.

mod passes;

pub use passes::{parse_snp_distance, FILTERED_REQUIRED_COLUMNS};

use crate::config::ReportConfig;
use crate::error::Result;
use crate::geography::GeographyNormalizer;
use crate::record::{FieldSchema, Taxon, TaxonMap};
use crate::tree::TipScan;
use log::info;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

/// How admin-1 values read by a pass are normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admin1Mode {
    /// Code table, spelling cleanup, identifier scan.
    Normalise,
    /// As `Normalise`, then the configured fallback for foreign sequences.
    NormaliseWithFallback,
}

/// Which rows of a source may create new records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creation {
    /// Every row with an unseen key; later duplicates are skipped.
    FirstSeen,
    /// Rows only ever update existing records.
    Never,
    /// Rows whose key is in a tree or is a closest match.
    PresentOrClosest,
}

/// The per-pass knobs of the reconciliation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassPolicy {
    pub label: &'static str,
    pub creation: Creation,
    pub admin1: Admin1Mode,
}

pub const FILTERED_PASS: PassPolicy = PassPolicy {
    label: "filtered metadata",
    creation: Creation::FirstSeen,
    admin1: Admin1Mode::Normalise,
};

pub const QUERY_PASS: PassPolicy = PassPolicy {
    label: "query metadata",
    creation: Creation::Never,
    admin1: Admin1Mode::Normalise,
};

pub const BACKGROUND_PASS: PassPolicy = PassPolicy {
    label: "background metadata",
    creation: Creation::PresentOrClosest,
    admin1: Admin1Mode::NormaliseWithFallback,
};

/// The three metadata files of a run.
#[derive(Debug, Clone, Copy)]
pub struct MetadataSources<'a> {
    pub filtered: &'a Path,
    pub query: &'a Path,
    pub background: &'a Path,
}

/// The reconciled record set.
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    pub taxa: TaxonMap,
    /// Query record names in filtered-file order.
    pub query_order: Vec<String>,
    /// Database sequences named as the closest match of some query.
    pub closest_sequences: BTreeSet<String>,
    pub tree_to_queries: BTreeMap<String, Vec<String>>,
    /// Data rows in the query file.
    pub full_query_count: usize,
    /// Query file identifiers with no matching record.
    pub unmatched_queries: Vec<String>,
    query_ids: HashMap<String, String>,
}

impl Reconciled {
    pub fn get(&self, name: &str) -> Option<&Taxon> {
        self.taxa.get(name)
    }

    pub fn is_query(&self, name: &str) -> bool {
        self.taxa
            .get(name)
            .map(|t| t.query_id.is_some())
            .unwrap_or(false)
    }

    /// Query records in input order.
    pub fn queries(&self) -> impl Iterator<Item = &Taxon> {
        self.query_order.iter().filter_map(|name| self.taxa.get(name))
    }

    /// Record name for a query file identifier: the query id first, then
    /// the record name itself.
    pub fn resolve_query(&self, id: &str) -> Option<&str> {
        if let Some(name) = self.query_ids.get(id) {
            return Some(name);
        }
        self.taxa.get_key_value(id).map(|(k, _)| k.as_str())
    }
}

pub struct Reconciler<'a> {
    config: &'a ReportConfig,
    schema: &'a FieldSchema,
    normalizer: &'a GeographyNormalizer,
    scan: &'a TipScan,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        config: &'a ReportConfig,
        schema: &'a FieldSchema,
        normalizer: &'a GeographyNormalizer,
        scan: &'a TipScan,
    ) -> Self {
        Self {
            config,
            schema,
            normalizer,
            scan,
        }
    }

    pub fn run(&self, sources: MetadataSources<'_>) -> Result<Reconciled> {
        let mut state = Reconciled::default();
        self.filtered_pass(sources.filtered, &mut state)?;
        self.query_pass(sources.query, &mut state)?;
        self.background_pass(sources.background, &mut state)?;
        self.mark_protected(&mut state);
        info!(
            "Reconciled {} records ({} queries, {} closest matches)",
            state.taxa.len(),
            state.query_order.len(),
            state.closest_sequences.len()
        );
        Ok(state)
    }

    fn mark_protected(&self, state: &mut Reconciled) {
        for name in &self.scan.protected_sequences {
            if let Some(taxon) = state.taxa.get_mut(name) {
                taxon.protected = true;
            }
        }
    }
}
