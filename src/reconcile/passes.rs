use super::{Admin1Mode, Creation, PassPolicy, Reconciled, Reconciler};
use super::{BACKGROUND_PASS, FILTERED_PASS, QUERY_PASS};
use crate::dates::parse_optional_date;
use crate::error::{ReportError, Result};
use crate::record::{is_sentinel, Taxon};
use crate::utils::{MetadataReader, Row};
use log::{debug, info, warn};
use std::path::Path;

pub const FILTERED_REQUIRED_COLUMNS: [&str; 6] =
    ["query_id", "query", "closest", "SNPdistance", "SNPs", "country"];

const LINEAGE_COLUMNS: [&str; 3] = ["lineage", "uk_lineage", "phylotype"];

/// SNP distances are whole numbers; `"3.0"` is accepted, blanks are unknown.
pub fn parse_snp_distance(value: &str) -> Result<Option<u32>> {
    let value = value.trim();
    if is_sentinel(value) {
        return Ok(None);
    }
    if let Ok(distance) = value.parse::<u32>() {
        return Ok(Some(distance));
    }
    match value.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(Some(f as u32)),
        _ => Err(ReportError::InvalidValue {
            value: value.to_string(),
            column: "SNPdistance".to_string(),
            reason: "expected a whole number of SNPs".to_string(),
        }),
    }
}

fn fill_text(slot: &mut String, value: Option<&str>) {
    if let Some(value) = value {
        if is_sentinel(slot) && !is_sentinel(value) {
            *slot = value.to_string();
        }
    }
}

fn non_sentinel(value: &str) -> Option<String> {
    (!is_sentinel(value)).then(|| value.to_string())
}

fn row_context(path: &Path, row: &Row<'_>, column: &str) -> String {
    format!("{} row {} column `{}`", path.display(), row.number, column)
}

fn fill_lineages(taxon: &mut Taxon, row: &Row<'_>) {
    let [global, uk, phylotype] = LINEAGE_COLUMNS;
    fill_text(&mut taxon.global_lineage, row.get(global));
    fill_text(&mut taxon.uk_lineage, row.get(uk));
    fill_text(&mut taxon.phylotype, row.get(phylotype));
}

impl Reconciler<'_> {
    /// Pass A: one record per query from the filtered comparison file.
    pub fn filtered_pass(&self, path: &Path, state: &mut Reconciled) -> Result<()> {
        let policy = FILTERED_PASS;
        let date_column = self.config.database_date_column.as_str();
        let mut reader = MetadataReader::open(path)?;
        reader.require(&FILTERED_REQUIRED_COLUMNS)?;
        reader.require(&[date_column])?;

        let mut skipped = 0usize;
        reader.for_each_row(|row| {
            let name = row.value("query");
            if name.is_empty() {
                warn!("{} row {} has no query name", path.display(), row.number);
                return Ok(());
            }
            if policy.creation == Creation::FirstSeen && state.taxa.contains_key(name) {
                debug!("Skipping duplicate row for {} in {}", name, path.display());
                skipped += 1;
                return Ok(());
            }

            let mut taxon = Taxon::new(name, self.schema);
            let query_id = match row.value("query_id") {
                "" => name.to_string(),
                id => id.to_string(),
            };
            taxon.query_id = Some(query_id.clone());
            fill_text(&mut taxon.country, row.get("country"));
            fill_lineages(&mut taxon, row);

            let closest = row.value("closest");
            if closest == name {
                taxon.in_database = true;
                let context = row_context(path, row, date_column);
                taxon.fill_sample_date(parse_optional_date(row.value(date_column), &context)?);
            } else {
                taxon.closest = non_sentinel(closest);
                taxon.closest_distance = parse_snp_distance(row.value("SNPdistance"))?;
                taxon.snps = non_sentinel(row.value("SNPs"));
                if let Some(closest) = &taxon.closest {
                    state.closest_sequences.insert(closest.clone());
                }
            }

            taxon.tree = self.scan.tree_of(name).map(str::to_string);
            self.overlay_geography(&mut taxon, row, policy.admin1)?;

            if let Some(tree) = &taxon.tree {
                state
                    .tree_to_queries
                    .entry(tree.clone())
                    .or_default()
                    .push(name.to_string());
            }
            state.query_ids.entry(query_id).or_insert_with(|| name.to_string());
            state.query_order.push(name.to_string());
            state.taxa.insert(name.to_string(), taxon);
            Ok(())
        })?;

        info!(
            "{}: {} query records, {} duplicate rows skipped",
            policy.label,
            state.query_order.len(),
            skipped
        );
        Ok(())
    }

    /// Pass B: overlay the values the user supplied for their queries.
    pub fn query_pass(&self, path: &Path, state: &mut Reconciled) -> Result<()> {
        let policy = QUERY_PASS;
        let input_column = self.config.input_column.as_str();
        let display_column = self.config.display_name_column();
        let mut reader = MetadataReader::open(path)?;
        reader.require(&[input_column])?;
        if self.config.display_name_column.is_some() {
            reader.require(&[display_column])?;
        }
        let date_column = if reader.has_column("sample_date") {
            "sample_date"
        } else {
            "collection_date"
        };

        reader.for_each_row(|row| {
            let id = row.value(input_column);
            state.full_query_count += 1;
            let Some(name) = state.resolve_query(id).map(str::to_string) else {
                debug!("Query {} has no matching record", id);
                state.unmatched_queries.push(id.to_string());
                return Ok(());
            };
            let Some(taxon) = state.taxa.get_mut(&name) else {
                return Ok(());
            };

            if let Some(display) = row.get(display_column).filter(|d| !is_sentinel(d)) {
                taxon.input_display_name = display.to_string();
                taxon.display_name = display.to_string();
            }
            self.overlay_dates(taxon, path, row)?;
            let context = row_context(path, row, date_column);
            taxon.fill_sample_date(parse_optional_date(row.value(date_column), &context)?);
            fill_text(&mut taxon.node_summary, row.get(&self.config.node_summary));
            self.overlay_fields(taxon, row, &[input_column], policy.admin1)
        })?;

        info!(
            "{}: {} rows, {} without a matching record",
            policy.label,
            state.full_query_count,
            state.unmatched_queries.len()
        );
        Ok(())
    }

    /// Pass C: backfill from the background database and add the context
    /// sequences the trees show.
    pub fn background_pass(&self, path: &Path, state: &mut Reconciled) -> Result<()> {
        let policy = BACKGROUND_PASS;
        let name_column = self.config.database_name_column.as_str();
        let date_column = self.config.database_date_column.as_str();
        let mut reader = MetadataReader::open(path)?;
        reader.require(&[name_column, date_column, "country"])?;

        let mut created = 0usize;
        let mut backfilled = 0usize;
        reader.for_each_row(|row| {
            let name = row.value(name_column);
            if name.is_empty() {
                return Ok(());
            }
            if !state.taxa.contains_key(name) {
                let wanted = match policy.creation {
                    Creation::PresentOrClosest => {
                        self.scan.is_present(name) || state.closest_sequences.contains(name)
                    }
                    Creation::FirstSeen => true,
                    Creation::Never => false,
                };
                if !wanted {
                    return Ok(());
                }
                let mut taxon = Taxon::new(name, self.schema);
                taxon.in_database = true;
                taxon.tree = self.scan.tree_of(name).map(str::to_string);
                state.taxa.insert(name.to_string(), taxon);
                created += 1;
            } else {
                backfilled += 1;
            }
            let Some(taxon) = state.taxa.get_mut(name) else {
                return Ok(());
            };

            fill_text(&mut taxon.country, row.get("country"));
            let context = row_context(path, row, date_column);
            taxon.fill_sample_date(parse_optional_date(row.value(date_column), &context)?);
            self.overlay_dates(taxon, path, row)?;
            fill_lineages(taxon, row);
            fill_text(&mut taxon.node_summary, row.get(&self.config.node_summary));
            self.overlay_fields(taxon, row, &[name_column], policy.admin1)
        })?;

        info!(
            "{}: {} context records created, {} records backfilled",
            policy.label, created, backfilled
        );
        Ok(())
    }

    fn overlay_dates(&self, taxon: &mut Taxon, path: &Path, row: &Row<'_>) -> Result<()> {
        for field in &self.config.date_fields {
            if taxon.date_dict.contains_key(field) {
                continue;
            }
            if let Some(value) = row.get(field) {
                let context = row_context(path, row, field);
                if let Some(date) = parse_optional_date(value, &context)? {
                    taxon.date_dict.insert(field.clone(), date);
                }
            }
        }
        Ok(())
    }

    /// Fill every declared attribute and table field the row carries.
    fn overlay_fields(
        &self,
        taxon: &mut Taxon,
        row: &Row<'_>,
        skip: &[&str],
        admin1: Admin1Mode,
    ) -> Result<()> {
        for key in &self.schema.attribute_keys {
            if key == "adm1" || key == "adm2" || skip.contains(&key.as_str()) {
                continue;
            }
            if let Some(value) = row.get(key) {
                taxon.attributes.fill(key, value)?;
            }
        }
        for key in &self.schema.table_keys {
            if let Some(value) = row.get(key) {
                taxon.table.fill(key, value)?;
            }
        }
        self.overlay_geography(taxon, row, admin1)
    }

    fn overlay_geography(&self, taxon: &mut Taxon, row: &Row<'_>, mode: Admin1Mode) -> Result<()> {
        let adm2 = row.get("adm2").unwrap_or("");
        taxon.attributes.fill("adm2", adm2)?;
        if !taxon.attributes.is_unset("adm1") {
            return Ok(());
        }

        let raw = row.get("adm1").unwrap_or("");
        let from_adm2 = if is_sentinel(raw) {
            self.normalizer.adm1_from_adm2(adm2)
        } else {
            None
        };
        let adm1 = match (from_adm2, mode) {
            (Some(adm1), _) => adm1.to_string(),
            (None, Admin1Mode::Normalise) => self.normalizer.normalize(raw, &taxon.name)?,
            (None, Admin1Mode::NormaliseWithFallback) => {
                self.normalizer
                    .normalize_for_country(raw, &taxon.name, &taxon.country)?
            }
        };
        taxon.attributes.fill("adm1", &adm1)?;
        Ok(())
    }
}
