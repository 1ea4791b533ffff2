pub mod formats;
pub mod table;

pub use formats::{NodeSummaryExport, RunExport, TreeNodeSummary};
pub use table::Table;

use crate::error::Result;
use chrono::{DateTime, Utc};
use log::debug;
use serde::ser::Serializer;
use serde::Serialize;
use std::fs;
use std::path::Path;

const RECORD_TYPE: &str = "phylo-report.export";
const EXPORT_VERSION: &str = "1.0";

/// Root structure of every JSON file the report writes.
#[derive(Debug, Serialize)]
pub struct ReportExport {
    #[serde(rename = "$type")]
    pub record_type: String,

    pub version: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub created_at: DateTime<Utc>,
    pub tool_version: String,

    #[serde(flatten)]
    pub data: ReportData,

    pub metadata: ExportMetadata,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ReportData {
    NodeSummary(NodeSummaryExport),
    Run(RunExport),
}

fn serialize_datetime<S>(date: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.to_rfc3339())
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportMetadata {
    pub tree_name_stem: String,
    pub domestic_country: String,
    pub node_summary_field: String,
    pub genome_length: u32,
}

impl ReportExport {
    pub fn new(data: ReportData, metadata: ExportMetadata) -> Self {
        Self {
            record_type: RECORD_TYPE.to_string(),
            version: EXPORT_VERSION.to_string(),
            created_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            data,
            metadata,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
