use crate::error::Result;
use crate::geography::Admin1Fallback;
use crate::record::{clean_key, FieldSchema};
use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A trait drawn on the tree figures, with the colormap used for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicTrait {
    pub field: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

impl GraphicTrait {
    pub fn new(field: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            scheme: scheme.into(),
        }
    }
}

fn default_scheme() -> String {
    "Paired".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Query CSV column holding the sequence identifier.
    #[serde(default = "default_input_column")]
    pub input_column: String,
    /// Query CSV column for display names; the input column when unset.
    #[serde(default)]
    pub display_name_column: Option<String>,
    #[serde(default = "default_database_name_column")]
    pub database_name_column: String,
    #[serde(default = "default_database_date_column")]
    pub database_date_column: String,

    #[serde(default)]
    pub label_fields: Vec<String>,
    #[serde(default)]
    pub tree_fields: Vec<String>,
    #[serde(default)]
    pub table_fields: Vec<String>,
    #[serde(default)]
    pub date_fields: Vec<String>,
    #[serde(default)]
    pub custom_tip_fields: Vec<String>,
    /// Traits coloured on the figures; the first colours the query markers.
    #[serde(default = "default_graphics")]
    pub graphics: Vec<GraphicTrait>,

    #[serde(default = "default_node_summary")]
    pub node_summary: String,
    #[serde(default = "default_domestic_country")]
    pub domestic_country: String,
    #[serde(default)]
    pub admin1_fallback: Admin1Fallback,

    #[serde(default = "default_oversize_threshold")]
    pub oversize_threshold: usize,
    #[serde(default = "default_genome_length")]
    pub genome_length: u32,
    #[serde(default)]
    pub remove_snp_table: bool,
    #[serde(default)]
    pub context_summary_field: Option<String>,
    /// Lineages first seen after this date count as new introductions.
    #[serde(default)]
    pub report_min_date: Option<String>,
}

fn default_input_column() -> String {
    "name".to_string()
}

fn default_database_name_column() -> String {
    "sequence_name".to_string()
}

fn default_database_date_column() -> String {
    "sample_date".to_string()
}

fn default_graphics() -> Vec<GraphicTrait> {
    vec![GraphicTrait::new("adm1", "default")]
}

fn default_node_summary() -> String {
    "country".to_string()
}

fn default_domestic_country() -> String {
    "UK".to_string()
}

fn default_oversize_threshold() -> usize {
    500
}

fn default_genome_length() -> u32 {
    29903
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_column: default_input_column(),
            display_name_column: None,
            database_name_column: default_database_name_column(),
            database_date_column: default_database_date_column(),
            label_fields: Vec::new(),
            tree_fields: Vec::new(),
            table_fields: Vec::new(),
            date_fields: Vec::new(),
            custom_tip_fields: Vec::new(),
            graphics: default_graphics(),
            node_summary: default_node_summary(),
            domestic_country: default_domestic_country(),
            admin1_fallback: Admin1Fallback::default(),
            oversize_threshold: default_oversize_threshold(),
            genome_length: default_genome_length(),
            remove_snp_table: false,
            context_summary_field: None,
            report_min_date: None,
        }
    }
}

impl ReportConfig {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "phylo-report", "phylo-report")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load `path`, or the per-user config file when no path is given. A
    /// missing per-user file yields the defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };
        Ok(config.normalise())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ReportConfig = toml::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> std::result::Result<(), Box<dyn std::error::Error>> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Strip whitespace from field names and declare every field a later
    /// stage reads: graphic traits join the tree fields (the marker trait
    /// first), custom tip fields and the context summary field join the
    /// label fields.
    pub fn normalise(mut self) -> Self {
        for list in [
            &mut self.label_fields,
            &mut self.tree_fields,
            &mut self.table_fields,
            &mut self.date_fields,
            &mut self.custom_tip_fields,
        ] {
            *list = list
                .iter()
                .map(|f| clean_key(f))
                .filter(|f| !f.is_empty())
                .collect();
        }
        for graphic in &mut self.graphics {
            graphic.field = clean_key(&graphic.field);
        }
        self.graphics.retain(|g| {
            if g.field.is_empty() {
                warn!("Ignoring graphic trait with an empty field name");
            }
            !g.field.is_empty()
        });
        for graphic in &self.graphics {
            if !self.tree_fields.contains(&graphic.field) {
                self.tree_fields.push(graphic.field.clone());
            }
        }
        if let Some(marker) = self.graphics.first() {
            self.tree_fields.retain(|f| f != &marker.field);
            self.tree_fields.insert(0, marker.field.clone());
        }

        self.context_summary_field = self
            .context_summary_field
            .as_deref()
            .map(clean_key)
            .filter(|f| !f.is_empty());
        let extra: Vec<String> = self
            .custom_tip_fields
            .iter()
            .cloned()
            .chain(self.context_summary_field.clone())
            .collect();
        for field in extra {
            if !self.label_fields.contains(&field) {
                debug!("Declaring `{}` as a label field", field);
                self.label_fields.push(field);
            }
        }
        self.node_summary = clean_key(&self.node_summary);
        self
    }

    pub fn display_name_column(&self) -> &str {
        self.display_name_column
            .as_deref()
            .unwrap_or(&self.input_column)
    }

    pub fn field_schema(&self) -> FieldSchema {
        FieldSchema::new(&self.label_fields, &self.tree_fields, &self.table_fields)
    }
}
