use crate::render::{Palette, TreeOutcome, TreeResult};
use serde::Serialize;
use std::path::PathBuf;

/// What a report run produced, tree by tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunExport {
    pub query_count: usize,
    pub matched_query_count: usize,
    pub unmatched_queries: Vec<String>,
    pub trees: Vec<TreeResult>,
    pub palettes: Vec<Palette>,
    pub files: Vec<PathBuf>,
}

impl RunExport {
    pub fn rendered(&self) -> usize {
        self.trees
            .iter()
            .filter(|t| matches!(t.outcome, TreeOutcome::Rendered { .. }))
            .count()
    }
}
