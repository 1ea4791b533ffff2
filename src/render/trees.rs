use super::theme::{Palette, Theme};
use super::tree_figure::{draw_tree, FigureSettings, ROOT_STUB_LENGTH};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::reconcile::Reconciled;
use crate::summary::{summarise_large_tree, LargeTreeSummary};
use crate::tree::{read_tree_file, PhyloTree, TipScan};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to one tree of the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TreeOutcome {
    Rendered { figure: PathBuf },
    Oversized(LargeTreeSummary),
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeResult {
    pub tree: String,
    #[serde(flatten)]
    pub outcome: TreeOutcome,
}

impl TreeResult {
    pub fn large_tree(&self) -> Option<&LargeTreeSummary> {
        match &self.outcome {
            TreeOutcome::Oversized(summary) => Some(summary),
            _ => None,
        }
    }
}

/// One palette per graphic trait, over the values the queries carry.
pub fn build_palettes(
    config: &ReportConfig,
    reconciled: &Reconciled,
    theme: &dyn Theme,
) -> Vec<Palette> {
    config
        .graphics
        .iter()
        .map(|graphic| {
            let values: BTreeSet<String> = reconciled
                .queries()
                .map(|t| t.attributes.value(&graphic.field).to_string())
                .collect();
            theme.palette(&graphic.field, &graphic.scheme, &values)
        })
        .collect()
}

enum Prepared {
    Done(TreeOutcome),
    Ready(PhyloTree),
}

/// Render every tree of the scan into `figure_dir/<tree>.svg`, in tree
/// index order.
///
/// Trees that cannot be parsed or declare at most one tip are skipped.
/// Trees whose expanded tip count is over the configured threshold are
/// summarised instead of drawn.
pub fn render_trees(
    scan: &TipScan,
    reconciled: &Reconciled,
    config: &ReportConfig,
    palettes: &[Palette],
    figure_dir: &Path,
    theme: &dyn Theme,
) -> Result<Vec<TreeResult>> {
    let mut prepared = Vec::with_capacity(scan.trees.len());
    let mut tallest: f64 = 0.0;

    for entry in &scan.trees {
        let id = entry.id.clone();
        if scan.unreadable_trees.contains(&id) {
            prepared.push((id, Prepared::Done(skipped("tree could not be parsed"))));
            continue;
        }
        let file = match read_tree_file(&entry.tree_path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Skipping {}: {}", id, e);
                prepared.push((id, Prepared::Done(skipped("tree could not be parsed"))));
                continue;
            }
        };
        if file.declared_tips <= 1 {
            warn!("Skipping {}: {} tip(s)", id, file.declared_tips);
            prepared.push((id, Prepared::Done(skipped("tree has at most one tip"))));
            continue;
        }

        let mut tree = file.tree;
        tree.layout();
        tree.add_root_stub(ROOT_STUB_LENGTH);
        tallest = tallest.max(tree.tree_height());

        let tips = scan
            .tree_to_all_tips
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        if tips.len() > config.oversize_threshold {
            warn!(
                "{} has {} tips, over the limit of {}; summarising instead of drawing",
                id,
                tips.len(),
                config.oversize_threshold
            );
            let summary = summarise_large_tree(&id, tips, reconciled);
            prepared.push((id, Prepared::Done(TreeOutcome::Oversized(summary))));
            continue;
        }
        prepared.push((id, Prepared::Ready(tree)));
    }
    debug!("Tallest tree height {}", tallest);

    let settings = FigureSettings {
        tree_fields: &config.tree_fields,
        custom_tip_fields: &config.custom_tip_fields,
        palettes,
        genome_length: config.genome_length,
        tallest_height: tallest,
    };

    let mut results = Vec::with_capacity(prepared.len());
    for (id, item) in prepared {
        let outcome = match item {
            Prepared::Done(outcome) => outcome,
            Prepared::Ready(tree) => {
                let svg = draw_tree(&tree, &id, &reconciled.taxa, scan, &settings, theme);
                fs::create_dir_all(figure_dir)?;
                let figure = figure_dir.join(format!("{}.svg", id));
                fs::write(&figure, svg)?;
                info!("Wrote {}", figure.display());
                TreeOutcome::Rendered { figure }
            }
        };
        results.push(TreeResult { tree: id, outcome });
    }
    Ok(results)
}

fn skipped(reason: &str) -> TreeOutcome {
    TreeOutcome::Skipped {
        reason: reason.to_string(),
    }
}
