use crate::config::ReportConfig;
use crate::dates::parse_date;
use crate::export::{
    ExportMetadata, NodeSummaryExport, ReportData, ReportExport, RunExport, Table,
};
use crate::geography::{Adm2Lookup, GeographyNormalizer};
use crate::reconcile::{MetadataSources, Reconciler};
use crate::render::{
    build_palettes, draw_legend, node_charts, render_trees, tree_chart, DefaultTheme, Theme,
    TreeOutcome,
};
use crate::summary::{large_tree_table, node_table, tree_trait_counts, LargeTreeSummary};
use crate::tables::{context_table, new_introductions, qc_fail_table, query_tables};
use crate::tree::scan_tree_dir;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

/// Input files and output directory of a report run.
#[derive(Debug, Clone)]
pub struct ReportInputs {
    pub tree_dir: PathBuf,
    pub filtered: PathBuf,
    pub query: PathBuf,
    pub background: PathBuf,
    pub output_dir: PathBuf,
    pub qc_fails: Option<PathBuf>,
    /// Hide the progress spinners.
    pub quiet: bool,
}

pub fn run(inputs: ReportInputs, config_path: Option<PathBuf>) -> Result<()> {
    let config = ReportConfig::load(config_path.as_deref())
        .context("Failed to load the report configuration")?;
    let run = generate(&inputs, &config, &DefaultTheme)?;
    info!(
        "Report written to {}: {} of {} trees drawn, {} files",
        inputs.output_dir.display(),
        run.rendered(),
        run.trees.len(),
        run.files.len()
    );
    Ok(())
}

fn write_table(table: &Table, path: PathBuf, files: &mut Vec<PathBuf>) -> Result<()> {
    table
        .write_csv(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    files.push(path);
    Ok(())
}

fn write_figure(svg: &str, path: PathBuf, files: &mut Vec<PathBuf>) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
    files.push(path);
    Ok(())
}

/// Scan, reconcile, summarise and render one report with an already
/// normalised configuration.
pub fn generate(
    inputs: &ReportInputs,
    config: &ReportConfig,
    theme: &dyn Theme,
) -> Result<RunExport> {
    let tables_dir = inputs.output_dir.join("tables");
    let figures_dir = inputs.output_dir.join("figures");
    let json_dir = inputs.output_dir.join("json");
    let mut files = Vec::new();

    let progress = ProgressBarBuilder::new("Scanning tree tips...")
        .hidden(inputs.quiet)
        .build();
    let scan = scan_tree_dir(&inputs.tree_dir).with_context(|| {
        format!("Failed to scan trees in {}", inputs.tree_dir.display())
    })?;
    progress.finish_with_message(format!(
        "Scanned {} trees, {} sequences present",
        scan.trees.len(),
        scan.present_in_tree.len()
    ));

    let progress = ProgressBarBuilder::new("Reconciling metadata...")
        .hidden(inputs.quiet)
        .build();
    let lookup = Adm2Lookup::derive_from_background(&inputs.background, &config.domestic_country)
        .context("Failed to build the admin-2 lookup")?;
    let normalizer = GeographyNormalizer::new(config.domestic_country.as_str(), config.admin1_fallback)
        .with_lookup(lookup);
    let schema = config.field_schema();
    let reconciled = Reconciler::new(config, &schema, &normalizer, &scan)
        .run(MetadataSources {
            filtered: &inputs.filtered,
            query: &inputs.query,
            background: &inputs.background,
        })
        .context("Failed to reconcile metadata")?;
    progress.finish_with_message(format!(
        "Reconciled {} records, {} queries",
        reconciled.taxa.len(),
        reconciled.query_order.len()
    ));
    for missing in &reconciled.unmatched_queries {
        warn!("Query {} was not found in the filtered metadata", missing);
    }

    let queries = query_tables(&reconciled, &config.table_fields, config.remove_snp_table);
    if let Some(table) = &queries.in_database {
        write_table(table, tables_dir.join("query_in_database.csv"), &mut files)?;
    }
    if let Some(table) = &queries.sequence_provided {
        write_table(table, tables_dir.join("query_sequence_provided.csv"), &mut files)?;
    }

    if let Some(field) = &config.context_summary_field {
        let summary = context_table(&reconciled, field, &config.domestic_country);
        for name in &summary.without_value {
            warn!("No {} known for query {}", field, name);
        }
        write_table(&summary.table, tables_dir.join("context_summary.csv"), &mut files)?;
    }

    if let Some(path) = &inputs.qc_fails {
        let table = qc_fail_table(path, &reconciled)
            .with_context(|| format!("Failed to read QC failures from {}", path.display()))?;
        write_table(&table, tables_dir.join("qc_fails.csv"), &mut files)?;
    }

    if let Some(min_date) = &config.report_min_date {
        let min_date = parse_date(min_date, "report_min_date").context("Invalid configuration")?;
        let table = new_introductions(&reconciled, min_date);
        if !table.is_empty() {
            write_table(&table, tables_dir.join("new_introductions.csv"), &mut files)?;
        }
    }

    for entry in &scan.trees {
        let table = node_table(&entry.id, &scan, &reconciled.taxa, &config.domestic_country);
        if !table.is_empty() {
            let path = tables_dir.join(format!("{}_collapsed_nodes.csv", entry.id));
            write_table(&table, path, &mut files)?;
        }
    }

    let tree_counts = tree_trait_counts(&reconciled);
    let node_summary = NodeSummaryExport::build(
        &scan,
        &reconciled,
        &tree_counts,
        &config.node_summary,
        &config.domestic_country,
    );
    for (tree, summary) in &node_summary.trees {
        if let Some(svg) = node_charts(&summary.node_trait_counts, theme) {
            write_figure(&svg, figures_dir.join(format!("{}_collapsed_nodes.svg", tree)), &mut files)?;
        }
        if let Some(svg) = summary
            .context_trait_counts
            .as_ref()
            .and_then(|counts| tree_chart(tree, counts, theme))
        {
            write_figure(&svg, figures_dir.join(format!("{}_context.svg", tree)), &mut files)?;
        }
    }

    let metadata = ExportMetadata {
        tree_name_stem: scan.tree_name_stem.clone(),
        domestic_country: config.domestic_country.clone(),
        node_summary_field: config.node_summary.clone(),
        genome_length: config.genome_length,
    };
    let path = json_dir.join("node_summary.json");
    ReportExport::new(ReportData::NodeSummary(node_summary), metadata.clone())
        .write_json(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    files.push(path);

    let progress = ProgressBarBuilder::new("Drawing trees...")
        .hidden(inputs.quiet)
        .build();
    let palettes = build_palettes(config, &reconciled, theme);
    let trees = render_trees(&scan, &reconciled, config, &palettes, &figures_dir, theme)
        .context("Failed to draw trees")?;
    progress.finish_with_message(format!("Drew {} trees", trees.len()));

    if let Some(svg) = draw_legend(&palettes) {
        write_figure(&svg, figures_dir.join("legend.svg"), &mut files)?;
    }

    let large: Vec<LargeTreeSummary> = trees.iter().filter_map(|t| t.large_tree().cloned()).collect();
    if !large.is_empty() {
        write_table(&large_tree_table(&large), tables_dir.join("large_trees.csv"), &mut files)?;
    }

    for tree in &trees {
        if let TreeOutcome::Rendered { figure } = &tree.outcome {
            files.push(figure.clone());
        }
    }
    let path = json_dir.join("run.json");
    files.push(path.clone());

    let run = RunExport {
        query_count: reconciled.full_query_count,
        matched_query_count: reconciled
            .full_query_count
            .saturating_sub(reconciled.unmatched_queries.len()),
        unmatched_queries: reconciled.unmatched_queries.clone(),
        trees,
        palettes,
        files,
    };
    ReportExport::new(ReportData::Run(run.clone()), metadata)
        .write_json(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(run)
}
