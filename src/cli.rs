use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Increase logging verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile metadata and draw the report trees, tables and charts
    Report {
        /// Directory holding the <stem>_<n>.tree files and their membership files
        #[arg(long)]
        tree_dir: PathBuf,
        /// Filtered comparison CSV (query_id, query, closest, SNPdistance, SNPs, ...)
        #[arg(long)]
        filtered: PathBuf,
        /// Query CSV supplied by the user
        #[arg(long)]
        query: PathBuf,
        /// Background database metadata CSV
        #[arg(long)]
        background: PathBuf,
        /// Directory for figures, tables and JSON summaries
        #[arg(short = 'o', long, default_value = "report")]
        output_dir: PathBuf,
        /// Configuration file (defaults to the platform config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// CSV of sequences that failed QC (name, reason_for_failure)
        #[arg(long)]
        qc_fails: Option<PathBuf>,
        /// Hide progress spinners
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the trees in a tree directory with their expanded tip counts
    Tips {
        /// Directory holding the tree files
        tree_dir: PathBuf,
    },
}
