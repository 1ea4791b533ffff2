use clap::Parser;
use log::LevelFilter;
use phylo_report::cli::{Args, Commands};
use phylo_report::commands;
use phylo_report::commands::report::ReportInputs;

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = match args.command {
        Commands::Report {
            tree_dir,
            filtered,
            query,
            background,
            output_dir,
            config,
            qc_fails,
            quiet,
        } => commands::report::run(
            ReportInputs {
                tree_dir,
                filtered,
                query,
                background,
                output_dir,
                qc_fails,
                quiet,
            },
            config,
        ),
        Commands::Tips { tree_dir } => commands::tips::run(tree_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
