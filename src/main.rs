mod pipeline;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use oncolens_rf::SplitCriterion;

use crate::pipeline::{Analysis, AnalysisOptions};
use crate::report::{TextReport, render_json};

#[derive(Parser)]
#[command(name = "oncolens")]
#[command(about = "Random-forest tumor classification on the Wisconsin diagnostic breast cancer data")]
#[command(version)]
struct Cli {
    /// RNG seed for the train/test split and the forest
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.3)]
    test_size: f64,

    /// Number of trees in the Random Forest
    #[arg(long, default_value_t = 100)]
    n_trees: usize,

    /// Maximum tree depth (unlimited if not set)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Split criterion: "gini" or "entropy"
    #[arg(long, default_value = "gini")]
    criterion: String,

    /// Output directory for the SVG figures
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip rendering the figures
    #[arg(long, default_value_t = false)]
    no_plots: bool,

    /// Print a JSON summary instead of the text report
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Number of ranked feature importances to report
    #[arg(long, default_value_t = 5)]
    top_features: usize,

    /// Enable verbose (debug-level) logging
    #[arg(long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,
}

fn parse_criterion(s: &str) -> Result<SplitCriterion> {
    match s {
        "gini" => Ok(SplitCriterion::Gini),
        "entropy" => Ok(SplitCriterion::Entropy),
        other => anyhow::bail!("unknown criterion: {other} (expected gini or entropy)"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report.
    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    let options = AnalysisOptions {
        seed: cli.seed,
        test_fraction: cli.test_size,
        n_trees: cli.n_trees,
        max_depth: cli.max_depth,
        criterion: parse_criterion(&cli.criterion)?,
        output_dir: (!cli.no_plots).then_some(cli.output_dir),
        top_features: cli.top_features,
    };

    let report = Analysis::new(options).run()?;

    // Print report

    if cli.json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", TextReport(&report));
    }

    info!("done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_uses_fixed_defaults() {
        let cli = Cli::try_parse_from(["oncolens"]).unwrap();
        assert_eq!(cli.seed, 42);
        assert_eq!(cli.test_size, 0.3);
        assert_eq!(cli.n_trees, 100);
        assert_eq!(cli.max_depth, None);
        assert_eq!(parse_criterion(&cli.criterion).unwrap(), SplitCriterion::Gini);
        assert!(!cli.no_plots && !cli.json);
    }

    #[test]
    fn unknown_criterion_rejected() {
        assert!(parse_criterion("log_loss").is_err());
        assert_eq!(parse_criterion("entropy").unwrap(), SplitCriterion::Entropy);
    }
}
