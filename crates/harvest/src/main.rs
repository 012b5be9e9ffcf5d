use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use tracing::info;
use tracing_subscriber::EnvFilter;

use harvest_core::config::RunConfig;
use harvest_core::outputs::write_unified_output;
use harvest_core::pipelines::{self, ExecutionContext, PipelineSummary};

const CONFIG_ENV_VAR: &str = "HARVEST_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "harvest.toml";

#[derive(Parser, Debug)]
#[command(author, version, about = "CAF harvest aggregation pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline and write the unified yield/biomass table
    Run(RunArgs),
    /// Load and validate every input without writing outputs
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Path to the run configuration TOML
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the configured output directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Also write a Parquet copy of the unified table
    #[arg(long)]
    parquet: bool,
}

#[derive(Args, Debug, Default)]
struct CheckArgs {
    /// Path to the run configuration TOML
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Check(args) => handle_check(args),
    }
}

fn handle_run(args: RunArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(dir) = args.output_dir {
        config.output.directory = dir;
    }
    if args.parquet {
        config.output.write_parquet = true;
    }

    let ctx = ExecutionContext::load(config).context("failed to load pipeline inputs")?;
    let run = pipelines::run(&ctx).context("pipeline failed")?;
    let written = write_unified_output(
        &run.dataframe,
        &run.summary,
        &ctx.config.output,
        Utc::now().date_naive(),
    )
    .context("failed to write outputs")?;

    print_summary(&run.summary);
    println!("\nWrote {}", written.csv_path.display());
    if let Some(path) = written.parquet_path {
        println!("Wrote {}", path.display());
    }
    if let Some(path) = written.summary_path {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_check(args: CheckArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let ctx = ExecutionContext::load(config).context("failed to load pipeline inputs")?;
    let run = pipelines::run(&ctx).context("pipeline failed")?;

    print_summary(&run.summary);
    println!("\nCheck passed; no outputs written.");
    Ok(())
}

fn load_config(flag: Option<&Path>) -> Result<RunConfig> {
    let path: PathBuf = match flag {
        Some(path) => path.to_path_buf(),
        None => env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH)),
    };
    info!(path = %path.display(), "loading run configuration");
    RunConfig::load(&path)
        .with_context(|| format!("failed to load run configuration from '{}'", path.display()))
}

fn print_summary(summary: &PipelineSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        "Year",
        "Parsed",
        "Filtered",
        "QA applied",
        "QA unmatched",
        "NIR matched",
        "No georef",
        "Rows out",
    ]);

    for year in &summary.years {
        table.add_row(vec![
            year.year.to_string(),
            year.rows_parsed.to_string(),
            year.rows_filtered.to_string(),
            year.qa_overrides_applied.to_string(),
            year.qa_overrides_unmatched.to_string(),
            year.nir_samples_matched
                .map(|count| count.to_string())
                .unwrap_or_else(|| "-".to_string()),
            year.rows_missing_georef.to_string(),
            year.rows_out.to_string(),
        ]);
    }

    println!("{table}");
    println!("Total rows: {}", summary.total_rows);
}
