//! Americas Immigration - foreign-born population dataset builder
//!
//! Fetches ACS 2024 1-year table B05006 from the Census API, derives the
//! nine display regions with their shares, and writes `public/data.json`
//! for the static frontend.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any failure (fetch, parse, missing variable, zero total, write)

mod analysis;
mod census;
mod cli;
mod config;
mod error;
mod models;
mod report;

use anyhow::{Context, Result};
use census::CensusClient;
use cli::Args;
use config::Config;
use models::{RawVariables, Report, Variable};
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("americas-immigration v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .census-data.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::DEFAULT_CONFIG_FILE);
    println!("   Pass it with --config to use it.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Fetch, compute and write: one pass, no retries.
async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    println!("Fetching ACS 2024 B05006 data from Census API...");
    let client = CensusClient::new(config.census.clone(), !args.quiet)
        .context("Failed to create HTTP client")?;
    let raw = client.fetch().await?;
    println!(
        "  Total foreign-born: {}",
        report::format_count(raw.get(Variable::Total)?)
    );

    publish(&raw, &config.output.path, args.dry_run)?;

    println!("Done.");
    Ok(())
}

/// Compute the report and write it to `output`.
///
/// The file is only touched once the report has been fully computed.
fn publish(raw: &RawVariables, output: &Path, dry_run: bool) -> Result<Report> {
    println!("Computing regions and shares...");
    let report = analysis::compute_regions(raw)?;
    println!("  {} regions computed", report.regions.len());
    println!(
        "  Americas total share: {:.1}%",
        report.americas_total_share_percent
    );
    print!("{}", report::render_summary(&report));

    if dry_run {
        println!("Dry run: not writing {}", output.display());
        return Ok(report);
    }

    println!("Writing {}...", output.display());
    report::write_report(&report, output)?;
    info!("Wrote {} regions to {}", report.regions.len(), output.display());

    Ok(report)
}

/// Load configuration from an explicit file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        Some(ref config_path) => {
            info!("Loading config from: {}", config_path.display());
            Config::load(config_path)?
        }
        None => {
            debug!("No config file given, using defaults");
            Config::default()
        }
    };

    config.merge_with_args(args);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture() -> RawVariables {
        [
            (Variable::Total, 50234841),
            (Variable::Europe, 4876543),
            (Variable::Asia, 14234567),
            (Variable::WesternAsia, 1234567),
            (Variable::Africa, 2987654),
            (Variable::NorthernAfrica, 654321),
            (Variable::Caribbean, 5280123),
            (Variable::CentralAmerica, 5123456),
            (Variable::Mexico, 11143711),
            (Variable::SouthAmerica, 4812345),
            (Variable::Canada, 700000),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_publish_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("public").join("data.json");

        let report = publish(&fixture(), &path, false).unwrap();

        let written: Report =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, report);
        assert_eq!(written.americas_total_share_percent, 31.7);
    }

    #[test]
    fn test_publish_missing_key_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("public").join("data.json");
        let mut raw = fixture();
        raw.remove(Variable::Canada);

        let err = publish(&raw, &path, false).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::KeyMissing(code)) if code == "B05006_177E"
        ));
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn test_publish_keeps_existing_file_on_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        std::fs::write(&path, "previous").unwrap();
        let mut raw = fixture();
        raw.insert(Variable::Total.code(), 0);

        assert!(publish(&raw, &path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn test_publish_dry_run() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");

        let report = publish(&fixture(), &path, true).unwrap();

        assert_eq!(report.regions.len(), 9);
        assert!(!path.exists());
    }

    #[test]
    fn test_load_config_merges_args() {
        let args = Args {
            output: Some(PathBuf::from("elsewhere/data.json")),
            timeout: Some(5),
            ..Args::default()
        };

        let config = load_config(&args).unwrap();

        assert_eq!(config.output.path, PathBuf::from("elsewhere/data.json"));
        assert_eq!(config.census.timeout_seconds, 5);
    }
}
