//! Forum-Sweep main entry point
//!
//! This is the command-line interface for the Forum-Sweep scraper.

use clap::Parser;
use forum_sweep::config::{load_config_with_hash, validate, Config};
use forum_sweep::crawler::run_scrape;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Forum-Sweep: scrape every page of a board search into a CSV table
///
/// Forum-Sweep finds how many result pages a keyword search has, fetches
/// them concurrently and writes the post rows, in page order, to a table.
#[derive(Parser, Debug)]
#[command(name = "forum-sweep")]
#[command(version)]
#[command(about = "Scrape a forum board search into a CSV table", long_about = None)]
struct Cli {
    /// Search keyword; multiple words are joined with spaces
    #[arg(value_name = "KEYWORD", required = true)]
    keyword: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Board name, overriding the configuration
    #[arg(long)]
    board_name: Option<String>,

    /// Board id, overriding the configuration
    #[arg(long)]
    board_id: Option<u32>,

    /// Output table path, overriding the configuration
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum pages fetched at once (0 = no limit)
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Retries per request after the first attempt
    #[arg(long)]
    retries: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config)?;

    let keyword = cli.keyword.join(" ");
    match run_scrape(config, &keyword).await {
        Ok(report) => {
            if !cli.quiet {
                println!(
                    "✓ {} row(s) from {} page(s) written to {}",
                    report.rows_written,
                    report.pages_discovered,
                    report.table_path.display()
                );
                if !report.is_complete() {
                    println!("  incomplete: pages {:?} failed", report.failed_pages);
                }
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("forum_sweep=info,warn"),
            1 => EnvFilter::new("forum_sweep=debug,info"),
            2 => EnvFilter::new("forum_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(name) = &cli.board_name {
        config.site.board_name = name.clone();
    }
    if let Some(id) = cli.board_id {
        config.site.board_id = id;
    }
    if let Some(output) = &cli.output {
        config.output.table_path = output.to_string_lossy().into_owned();
    }
    if let Some(limit) = cli.max_concurrent {
        config.scraper.max_concurrent_pages = limit;
    }
    if let Some(retries) = cli.retries {
        config.scraper.max_retries = retries;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_keyword_words() {
        let cli = Cli::try_parse_from(["forum-sweep", "gold", "saucer"]).unwrap();
        assert_eq!(cli.keyword.join(" "), "gold saucer");
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_requires_keyword() {
        assert!(Cli::try_parse_from(["forum-sweep"]).is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::try_parse_from([
            "forum-sweep",
            "--board-name",
            "lounge",
            "--board-id",
            "9",
            "-o",
            "out.csv",
            "--max-concurrent",
            "0",
            "--retries",
            "2",
            "kw",
        ])
        .unwrap();

        let mut config = Config::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.site.board_name, "lounge");
        assert_eq!(config.site.board_id, 9);
        assert_eq!(config.output.table_path, "out.csv");
        assert_eq!(config.scraper.max_concurrent_pages, 0);
        assert_eq!(config.scraper.max_retries, 2);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["forum-sweep", "-q", "-v", "kw"]).is_err());
    }
}
