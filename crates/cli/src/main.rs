use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crossline_core::{ConfigLoader, DEFAULT_CONFIG_PATH};

mod commands;
mod presenter;
mod sources;

use commands::{AuditArgs, MatchArgs, ScanArgs, WatchArgs};

#[derive(Parser)]
#[command(name = "crossline")]
#[command(
    about = "Cross-exchange arbitrage scanner for Polymarket and Kalshi college basketball",
    long_about = None
)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch both sources once and print the ranked matches
    Scan(ScanArgs),
    /// Rescan on an interval and whenever the config file changes
    Watch(WatchArgs),
    /// Print raw prices from both sources
    Audit(AuditArgs),
    /// Find the best counterpart for a title in the other source
    Match(MatchArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ConfigLoader::load_from(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    match cli.command {
        Commands::Scan(args) => {
            commands::run_scan(&config, &args).await?;
        }
        Commands::Watch(args) => {
            commands::run_watch(cli.config, config, &args).await?;
        }
        Commands::Audit(args) => {
            commands::run_audit(&config, &args).await?;
        }
        Commands::Match(args) => {
            commands::run_match(&config, &args).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan_with_overrides() {
        let cli = Cli::try_parse_from([
            "crossline",
            "scan",
            "--name-threshold",
            "80",
            "--top",
            "10",
            "--kalshi-no-price",
            "inverse-yes-ask",
            "--poly-file",
            "events.json",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        let Commands::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.thresholds.name_threshold, Some(80));
        assert_eq!(args.top, 10);
        assert!(!args.all);
        assert_eq!(
            args.thresholds.kalshi_no_price,
            Some(commands::scan::NoPriceArg::InverseYesAsk)
        );
        assert_eq!(args.sources.poly_file, Some(PathBuf::from("events.json")));
    }

    #[test]
    fn test_parse_watch_and_global_config() {
        let cli = Cli::try_parse_from([
            "crossline",
            "watch",
            "--interval-secs",
            "30",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        let Commands::Watch(args) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(args.interval_secs, 30);
        assert_eq!(args.scan.top, 5);
    }

    #[test]
    fn test_parse_match() {
        let cli = Cli::try_parse_from([
            "crossline",
            "match",
            "Duke vs. North Carolina",
            "--against",
            "polymarket",
        ])
        .unwrap();

        let Commands::Match(args) = cli.command else {
            panic!("expected match");
        };
        assert_eq!(args.title, "Duke vs. North Carolina");
        assert_eq!(args.against, commands::match_title::Against::Polymarket);
    }
}
