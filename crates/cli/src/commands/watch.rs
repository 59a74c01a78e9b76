//! `crossline watch`: rescan on an interval and on config changes.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tokio::sync::watch;
use tracing::{info, warn};

use crossline_core::{AppConfig, ConfigWatcher};

use super::scan::{run_scan, ScanArgs};

/// Arguments for the watch command.
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Seconds between scans.
    #[arg(long, default_value = "60")]
    pub interval_secs: u64,
}

/// Runs scans until interrupted.
///
/// A scan also runs as soon as `config_path` changes; an invalid edit is
/// ignored and the last good configuration stays in effect.
pub async fn run_watch(config_path: PathBuf, config: AppConfig, args: &WatchArgs) -> Result<()> {
    let (watcher, config_rx) = ConfigWatcher::new(config);

    let watched = config_path.clone();
    tokio::spawn(async move {
        if let Err(e) = watcher.watch(&watched).await {
            warn!(path = %watched.display(), error = %e, "Config watching stopped");
        }
    });

    info!(
        interval_secs = args.interval_secs,
        config = %config_path.display(),
        "Watching for arbitrage"
    );

    let interval = Duration::from_secs(args.interval_secs.max(1));
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Could not listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    let scan_args = &args.scan;
    let scans = watch_until(config_rx, interval, shutdown, move |current| async move {
        run_scan(&current, scan_args).await
    })
    .await;

    info!(scans, "Interrupted, stopping");
    Ok(())
}

/// Runs `scan` on every tick and config change until `shutdown` resolves,
/// including while a scan is in flight. Returns the number of scans started.
async fn watch_until<S, F, Fut>(
    mut config_rx: watch::Receiver<AppConfig>,
    interval: Duration,
    shutdown: S,
    mut scan: F,
) -> usize
where
    S: Future<Output = ()>,
    F: FnMut(AppConfig) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(interval);
    let mut watching = true;
    let mut scans = 0;

    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => break,
            _ = ticker.tick() => {}
            changed = config_rx.changed(), if watching => {
                if changed.is_err() {
                    watching = false;
                    continue;
                }
                info!("Configuration changed, rescanning");
                ticker.reset();
            }
        }

        let current = config_rx.borrow_and_update().clone();
        scans += 1;
        tokio::select! {
            biased;
            () = &mut shutdown => break,
            result = scan(current) => {
                if let Err(e) = result {
                    warn!(error = %e, "Scan failed");
                }
            }
        }
    }

    scans
}
