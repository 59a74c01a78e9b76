use crate::config::AppConfig;
use crate::config_loader::ConfigLoader;
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// Publishes a freshly loaded [`AppConfig`] whenever the config file changes.
///
/// Reloads that fail to parse or validate are logged and dropped, so
/// subscribers keep the last good thresholds. Reloads that produce the
/// configuration already published do not wake subscribers.
pub struct ConfigWatcher {
    tx: watch::Sender<AppConfig>,
}

impl ConfigWatcher {
    #[must_use]
    pub fn new(initial_config: AppConfig) -> (Self, watch::Receiver<AppConfig>) {
        let (tx, rx) = watch::channel(initial_config);
        (Self { tx }, rx)
    }

    /// Blocks (on a blocking task) until the watcher shuts down.
    ///
    /// The parent directory is watched rather than the file itself because
    /// editors commonly replace the file on save.
    ///
    /// # Errors
    /// Returns an error if the watch cannot be installed.
    pub async fn watch(&self, config_path: impl AsRef<Path>) -> Result<()> {
        let tx = self.tx.clone();
        let config_path: PathBuf = config_path.as_ref().to_path_buf();
        let dir = match config_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = config_path
            .file_name()
            .map(ToOwned::to_owned)
            .with_context(|| format!("{} has no file name", config_path.display()))?;

        tokio::task::spawn_blocking(move || {
            let (event_tx, event_rx) = std::sync::mpsc::channel();

            let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
                if let Ok(event) = res {
                    let _ = event_tx.send(event);
                }
            })?;
            watcher.watch(&dir, RecursiveMode::NonRecursive)?;

            for event in event_rx {
                let touches_file = event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == Some(file_name.as_os_str()));
                if !touches_file || !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    continue;
                }

                tracing::debug!(path = %config_path.display(), "Config file touched");
                publish_reload(&tx, ConfigLoader::load_from(&config_path));
            }

            Ok::<_, anyhow::Error>(())
        })
        .await??;

        Ok(())
    }
}

/// Returns true when subscribers were notified.
fn publish_reload(tx: &watch::Sender<AppConfig>, reloaded: Result<AppConfig>) -> bool {
    match reloaded {
        Ok(new_config) => {
            let changed = tx.send_if_modified(|current| {
                if *current == new_config {
                    false
                } else {
                    *current = new_config;
                    true
                }
            });
            if changed {
                tracing::info!("Config reloaded");
            }
            changed
        }
        Err(e) => {
            tracing::error!(error = %e, "Config reload failed, keeping previous");
            false
        }
    }
}
