//! Config file watcher
//!
//! Watches the directory holding `config.toml` (editors often replace the
//! file rather than writing it in place) and reports debounced changes to
//! that one file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Default debounce duration in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Events reported by the [`ConfigWatcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatcherEvent {
    /// The config file was created, modified or replaced
    ConfigChanged,
    /// The watcher hit an error
    Error { message: String },
}

/// Watches a single config file for changes
pub struct ConfigWatcher {
    config_path: PathBuf,
    debounce: Duration,
    /// Handle to stop the watcher
    stop_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl ConfigWatcher {
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            stop_tx: None,
        }
    }

    /// Set debounce duration in milliseconds
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce = Duration::from_millis(ms);
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Start watching. Events are delivered on `event_tx`.
    pub fn start(&mut self, event_tx: mpsc::Sender<WatcherEvent>) -> Result<(), String> {
        if self.is_running() {
            return Err("Watcher is already running".to_string());
        }

        let watch_dir = match self.config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let Some(file_name) = self.config_path.file_name().map(|n| n.to_os_string()) else {
            return Err(format!(
                "Config path has no file name: {}",
                self.config_path.display()
            ));
        };

        let debounce = self.debounce;
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel();
        self.stop_tx = Some(stop_tx);

        // The debouncer is blocking; keep it off the async workers
        tokio::task::spawn_blocking(move || {
            Self::run_watcher(watch_dir, file_name, debounce, event_tx, stop_rx);
        });

        Ok(())
    }

    /// Stop the watcher
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    fn run_watcher(
        watch_dir: PathBuf,
        file_name: OsString,
        debounce: Duration,
        event_tx: mpsc::Sender<WatcherEvent>,
        mut stop_rx: tokio::sync::oneshot::Receiver<()>,
    ) {
        let tx_clone = event_tx.clone();

        let debouncer_result = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let touched = events.iter().any(|event| {
                        event
                            .paths
                            .iter()
                            .any(|path| path.file_name() == Some(file_name.as_os_str()))
                    });
                    if touched {
                        debug!("Config file changed");
                        let _ = tx_clone.blocking_send(WatcherEvent::ConfigChanged);
                    }
                }
                Err(errors) => {
                    for error in errors {
                        warn!("Config watcher error: {:?}", error);
                        let _ = tx_clone.blocking_send(WatcherEvent::Error {
                            message: error.to_string(),
                        });
                    }
                }
            }
        });

        let mut debouncer = match debouncer_result {
            Ok(d) => d,
            Err(e) => {
                error!("Failed to create config watcher: {}", e);
                let _ = event_tx.blocking_send(WatcherEvent::Error {
                    message: format!("Failed to create watcher: {}", e),
                });
                return;
            }
        };

        if !watch_dir.exists() {
            warn!("Config directory does not exist: {}", watch_dir.display());
            return;
        }
        if let Err(e) = debouncer.watch(&watch_dir, RecursiveMode::NonRecursive) {
            warn!("Failed to watch {}: {}", watch_dir.display(), e);
            return;
        }
        info!("Watching config in {}", watch_dir.display());

        // Keep running until stop signal
        loop {
            match stop_rx.try_recv() {
                Ok(()) | Err(tokio::sync::oneshot::error::TryRecvError::Closed) => {
                    info!("Config watcher stopping");
                    break;
                }
                Err(tokio::sync::oneshot::error::TryRecvError::Empty) => {
                    std::thread::sleep(Duration::from_millis(100));
                }
            }
        }
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
