//! Quit on SIGINT/SIGTERM (Ctrl+C on Windows)
//!
//! In headless mode nothing reads the keyboard, so this is the only way the
//! engine learns it should shut its subscriptions down.

use std::fmt;

use tokio::sync::mpsc;

use crate::message::Message;
use tsel_core::prelude::*;

/// Which OS signal asked us to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Interrupt => write!(f, "interrupt"),
            ShutdownSignal::Terminate => write!(f, "terminate"),
        }
    }
}

/// Send [`Message::Quit`] on the engine channel once a signal arrives.
///
/// If handlers cannot be installed the task only logs; keyboard quit still
/// works in the TUI.
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(signal) => {
                info!("Received {} signal, quitting", signal);
                let _ = tx.send(Message::Quit).await;
            }
            Err(e) => warn!("Signal handlers unavailable: {}", e),
        }
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<ShutdownSignal> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    Ok(tokio::select! {
        _ = sigint.recv() => ShutdownSignal::Interrupt,
        _ = sigterm.recv() => ShutdownSignal::Terminate,
    })
}

#[cfg(windows)]
async fn wait_for_signal() -> Result<ShutdownSignal> {
    tokio::signal::ctrl_c().await?;
    Ok(ShutdownSignal::Interrupt)
}
