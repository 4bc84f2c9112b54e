//! Headless mode runner - main event loop without TUI
//!
//! Drives the engine from the message channel and stdin commands, and turns
//! engine events into NDJSON lines.

use std::path::PathBuf;

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use tsel_app::config::{Settings, SettingsOverrides};
use tsel_app::{
    AppState, Engine, EngineEvent, Message, RefreshTrigger, Selection, ServiceContext, TargetApi,
};
use tsel_core::prelude::*;

use super::HeadlessEvent;

/// A line read from stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessCommand {
    /// `select <connectUrl>`
    Select(String),
    /// `select-none`
    SelectNone,
    /// `refresh`
    Refresh,
    /// `quit`
    Quit,
}

impl HeadlessCommand {
    /// Parse one stdin line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match (word, rest) {
            ("", _) => Ok(None),
            ("select", "") => Err("select needs a connect URL".to_string()),
            ("select", url) => Ok(Some(Self::Select(url.to_string()))),
            ("select-none", "") => Ok(Some(Self::SelectNone)),
            ("refresh", "") => Ok(Some(Self::Refresh)),
            ("q" | "quit", "") => Ok(Some(Self::Quit)),
            _ => Err(format!("Unknown command: {line}")),
        }
    }

    /// Turn the command into an engine message against the current state
    pub fn into_message(self, state: &AppState) -> std::result::Result<Message, String> {
        match self {
            Self::Select(url) => state
                .targets
                .get(&url)
                .map(|target| Message::Select(Selection::Target(target.clone())))
                .ok_or_else(|| format!("Unknown target: {url}")),
            Self::SelectNone => Ok(Message::Select(Selection::Placeholder)),
            Self::Refresh => Ok(Message::RefreshTargets {
                trigger: RefreshTrigger::Manual,
            }),
            Self::Quit => Ok(Message::Quit),
        }
    }
}

/// Run in headless mode - output NDJSON events instead of the TUI
pub async fn run_headless(
    settings: Settings,
    config_path: Option<PathBuf>,
    overrides: SettingsOverrides,
) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("Target Select starting in HEADLESS mode");
    info!("Server: {}", settings.server.url);
    info!("═══════════════════════════════════════════════════════");

    let services = ServiceContext::connect(&settings)?;
    let mut engine = Engine::new(services, settings);
    engine.spawn_signal_handler();
    if let Some(path) = config_path {
        engine.watch_config(path, overrides);
    }

    let mut events = engine.subscribe();

    let (cmd_tx, cmd_rx) = mpsc::channel::<HeadlessCommand>(16);
    std::thread::spawn(move || {
        read_stdin_commands(cmd_tx);
    });

    engine.mount();

    let result = headless_event_loop(&mut engine, &mut events, cmd_rx).await;

    engine.shutdown().await;

    info!("Target Select headless mode exiting");
    result
}

/// Main headless event loop
async fn headless_event_loop<A>(
    engine: &mut Engine<A>,
    events: &mut broadcast::Receiver<EngineEvent>,
    mut cmd_rx: mpsc::Receiver<HeadlessCommand>,
) -> Result<()>
where
    A: TargetApi + Clone + Send + Sync + 'static,
{
    let mut stdin_open = true;

    loop {
        emit_pending_events(events);

        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        tokio::select! {
            msg = engine.msg_rx.recv() => match msg {
                Some(msg) => engine.process_message(msg),
                None => {
                    info!("Message channel closed");
                    break;
                }
            },
            cmd = cmd_rx.recv(), if stdin_open => match cmd {
                Some(cmd) => match cmd.into_message(&engine.state) {
                    Ok(msg) => engine.process_message(msg),
                    Err(e) => {
                        warn!("{}", e);
                        HeadlessEvent::error(e).emit();
                    }
                },
                // Keep reporting events after stdin ends
                None => stdin_open = false,
            },
        }
    }

    Ok(())
}

/// Write every engine event broadcast so far
fn emit_pending_events(events: &mut broadcast::Receiver<EngineEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => {
                if let Some(event) = HeadlessEvent::from_engine_event(&event) {
                    event.emit();
                }
            }
            Err(broadcast::error::TryRecvError::Lagged(n)) => {
                warn!("Headless output fell behind, {} events dropped", n);
            }
            Err(_) => break,
        }
    }
}

/// Forward stdin lines as commands (blocking; runs on its own thread)
fn read_stdin_commands(cmd_tx: mpsc::Sender<HeadlessCommand>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        match HeadlessCommand::parse(&line) {
            Ok(Some(cmd)) => {
                info!("Stdin: {:?}", cmd);
                let quit = cmd == HeadlessCommand::Quit;
                if cmd_tx.blocking_send(cmd).is_err() || quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!("{}", e);
                HeadlessEvent::error(e).emit();
            }
        }
    }

    info!("Stdin reader exiting");
}
