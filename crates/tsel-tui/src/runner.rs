//! Main TUI runner - entry point and event loop

use std::path::PathBuf;

use ratatui::backend::Backend;
use ratatui::Terminal;
use tsel_app::config::{Settings, SettingsOverrides};
use tsel_app::{Engine, ServiceContext, TargetApi};
use tsel_core::prelude::*;

use crate::{event, render, terminal};

/// Run the TUI against the server named in `settings`.
///
/// When `config_path` is given, edits to that file are applied live with
/// `overrides` re-applied on top.
pub async fn run(
    settings: Settings,
    config_path: Option<PathBuf>,
    overrides: SettingsOverrides,
) -> Result<()> {
    let services = ServiceContext::connect(&settings)?;
    info!(
        "Loaded settings: auto_refresh={}, compact={}",
        settings.refresh.auto_refresh, settings.ui.compact
    );

    let mut term = terminal::init()?;

    let mut engine = Engine::new(services, settings);
    engine.spawn_signal_handler();
    if let Some(path) = config_path {
        engine.watch_config(path, overrides);
    }
    engine.mount();

    let result = run_loop(&mut term, &mut engine);

    engine.shutdown().await;
    terminal::restore();

    result
}

/// Main event loop
fn run_loop<B, A>(terminal: &mut Terminal<B>, engine: &mut Engine<A>) -> Result<()>
where
    B: Backend,
    A: TargetApi + Clone + Send + Sync + 'static,
{
    while !engine.should_quit() {
        draw_frame(terminal, engine)?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }
    Ok(())
}

/// Apply everything the background tasks sent, then draw one frame
fn draw_frame<B, A>(terminal: &mut Terminal<B>, engine: &mut Engine<A>) -> Result<()>
where
    B: Backend,
    A: TargetApi + Clone + Send + Sync + 'static,
{
    engine.drain_pending_messages();
    terminal
        .draw(|frame| render::view(frame, &engine.state))
        .map_err(|e| Error::terminal(format!("Failed to draw: {e}")))?;
    Ok(())
}
