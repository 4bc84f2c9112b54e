//! Terminal setup and restoration

use ratatui::DefaultTerminal;
use tsel_core::{Error, Result};

/// Enter raw mode and the alternate screen.
///
/// Installs a panic hook first so a panic hands the terminal back before
/// the message is printed. Fails when stdout is not a terminal.
pub fn init() -> Result<DefaultTerminal> {
    install_panic_hook();
    ratatui::try_init().map_err(|e| {
        ratatui::restore();
        Error::TerminalInit(e)
    })
}

/// Leave raw mode and the alternate screen
pub fn restore() {
    ratatui::restore();
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));
}
