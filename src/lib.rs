//! Target Select Library
//!
//! A target JVM picker for a discovery server. The terminal UI and the
//! headless NDJSON mode share the engine from `tsel-app`.

pub mod headless;

use std::path::Path;

use tsel_app::config::{self, Settings, SettingsOverrides};

// Re-export main entry points
pub use headless::runner::run_headless;
pub use tsel_tui::run as run_tui;

/// Settings from `config_path` (defaults when `None` or unreadable) with
/// the command line overrides applied.
pub fn resolve_settings(config_path: Option<&Path>, overrides: &SettingsOverrides) -> Settings {
    let mut settings = match config_path {
        Some(path) => config::load_settings(path),
        None => Settings::default(),
    };
    overrides.apply(&mut settings);
    settings
}
