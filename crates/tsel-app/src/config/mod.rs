//! Configuration file parsing for Target Select
//!
//! A single `config.toml` (default `<config_dir>/tsel/config.toml`) with
//! `[server]`, `[refresh]` and `[ui]` sections. Command line flags are layered
//! on top with [`SettingsOverrides`].

pub mod settings;
pub mod types;

pub use settings::{default_config_path, init_config_file, load_settings};
pub use types::*;
