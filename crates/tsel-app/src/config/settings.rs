//! Settings file loading

use std::path::{Path, PathBuf};

use tsel_core::prelude::*;

use super::types::Settings;

const APP_DIR: &str = "tsel";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_CONFIG: &str = r#"# Target Select Configuration

[server]
# Base URL of the discovery server
url = "http://localhost:8181"
# Bearer token sent with every request (empty = none)
auth_token = ""
request_timeout_ms = 10000

[refresh]
# Re-fetch the full target list on a timer
auto_refresh = true
# Timer period is period * units milliseconds
period = 30
units = 1000

[ui]
compact = false
max_notices = 5
"#;

/// `<config_dir>/tsel/config.toml`, or `None` when the platform has no config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `path`.
///
/// A missing or malformed file is not an error: defaults are returned and
/// the problem is logged.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Write the commented default config to `path` unless it already exists.
///
/// Returns `true` when a file was created.
pub fn init_config_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create {}: {}", parent.display(), e)))?;
    }

    std::fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| Error::config(format!("Failed to write {}: {}", path.display(), e)))?;
    info!("Created default config at {}", path.display());
    Ok(true)
}
