//! Application directory paths.
//!
//! Only configuration lives on disk; conversation history is session-scoped
//! and never written out.
//!
//! Override the config directory with `AUTOGOAL_CONFIG_DIR`.

use std::path::PathBuf;

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/autogoal/` by default.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("AUTOGOAL_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("autogoal"))
        .unwrap_or_else(|| PathBuf::from("/tmp/autogoal-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
