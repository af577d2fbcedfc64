//! Loading settings documents from disk.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::DelugeSettings;
use crate::validate::validate_settings;

/// Read, parse and validate a JSON settings document.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read,
/// [`ConfigError::Parse`] when it does not match the settings model, and
/// [`ConfigError::InvalidField`] when a field fails validation.
pub fn load_from_path(path: impl AsRef<Path>) -> ConfigResult<DelugeSettings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        operation: "read settings document",
        path: path.to_path_buf(),
        source,
    })?;
    let settings = parse_settings(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_settings(&settings)?;
    debug!(path = %path.display(), host = %settings.host, "loaded deluge settings");
    Ok(settings)
}

fn parse_settings(raw: &str) -> Result<DelugeSettings, serde_json::Error> {
    serde_json::from_str(raw)
}
