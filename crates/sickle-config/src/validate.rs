//! Field checks applied to settings before they reach the adapter.

use crate::defaults::SECTION;
use crate::error::{ConfigError, ConfigResult};
use crate::model::DelugeSettings;

/// Sentinel ratio meaning "seed forever".
pub const SEED_FOREVER_RATIO: f64 = -1.0;

/// Validate every field of a settings document.
///
/// # Errors
///
/// Returns the first [`ConfigError::InvalidField`] encountered.
pub fn validate_settings(settings: &DelugeSettings) -> ConfigResult<()> {
    validate_host(settings)?;
    if settings.password.is_empty() {
        return Err(ConfigError::invalid(
            SECTION,
            "password",
            None,
            "must not be empty",
        ));
    }
    validate_label("labels.normal", &settings.labels.normal)?;
    validate_label("labels.anime", &settings.labels.anime)?;
    if let Some(ratio) = settings.seed_ratio {
        validate_ratio(ratio)?;
    }
    if settings.timeout_secs == 0 {
        return Err(ConfigError::invalid(
            SECTION,
            "timeout_secs",
            Some("0".to_string()),
            "must be greater than zero",
        ));
    }
    settings.endpoint()?;
    Ok(())
}

fn validate_host(settings: &DelugeSettings) -> ConfigResult<()> {
    match settings.host.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(ConfigError::invalid(
            SECTION,
            "host",
            Some(settings.host.to_string()),
            "must use http or https",
        )),
    }
}

/// Deluge's label plugin rejects labels containing a space.
#[must_use]
pub fn label_is_valid(label: &str) -> bool {
    !label.contains(' ')
}

pub(crate) fn validate_label(field: &'static str, label: &str) -> ConfigResult<()> {
    if !label_is_valid(label) {
        return Err(ConfigError::invalid(
            SECTION,
            field,
            Some(label.to_string()),
            "must not contain a space",
        ));
    }
    Ok(())
}

/// Accepts any finite ratio at or above zero, plus the seed-forever sentinel.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for non-finite values and negatives other than `-1`.
pub fn validate_ratio(ratio: f64) -> ConfigResult<()> {
    #[allow(clippy::float_cmp)]
    let seed_forever = ratio == SEED_FOREVER_RATIO;
    if ratio.is_finite() && (ratio >= 0.0 || seed_forever) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            SECTION,
            "seed_ratio",
            Some(ratio.to_string()),
            "must be at least 0 or exactly -1",
        ))
    }
}
