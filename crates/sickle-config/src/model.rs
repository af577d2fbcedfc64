//! Typed settings for the Deluge Web UI adapter.
//!
//! # Design
//! - Pure data carriers; validation lives in `validate.rs`.
//! - Everything the adapter reads is captured here and handed over at
//!   construction, so no component consults process-wide state.

use std::fmt::{self, Debug, Formatter};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::defaults::{self, RPC_PATH, SECTION};
use crate::error::{ConfigError, ConfigResult};

/// Connection and post-processing settings for a Deluge Web UI.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct DelugeSettings {
    /// Base URL of the Web UI (for example `http://localhost:8112/`).
    pub host: Url,
    /// Reserved for clients that log in with a user name.
    ///
    /// Deluge authenticates with the password alone, so the adapter never
    /// sends this value.
    #[serde(default)]
    pub username: Option<String>,
    /// Web UI password sent with `auth.login`.
    pub password: String,
    /// Whether TLS certificates presented by the Web UI are verified.
    #[serde(default = "defaults::verify_cert")]
    pub verify_cert: bool,
    /// Labels attached to torrents after they are added.
    #[serde(default)]
    pub labels: LabelSettings,
    /// Directory completed downloads are moved to, when set.
    #[serde(default)]
    pub download_path: Option<String>,
    /// Pause torrents immediately after they are added.
    #[serde(default)]
    pub add_paused: bool,
    /// Seed ratio applied when a result does not carry its own.
    #[serde(default)]
    pub seed_ratio: Option<f64>,
    /// Per-request timeout in seconds.
    #[serde(default = "defaults::timeout_secs")]
    pub timeout_secs: u64,
}

/// Label text applied to normal and anime shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSettings {
    /// Label for regular shows; empty disables labelling.
    #[serde(default)]
    pub normal: String,
    /// Label for shows flagged as anime; empty disables labelling.
    #[serde(default)]
    pub anime: String,
}

impl DelugeSettings {
    /// Build settings for `host` with every optional knob left at its default.
    #[must_use]
    pub fn new(host: Url, password: impl Into<String>) -> Self {
        Self {
            host,
            username: None,
            password: password.into(),
            verify_cert: defaults::verify_cert(),
            labels: LabelSettings::default(),
            download_path: None,
            add_paused: false,
            seed_ratio: None,
            timeout_secs: defaults::timeout_secs(),
        }
    }

    /// JSON-RPC endpoint derived from the Web UI base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when the host cannot serve as a base URL.
    pub fn endpoint(&self) -> ConfigResult<Url> {
        let mut base = self.host.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(RPC_PATH).map_err(|_| {
            ConfigError::invalid(
                SECTION,
                "host",
                Some(self.host.to_string()),
                "cannot be used as a base URL",
            )
        })
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether a move-on-complete directory is configured.
    #[must_use]
    pub fn download_path(&self) -> Option<&str> {
        self.download_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }
}

impl Debug for DelugeSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelugeSettings")
            .field("host", &self.host.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_cert", &self.verify_cert)
            .field("labels", &self.labels)
            .field("download_path", &self.download_path)
            .field("add_paused", &self.add_paused)
            .field("seed_ratio", &self.seed_ratio)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
