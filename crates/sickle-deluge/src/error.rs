//! # Design
//!
//! - Transport failures are terminal for the call that hit them.
//! - Handshake failures get their own type so callers can abort a submission
//!   before any action is attempted.
//! - Action failures carry the method and daemon message for the report.

use std::error::Error;

use sickle_config::ConfigError;
use sickle_torrent_core::PolicyViolation;
use thiserror::Error;

/// Failure to complete an HTTP round-trip with the Web UI.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed.
    #[error("request for {method} failed")]
    Request {
        /// RPC method being issued.
        method: &'static str,
        /// Underlying client error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The Web UI answered with a non-success HTTP status.
    #[error("{method} returned HTTP status {status}")]
    Status {
        /// RPC method being issued.
        method: &'static str,
        /// HTTP status code.
        status: u16,
    },
    /// The response body was not a JSON-RPC envelope.
    #[error("response to {method} could not be decoded")]
    Decode {
        /// RPC method being issued.
        method: &'static str,
        /// Underlying decode error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl TransportError {
    /// Wrap an arbitrary client error as a request failure.
    pub fn request(method: &'static str, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Request {
            method,
            source: source.into(),
        }
    }

    /// RPC method the failed round-trip was carrying.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Request { method, .. }
            | Self::Status { method, .. }
            | Self::Decode { method, .. } => method,
        }
    }
}

/// Failure to establish an authenticated, daemon-connected session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A handshake call never completed.
    #[error("handshake transport failure")]
    Transport(#[from] TransportError),
    /// `auth.login` answered with a falsy result.
    #[error("Web UI rejected the password")]
    Rejected,
    /// The Web UI has no daemons registered.
    #[error("WebUI does not contain daemons")]
    NoDaemon,
    /// The Web UI stayed disconnected after `web.connect`.
    #[error("WebUI could not connect to daemon")]
    ConnectFailed,
    /// A handshake response did not have the expected shape.
    #[error("unexpected response to {method}")]
    UnexpectedResponse {
        /// RPC method whose result was malformed.
        method: &'static str,
    },
}

/// Failure of a single action against an established session.
#[derive(Debug, Error)]
pub enum DelugeError {
    /// Settings could not be turned into a transport.
    #[error("invalid deluge settings")]
    Config(#[from] ConfigError),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    ClientBuild {
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The call never completed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The daemon set the `error` field of its response.
    #[error("daemon rejected {method}: {message}")]
    Remote {
        /// RPC method that failed.
        method: &'static str,
        /// Daemon error code, when reported.
        code: Option<i64>,
        /// Daemon error message.
        message: String,
    },
    /// Settings or result values were refused before any call was issued.
    #[error("{operation} refused by policy: {violation}")]
    Policy {
        /// Action that was refused.
        operation: &'static str,
        /// Policy that was violated.
        violation: PolicyViolation,
    },
    /// A post-processing action ran on a result the daemon never accepted.
    #[error("{operation} requires a torrent hash")]
    MissingHash {
        /// Action that needed the hash.
        operation: &'static str,
    },
    /// An add call completed without the daemon assigning a hash.
    #[error("{method} returned no torrent hash")]
    HashNotAssigned {
        /// RPC method that was issued.
        method: &'static str,
    },
    /// `label.get_labels` returned null or an error; the label plugin is not enabled.
    #[error("label plugin not detected")]
    LabelPluginMissing,
    /// The result had an unexpected shape.
    #[error("unexpected response to {method}")]
    UnexpectedResponse {
        /// RPC method whose result was malformed.
        method: &'static str,
    },
}

/// Convenience alias for Deluge action results.
pub type DelugeResult<T> = Result<T, DelugeError>;
