//! Error types for torrent submission.

use std::error::Error;

use thiserror::Error;

/// Primary error type for torrent submission.
#[derive(Debug, Error)]
pub enum TorrentError {
    /// The client could not establish an authenticated session.
    #[error("torrent client authentication failed")]
    AuthenticationFailed {
        /// Client identifier.
        client: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The client did not accept the torrent.
    #[error("torrent client rejected the torrent")]
    AddRejected {
        /// Client identifier.
        client: &'static str,
        /// Display name of the rejected result.
        name: String,
        /// Underlying failure when the rejection was not a plain refusal.
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },
}

/// Settings or result values that cannot be expressed to the client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyViolation {
    /// Label plugins do not accept labels containing spaces.
    #[error("label '{label}' must not contain a space")]
    LabelContainsSpace {
        /// Offending label after normalisation.
        label: String,
    },
    /// Ratios below zero other than the seed-forever sentinel.
    #[error("unsupported seed ratio {ratio}; expected a value of at least 0 or exactly -1")]
    UnsupportedRatio {
        /// Offending ratio.
        ratio: f64,
    },
}

/// Convenience alias for torrent submission results.
pub type TorrentResult<T> = Result<T, TorrentError>;
