//! Submission DTOs shared between callers and client adapters.

use serde::{Deserialize, Serialize};

/// Where the torrent payload comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TorrentSource {
    /// Magnet URI resolved by the client itself.
    Magnet {
        /// Magnet URI to hand to the client.
        uri: String,
    },
    /// Raw `.torrent` metainfo fetched by the caller.
    File {
        /// Bencoded metainfo payload.
        content: Vec<u8>,
    },
}

/// Show metadata that influences post-processing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowInfo {
    /// Show title, used for logging only.
    pub name: String,
    /// Whether the show is flagged as anime.
    #[serde(default)]
    pub is_anime: bool,
}

/// One torrent submission.
///
/// `hash` stays `None` until a client accepts the torrent; every
/// post-processing step that addresses the torrent reads it from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingResult {
    /// Release name; file submissions are uploaded as `{name}.torrent`.
    pub name: String,
    /// Torrent payload.
    pub source: TorrentSource,
    /// Owning show, when known.
    #[serde(default)]
    pub show: Option<ShowInfo>,
    /// Seed ratio requested for this result; `-1` seeds forever.
    #[serde(default)]
    pub ratio: Option<f64>,
    /// Client-assigned info hash, populated after a successful add.
    #[serde(default)]
    pub hash: Option<String>,
}

impl PendingResult {
    /// Submission backed by a magnet URI.
    #[must_use]
    pub fn magnet(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::new(name, TorrentSource::Magnet { uri: uri.into() })
    }

    /// Submission backed by `.torrent` metainfo bytes.
    #[must_use]
    pub fn file(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self::new(
            name,
            TorrentSource::File {
                content: content.into(),
            },
        )
    }

    fn new(name: impl Into<String>, source: TorrentSource) -> Self {
        Self {
            name: name.into(),
            source,
            show: None,
            ratio: None,
            hash: None,
        }
    }

    /// Attach show metadata.
    #[must_use]
    pub fn with_show(mut self, show: ShowInfo) -> Self {
        self.show = Some(show);
        self
    }

    /// Attach a per-result seed ratio.
    #[must_use]
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }

    /// Whether the owning show is flagged as anime.
    #[must_use]
    pub fn is_anime(&self) -> bool {
        self.show.as_ref().is_some_and(|show| show.is_anime)
    }

    /// Client-assigned hash, if the torrent has been accepted.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }
}

/// Outcome of one best-effort post-processing step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The client confirmed the change.
    Applied,
    /// Nothing was configured, so no call was issued.
    Skipped,
    /// The step failed; sibling steps were still attempted.
    Failed {
        /// Human-readable failure description.
        reason: String,
    },
}

impl StepOutcome {
    /// Failure outcome carrying `reason`.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// `false` only for [`StepOutcome::Failed`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Per-step summary of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    /// Hash assigned by the client.
    pub hash: String,
    /// Label assignment.
    pub label: StepOutcome,
    /// Seed ratio configuration.
    pub ratio: StepOutcome,
    /// Move-on-complete path configuration.
    pub path: StepOutcome,
    /// Pause after add.
    pub pause: StepOutcome,
}

impl SubmissionReport {
    /// Whether every post-processing step succeeded or was skipped.
    #[must_use]
    pub const fn fully_applied(&self) -> bool {
        self.label.is_success()
            && self.ratio.is_success()
            && self.path.is_success()
            && self.pause.is_success()
    }
}

/// Result of a connection test against a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionCheck {
    /// Whether the client is reachable and accepted the credentials.
    pub ok: bool,
    /// Human-readable description for the operator.
    pub message: String,
}

impl ConnectionCheck {
    /// Message reported when the handshake completes.
    pub const SUCCESS_MESSAGE: &'static str = "Success: Connected and Authenticated";

    /// Successful check.
    #[must_use]
    pub fn success() -> Self {
        Self {
            ok: true,
            message: Self::SUCCESS_MESSAGE.to_string(),
        }
    }

    /// Failed check with an operator-facing message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}
