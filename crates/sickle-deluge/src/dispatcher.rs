//! Add and post-processing actions issued against an established session.
//!
//! Each action is one or a few dependent calls. Post-processing actions are
//! independent of each other: a failure is returned to the caller and never
//! affects what the next action does.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use serde_json::{Value, json};
use sickle_config::DelugeSettings;
use sickle_torrent_core::{PendingResult, RatioPlan, StepOutcome, TorrentSource, resolve_label};
use tracing::{debug, error, warn};

use crate::error::{DelugeError, DelugeResult};
use crate::rpc::{RpcCall, RpcResponse, RpcTransport, call_id, method};
use crate::session::Session;

/// Issues single actions on behalf of a [`Session`].
#[derive(Clone)]
pub struct ActionDispatcher {
    transport: Arc<dyn RpcTransport>,
    settings: Arc<DelugeSettings>,
}

impl ActionDispatcher {
    /// Build a dispatcher issuing calls over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn RpcTransport>, settings: Arc<DelugeSettings>) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Add `result` by whichever source it carries and record the assigned hash.
    ///
    /// # Errors
    ///
    /// Returns the failure of the underlying add call.
    pub async fn add_torrent(
        &self,
        session: &Session,
        result: &mut PendingResult,
    ) -> DelugeResult<String> {
        match result.source.clone() {
            TorrentSource::Magnet { uri } => self.add_torrent_magnet(session, result, &uri).await,
            TorrentSource::File { content } => {
                self.add_torrent_file(session, result, &content).await
            }
        }
    }

    /// `core.add_torrent_magnet [uri, {}]`.
    ///
    /// # Errors
    ///
    /// Returns [`DelugeError::HashNotAssigned`] when the daemon answers with a
    /// null result, [`DelugeError::Remote`] when it reports an error, and
    /// [`DelugeError::Transport`] when the call never completes.
    pub async fn add_torrent_magnet(
        &self,
        session: &Session,
        result: &mut PendingResult,
        uri: &str,
    ) -> DelugeResult<String> {
        let call = RpcCall::new(
            method::ADD_TORRENT_MAGNET,
            vec![json!(uri), json!({})],
            call_id::ADD,
        );
        self.add(session, result, call).await
    }

    /// `core.add_torrent_file ["{name}.torrent", base64(content), {}]`.
    ///
    /// # Errors
    ///
    /// Same as [`ActionDispatcher::add_torrent_magnet`].
    pub async fn add_torrent_file(
        &self,
        session: &Session,
        result: &mut PendingResult,
        content: &[u8],
    ) -> DelugeResult<String> {
        let call = RpcCall::new(
            method::ADD_TORRENT_FILE,
            vec![
                json!(format!("{}.torrent", result.name)),
                json!(general_purpose::STANDARD.encode(content)),
                json!({}),
            ],
            call_id::ADD,
        );
        self.add(session, result, call).await
    }

    async fn add(
        &self,
        session: &Session,
        result: &mut PendingResult,
        call: RpcCall,
    ) -> DelugeResult<String> {
        let method = call.method;
        let response = self.issue(session, &call).await?.into_result(method)?;
        let hash = match response {
            Value::String(hash) if !hash.is_empty() => hash,
            Value::Null => return Err(DelugeError::HashNotAssigned { method }),
            _ => return Err(DelugeError::UnexpectedResponse { method }),
        };
        debug!(method, hash = %hash, name = %result.name, "torrent accepted by daemon");
        result.hash = Some(hash.clone());
        Ok(hash)
    }

    /// Attach the configured label, creating it on the daemon first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DelugeError::Policy`] without issuing any call when the label
    /// contains a space, [`DelugeError::LabelPluginMissing`] when the plugin is
    /// disabled, and the failure of `label.set_torrent` otherwise.
    pub async fn set_label(
        &self,
        session: &Session,
        result: &PendingResult,
    ) -> DelugeResult<StepOutcome> {
        const OPERATION: &str = "set label";

        let label = resolve_label(&self.settings.labels, result.is_anime()).map_err(|violation| {
            error!(%violation, "Deluge: invalid label, label must not contain a space");
            DelugeError::Policy {
                operation: OPERATION,
                violation,
            }
        })?;
        let Some(label) = label else {
            return Ok(StepOutcome::Skipped);
        };
        let hash = require_hash(result, OPERATION)?;

        let labels = self
            .issue(
                session,
                &RpcCall::new(method::LABEL_GET_LABELS, Vec::new(), call_id::GET_LABELS),
            )
            .await?;
        if labels.is_error() {
            debug!(error = ?labels.error, "Deluge: label plugin not detected");
            return Err(DelugeError::LabelPluginMissing);
        }
        let existing = match labels.result {
            Value::Null => {
                debug!("Deluge: label plugin not detected");
                return Err(DelugeError::LabelPluginMissing);
            }
            Value::Array(existing) => existing,
            _ => {
                return Err(DelugeError::UnexpectedResponse {
                    method: method::LABEL_GET_LABELS,
                });
            }
        };

        if !existing.iter().any(|known| known.as_str() == Some(label.as_str())) {
            debug!(label = %label, "label does not exist in Deluge, adding it");
            let added = self
                .issue(
                    session,
                    &RpcCall::new(method::LABEL_ADD, vec![json!(label)], call_id::ADD_LABEL),
                )
                .await?;
            if added.is_error() {
                warn!(label = %label, error = ?added.error, "Deluge refused to create label");
            } else {
                debug!(label = %label, "label added to Deluge");
            }
        }

        self.issue(
            session,
            &RpcCall::new(
                method::LABEL_SET_TORRENT,
                vec![json!(hash), json!(label)],
                call_id::SET_LABEL,
            ),
        )
        .await?
        .into_result(method::LABEL_SET_TORRENT)?;
        debug!(label = %label, hash, "label added to torrent");
        Ok(StepOutcome::Applied)
    }

    /// Apply the result's seed ratio, falling back to the configured default.
    ///
    /// # Errors
    ///
    /// Returns [`DelugeError::Policy`] without issuing any call for ratios
    /// below zero other than `-1`. When enabling stop-at-ratio fails, the
    /// threshold call is not issued.
    pub async fn set_ratio(
        &self,
        session: &Session,
        result: &PendingResult,
    ) -> DelugeResult<StepOutcome> {
        const OPERATION: &str = "set ratio";

        let ratio = result.ratio.or(self.settings.seed_ratio);
        let plan = RatioPlan::from_ratio(ratio).map_err(|violation| {
            error!(%violation, ?ratio, "Deluge: seed ratio must be at least 0 or exactly -1");
            DelugeError::Policy {
                operation: OPERATION,
                violation,
            }
        })?;

        match plan {
            RatioPlan::ClientDefault => Ok(StepOutcome::Skipped),
            RatioPlan::StopAt(threshold) => {
                let hash = require_hash(result, OPERATION)?;
                self.issue(
                    session,
                    &RpcCall::new(
                        method::SET_STOP_AT_RATIO,
                        vec![json!(hash), json!(true)],
                        call_id::STOP_AT_RATIO,
                    ),
                )
                .await?
                .into_result(method::SET_STOP_AT_RATIO)?;
                self.issue(
                    session,
                    &RpcCall::new(
                        method::SET_STOP_RATIO,
                        vec![json!(hash), json!(threshold)],
                        call_id::STOP_RATIO,
                    ),
                )
                .await?
                .into_result(method::SET_STOP_RATIO)?;
                debug!(hash, threshold, "stop ratio applied");
                Ok(StepOutcome::Applied)
            }
            RatioPlan::SeedForever => {
                let hash = require_hash(result, OPERATION)?;
                self.issue(
                    session,
                    &RpcCall::new(
                        method::SET_STOP_AT_RATIO,
                        vec![json!(hash), json!(false)],
                        call_id::STOP_AT_RATIO,
                    ),
                )
                .await?
                .into_result(method::SET_STOP_AT_RATIO)?;
                debug!(hash, "stop at ratio disabled, seeding forever");
                Ok(StepOutcome::Applied)
            }
        }
    }

    /// Move completed downloads to the configured directory.
    ///
    /// Both calls are always issued; the first daemon error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`DelugeError::Remote`] when either call is rejected.
    pub async fn set_path(
        &self,
        session: &Session,
        result: &PendingResult,
    ) -> DelugeResult<StepOutcome> {
        const OPERATION: &str = "set move path";

        let Some(path) = self.settings.download_path() else {
            return Ok(StepOutcome::Skipped);
        };
        let hash = require_hash(result, OPERATION)?;

        let enable = self
            .issue(
                session,
                &RpcCall::new(
                    method::SET_MOVE_COMPLETED,
                    vec![json!(hash), json!(true)],
                    call_id::MOVE_COMPLETED,
                ),
            )
            .await?;
        let set_path = self
            .issue(
                session,
                &RpcCall::new(
                    method::SET_MOVE_COMPLETED_PATH,
                    vec![json!(hash), json!(path)],
                    call_id::MOVE_COMPLETED_PATH,
                ),
            )
            .await?;
        enable.into_result(method::SET_MOVE_COMPLETED)?;
        set_path.into_result(method::SET_MOVE_COMPLETED_PATH)?;
        debug!(hash, path, "move-on-complete path applied");
        Ok(StepOutcome::Applied)
    }

    /// Pause the torrent when pause-on-add is configured.
    ///
    /// # Errors
    ///
    /// Returns [`DelugeError::Remote`] when the daemon rejects the call.
    pub async fn set_pause(
        &self,
        session: &Session,
        result: &PendingResult,
    ) -> DelugeResult<StepOutcome> {
        if !self.settings.add_paused {
            return Ok(StepOutcome::Skipped);
        }
        let hash = require_hash(result, "pause")?;
        self.issue(
            session,
            &RpcCall::new(
                method::PAUSE_TORRENT,
                vec![json!([hash])],
                call_id::PAUSE,
            ),
        )
        .await?
        .into_result(method::PAUSE_TORRENT)?;
        debug!(hash, "torrent paused");
        Ok(StepOutcome::Applied)
    }

    async fn issue(&self, session: &Session, call: &RpcCall) -> DelugeResult<RpcResponse> {
        debug_assert!(session.is_connected(), "actions require a connected session");
        Ok(self.transport.call(call).await?)
    }
}

fn require_hash<'a>(result: &'a PendingResult, operation: &'static str) -> DelugeResult<&'a str> {
    result
        .hash()
        .ok_or(DelugeError::MissingHash { operation })
}
