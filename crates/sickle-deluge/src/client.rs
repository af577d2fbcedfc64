//! `TorrentClient` implementation for the Deluge Web UI.

use std::sync::Arc;

use async_trait::async_trait;
use sickle_config::DelugeSettings;
use sickle_torrent_core::{
    ConnectionCheck, PendingResult, StepOutcome, SubmissionReport, TorrentClient, TorrentError,
    TorrentResult,
};
use tracing::{error, info, instrument, warn};

use crate::dispatcher::ActionDispatcher;
use crate::error::{AuthError, DelugeResult};
use crate::rpc::RpcTransport;
use crate::session::SessionAuthenticator;
use crate::transport::HttpTransport;

/// Client identifier used in logs and errors.
pub const CLIENT_NAME: &str = "Deluge";

/// Deluge Web UI client.
///
/// The handshake runs once per submission and once per connection test; a
/// session is never carried over between calls.
#[derive(Clone)]
pub struct DelugeClient {
    authenticator: SessionAuthenticator,
    dispatcher: ActionDispatcher,
}

impl DelugeClient {
    /// Build a client talking HTTP to the Web UI described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP transport cannot be constructed.
    pub fn from_settings(settings: DelugeSettings) -> DelugeResult<Self> {
        let transport = HttpTransport::from_settings(&settings)?;
        Ok(Self::with_transport(Arc::new(transport), settings))
    }

    /// Build a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn RpcTransport>, settings: DelugeSettings) -> Self {
        let settings = Arc::new(settings);
        Self {
            authenticator: SessionAuthenticator::new(transport.clone(), settings.clone()),
            dispatcher: ActionDispatcher::new(transport, settings),
        }
    }
}

#[async_trait]
impl TorrentClient for DelugeClient {
    fn name(&self) -> &'static str {
        CLIENT_NAME
    }

    #[instrument(skip_all, fields(name = %result.name))]
    async fn send_torrent(&self, result: &mut PendingResult) -> TorrentResult<SubmissionReport> {
        let session = self.authenticator.ensure_session().await.map_err(|err| {
            error!(error = %err, "Deluge: failed to authenticate");
            TorrentError::AuthenticationFailed {
                client: CLIENT_NAME,
                source: Box::new(err),
            }
        })?;

        let hash = self
            .dispatcher
            .add_torrent(&session, result)
            .await
            .map_err(|err| {
                error!(error = %err, "Deluge: unable to send torrent");
                TorrentError::AddRejected {
                    client: CLIENT_NAME,
                    name: result.name.clone(),
                    source: Some(Box::new(err)),
                }
            })?;

        let label = step("label", self.dispatcher.set_label(&session, result).await);
        let ratio = step("ratio", self.dispatcher.set_ratio(&session, result).await);
        let path = step("path", self.dispatcher.set_path(&session, result).await);
        let pause = step("pause", self.dispatcher.set_pause(&session, result).await);

        let report = SubmissionReport {
            hash,
            label,
            ratio,
            path,
            pause,
        };
        info!(
            hash = %report.hash,
            fully_applied = report.fully_applied(),
            "torrent sent to Deluge"
        );
        Ok(report)
    }

    async fn test_authentication(&self) -> ConnectionCheck {
        match self.authenticator.ensure_session().await {
            Ok(_) => ConnectionCheck::success(),
            Err(err) => {
                warn!(error = %err, "Deluge connection test failed");
                ConnectionCheck::failure(describe_auth_failure(&err))
            }
        }
    }
}

fn step(name: &'static str, outcome: DelugeResult<StepOutcome>) -> StepOutcome {
    outcome.unwrap_or_else(|err| {
        error!(step = name, error = %err, "Deluge: post-processing step failed");
        StepOutcome::failed(err.to_string())
    })
}

fn describe_auth_failure(err: &AuthError) -> String {
    match err {
        AuthError::Transport(_) => format!("Error: Unable to connect to {CLIENT_NAME}"),
        AuthError::Rejected => {
            format!("Error: Unable to get {CLIENT_NAME} Authentication, check your config!")
        }
        AuthError::NoDaemon => format!("Error: {CLIENT_NAME} WebUI does not contain daemons"),
        AuthError::ConnectFailed => {
            format!("Error: {CLIENT_NAME} WebUI could not connect to daemon")
        }
        AuthError::UnexpectedResponse { method } => {
            format!("Error: unexpected {CLIENT_NAME} response to {method}")
        }
    }
}
