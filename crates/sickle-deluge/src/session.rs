//! Login and daemon-connect handshake.
//!
//! The Web UI must be logged in *and* attached to a daemon before any `core.*`
//! or `label.*` call succeeds. Every step depends on the previous one, so the
//! sequence is strictly linear and stops at the first failure.

use std::sync::Arc;

use serde_json::{Value, json};
use sickle_config::DelugeSettings;
use tracing::{debug, error};

use crate::error::AuthError;
use crate::rpc::{RpcCall, RpcTransport, call_id, method, truthy};

/// Proof of a completed handshake.
///
/// Only [`SessionAuthenticator`] constructs one; every dispatcher action
/// borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: Value,
    connected: bool,
}

impl Session {
    pub(crate) const fn new(token: Value, connected: bool) -> Self {
        Self { token, connected }
    }

    /// Opaque login result returned by `auth.login`.
    #[must_use]
    pub const fn token(&self) -> &Value {
        &self.token
    }

    /// Whether the Web UI reported an attached daemon.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Runs the handshake against the configured Web UI.
#[derive(Clone)]
pub struct SessionAuthenticator {
    transport: Arc<dyn RpcTransport>,
    settings: Arc<DelugeSettings>,
}

impl SessionAuthenticator {
    /// Build an authenticator issuing calls over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn RpcTransport>, settings: Arc<DelugeSettings>) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Log in and make sure the Web UI is attached to a daemon.
    ///
    /// Issues two calls when a daemon is already attached and five when the
    /// first registered host has to be connected.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] at the first step that fails; no further calls are
    /// issued after a failure.
    pub async fn ensure_session(&self) -> Result<Session, AuthError> {
        let token = self
            .call(
                method::AUTH_LOGIN,
                vec![json!(self.settings.password)],
                call_id::LOGIN,
            )
            .await?;
        if !truthy(&token) {
            error!("Deluge WebUI rejected the configured password");
            return Err(AuthError::Rejected);
        }

        if self.daemon_connected().await? {
            debug!("Deluge WebUI already connected to a daemon");
            return Ok(Session::new(token, true));
        }

        let hosts = self
            .call(method::WEB_GET_HOSTS, Vec::new(), call_id::HOSTS)
            .await?;
        let host_id = first_host_id(&hosts)?;
        debug!(host_id = %host_id, "connecting Deluge WebUI to first registered daemon");

        self.call(method::WEB_CONNECT, vec![host_id], call_id::HOSTS)
            .await?;

        if !self.daemon_connected().await? {
            error!("Deluge: WebUI could not connect to daemon");
            return Err(AuthError::ConnectFailed);
        }

        Ok(Session::new(token, true))
    }

    async fn daemon_connected(&self) -> Result<bool, AuthError> {
        let connected = self
            .call(method::WEB_CONNECTED, Vec::new(), call_id::CONNECTED)
            .await?;
        Ok(truthy(&connected))
    }

    /// Handshake results are read loosely: a daemon-side error leaves a null
    /// result, which the caller then treats as a negative answer.
    async fn call(
        &self,
        method: &'static str,
        params: Vec<Value>,
        id: u32,
    ) -> Result<Value, AuthError> {
        let response = self
            .transport
            .call(&RpcCall::new(method, params, id))
            .await
            .map_err(|err| {
                debug!(method, error = %err, "handshake call failed");
                AuthError::Transport(err)
            })?;
        if response.is_error() {
            debug!(method, error = ?response.error, "handshake call reported an error");
        }
        Ok(response.result)
    }
}

/// `web.get_hosts` yields `[[id, host, port, status], ...]`; only the first is used.
fn first_host_id(hosts: &Value) -> Result<Value, AuthError> {
    if !truthy(hosts) {
        error!("Deluge: WebUI does not contain daemons");
        return Err(AuthError::NoDaemon);
    }
    hosts
        .as_array()
        .and_then(|hosts| hosts.first())
        .and_then(|host| host.get(0))
        .cloned()
        .ok_or(AuthError::UnexpectedResponse {
            method: method::WEB_GET_HOSTS,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedTransport, settings};

    fn authenticator(transport: &Arc<ScriptedTransport>) -> SessionAuthenticator {
        SessionAuthenticator::new(transport.clone(), Arc::new(settings()))
    }

    fn host_list() -> Value {
        json!([["c8f1a2", "127.0.0.1", 58846, "Offline"]])
    }

    #[tokio::test]
    async fn login_sends_password_only() {
        let transport = ScriptedTransport::new()
            .reply(json!(true))
            .reply(json!(true))
            .into_shared();
        let mut settings = settings();
        settings.username = Some("admin".to_string());

        SessionAuthenticator::new(transport.clone(), Arc::new(settings))
            .ensure_session()
            .await
            .expect("handshake should succeed");

        assert_eq!(transport.calls()[0].params, vec![json!("deluge")]);
    }

    #[tokio::test]
    async fn already_connected_takes_two_calls() {
        let transport = ScriptedTransport::new()
            .reply(json!(true))
            .reply(json!(true))
            .into_shared();

        let session = authenticator(&transport)
            .ensure_session()
            .await
            .expect("handshake should succeed");

        assert!(session.is_connected());
        assert_eq!(session.token(), &json!(true));
        assert_eq!(transport.methods(), vec!["auth.login", "web.connected"]);
        let calls = transport.calls();
        assert_eq!(calls[0].params, vec![json!("deluge")]);
        assert_eq!(calls[0].id, 1);
        assert_eq!(calls[1].id, 10);
    }

    #[tokio::test]
    async fn disconnected_web_ui_connects_first_host() {
        let transport = ScriptedTransport::new()
            .reply(json!(true))
            .reply(json!(false))
            .reply(json!([
                ["c8f1a2", "127.0.0.1", 58846, "Offline"],
                ["d9e0b3", "10.0.0.2", 58846, "Online"]
            ]))
            .reply(Value::Null)
            .reply(json!(true))
            .into_shared();

        let session = authenticator(&transport)
            .ensure_session()
            .await
            .expect("handshake should succeed");

        assert!(session.is_connected());
        assert_eq!(
            transport.methods(),
            vec![
                "auth.login",
                "web.connected",
                "web.get_hosts",
                "web.connect",
                "web.connected"
            ]
        );
        let connect = &transport.calls()[3];
        assert_eq!(connect.params, vec![json!("c8f1a2")]);
        assert_eq!(connect.id, 11);
    }

    #[tokio::test]
    async fn empty_host_list_fails_without_connect() {
        let transport = ScriptedTransport::new()
            .reply(json!(true))
            .reply(json!(false))
            .reply(json!([]))
            .into_shared();

        let err = authenticator(&transport)
            .ensure_session()
            .await
            .expect_err("no daemons should fail");

        assert!(matches!(err, AuthError::NoDaemon));
        assert_eq!(
            transport.methods(),
            vec!["auth.login", "web.connected", "web.get_hosts"]
        );
    }

    #[tokio::test]
    async fn still_disconnected_after_connect_fails() {
        let transport = ScriptedTransport::new()
            .reply(json!(true))
            .reply(json!(false))
            .reply(host_list())
            .reply(Value::Null)
            .reply(json!(false))
            .into_shared();

        let err = authenticator(&transport)
            .ensure_session()
            .await
            .expect_err("daemon never attached");

        assert!(matches!(err, AuthError::ConnectFailed));
        assert_eq!(transport.calls().len(), 5);
    }

    #[tokio::test]
    async fn rejected_password_stops_after_login() {
        let transport = ScriptedTransport::new()
            .reply(json!(false))
            .into_shared();

        let err = authenticator(&transport)
            .ensure_session()
            .await
            .expect_err("falsy login should fail");

        assert!(matches!(err, AuthError::Rejected));
        assert_eq!(transport.methods(), vec!["auth.login"]);
    }

    #[tokio::test]
    async fn malformed_host_entry_is_reported() {
        let transport = ScriptedTransport::new()
            .reply(json!(true))
            .reply(json!(false))
            .reply(json!({"hosts": 1}))
            .into_shared();

        let err = authenticator(&transport)
            .ensure_session()
            .await
            .expect_err("object host list should fail");

        assert!(matches!(
            err,
            AuthError::UnexpectedResponse {
                method: "web.get_hosts"
            }
        ));
    }

    #[tokio::test]
    async fn transport_failure_at_any_step_stops_the_handshake() {
        let scripts: Vec<(ScriptedTransport, usize)> = vec![
            (ScriptedTransport::new().fail(), 1),
            (ScriptedTransport::new().reply(json!(true)).fail(), 2),
            (
                ScriptedTransport::new()
                    .reply(json!(true))
                    .reply(json!(false))
                    .fail(),
                3,
            ),
            (
                ScriptedTransport::new()
                    .reply(json!(true))
                    .reply(json!(false))
                    .reply(host_list())
                    .fail(),
                4,
            ),
            (
                ScriptedTransport::new()
                    .reply(json!(true))
                    .reply(json!(false))
                    .reply(host_list())
                    .reply(Value::Null)
                    .fail(),
                5,
            ),
        ];

        for (script, expected_calls) in scripts {
            let transport = script.into_shared();
            let err = authenticator(&transport)
                .ensure_session()
                .await
                .expect_err("transport failure should abort");
            assert!(matches!(err, AuthError::Transport(_)));
            assert_eq!(transport.calls().len(), expected_calls);
        }
    }
}
