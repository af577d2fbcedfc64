//! JSON-RPC envelopes exchanged with the Deluge Web UI.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DelugeError, DelugeResult, TransportError};

pub(crate) mod method {
    pub(crate) const AUTH_LOGIN: &str = "auth.login";
    pub(crate) const WEB_CONNECTED: &str = "web.connected";
    pub(crate) const WEB_GET_HOSTS: &str = "web.get_hosts";
    pub(crate) const WEB_CONNECT: &str = "web.connect";
    pub(crate) const ADD_TORRENT_MAGNET: &str = "core.add_torrent_magnet";
    pub(crate) const ADD_TORRENT_FILE: &str = "core.add_torrent_file";
    pub(crate) const LABEL_GET_LABELS: &str = "label.get_labels";
    pub(crate) const LABEL_ADD: &str = "label.add";
    pub(crate) const LABEL_SET_TORRENT: &str = "label.set_torrent";
    pub(crate) const SET_STOP_AT_RATIO: &str = "core.set_torrent_stop_at_ratio";
    pub(crate) const SET_STOP_RATIO: &str = "core.set_torrent_stop_ratio";
    pub(crate) const SET_MOVE_COMPLETED: &str = "core.set_torrent_move_completed";
    pub(crate) const SET_MOVE_COMPLETED_PATH: &str = "core.set_torrent_move_completed_path";
    pub(crate) const PAUSE_TORRENT: &str = "core.pause_torrent";
}

/// Correlation ids; the Web UI echoes them back but never requires uniqueness.
pub(crate) mod call_id {
    pub(crate) const LOGIN: u32 = 1;
    pub(crate) const ADD: u32 = 2;
    pub(crate) const GET_LABELS: u32 = 3;
    pub(crate) const ADD_LABEL: u32 = 4;
    pub(crate) const SET_LABEL: u32 = 5;
    pub(crate) const STOP_AT_RATIO: u32 = 5;
    pub(crate) const STOP_RATIO: u32 = 6;
    pub(crate) const MOVE_COMPLETED: u32 = 7;
    pub(crate) const MOVE_COMPLETED_PATH: u32 = 8;
    pub(crate) const PAUSE: u32 = 9;
    pub(crate) const CONNECTED: u32 = 10;
    pub(crate) const HOSTS: u32 = 11;
}

/// One request to the JSON-RPC endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcCall {
    /// Remote method name.
    pub method: &'static str,
    /// Positional parameters.
    pub params: Vec<Value>,
    /// Correlation id.
    pub id: u32,
}

impl RpcCall {
    /// Build a call envelope.
    #[must_use]
    pub const fn new(method: &'static str, params: Vec<Value>, id: u32) -> Self {
        Self { method, params, id }
    }
}

/// Response envelope; a null or absent `error` means the call succeeded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RpcResponse {
    /// Method result payload.
    #[serde(default)]
    pub result: Value,
    /// Daemon-reported failure.
    #[serde(default)]
    pub error: Option<Value>,
    /// Echoed correlation id.
    #[serde(default)]
    pub id: Option<Value>,
}

impl RpcResponse {
    /// Successful response carrying `result`.
    #[must_use]
    pub const fn with_result(result: Value) -> Self {
        Self {
            result,
            error: None,
            id: None,
        }
    }

    /// Whether the daemon reported a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.as_ref().is_some_and(|error| !error.is_null())
    }

    /// Return the result payload, or the daemon's failure as [`DelugeError::Remote`].
    ///
    /// # Errors
    ///
    /// Returns [`DelugeError::Remote`] when the `error` field is set.
    pub fn into_result(self, method: &'static str) -> DelugeResult<Value> {
        match self.error {
            Some(error) if !error.is_null() => Err(remote_error(method, &error)),
            _ => Ok(self.result),
        }
    }
}

fn remote_error(method: &'static str, error: &Value) -> DelugeError {
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .map_or_else(|| error.to_string(), str::to_string);
    let code = error.get("code").and_then(Value::as_i64);
    DelugeError::Remote {
        method,
        code,
        message,
    }
}

/// Loose truthiness used for handshake results (`true`, a token, a host list).
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Issues calls against the JSON-RPC endpoint.
///
/// Implementations carry whatever session state the endpoint needs (the Web
/// UI uses a cookie); protocol code only sees calls and responses.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Issue `call` and wait for its response.
    async fn call(&self, call: &RpcCall) -> Result<RpcResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn call_serializes_as_jsonrpc_body() {
        let call = RpcCall::new(method::AUTH_LOGIN, vec![json!("secret")], call_id::LOGIN);
        assert_eq!(
            serde_json::to_value(&call).expect("serialize call"),
            json!({"method": "auth.login", "params": ["secret"], "id": 1})
        );
    }

    #[test]
    fn null_error_is_success() {
        let response: RpcResponse =
            serde_json::from_value(json!({"result": true, "error": null, "id": 1}))
                .expect("decode response");
        assert!(!response.is_error());
        assert_eq!(
            response.into_result(method::AUTH_LOGIN).expect("success"),
            json!(true)
        );
    }

    #[test]
    fn missing_fields_default_to_null() {
        let response: RpcResponse = serde_json::from_value(json!({})).expect("decode response");
        assert!(!response.is_error());
        assert_eq!(response.result, Value::Null);
    }

    #[test]
    fn error_field_becomes_remote_error() {
        let response: RpcResponse = serde_json::from_value(json!({
            "result": null,
            "error": {"message": "Unknown method", "code": 2},
            "id": 9
        }))
        .expect("decode response");
        assert!(response.is_error());
        let err = response
            .into_result(method::PAUSE_TORRENT)
            .expect_err("error field should fail");
        assert!(matches!(
            err,
            DelugeError::Remote {
                method: "core.pause_torrent",
                code: Some(2),
                ref message,
            } if message == "Unknown method"
        ));
    }

    #[test]
    fn truthiness_matches_web_ui_results() {
        assert!(!truthy(&Value::Null));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!([])));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!([["id", "127.0.0.1", 58846, "Online"]])));
    }
}
