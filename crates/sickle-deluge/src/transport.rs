//! reqwest-backed transport for the Web UI JSON-RPC endpoint.

use async_trait::async_trait;
use reqwest::Client;
use sickle_config::DelugeSettings;
use tracing::trace;
use url::Url;

use crate::error::{DelugeError, DelugeResult, TransportError};
use crate::rpc::{RpcCall, RpcResponse, RpcTransport};

/// HTTP transport holding the Web UI session cookie.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Build a transport for the endpoint described by `settings`.
    ///
    /// The cookie store is enabled so the session granted by `auth.login`
    /// rides along on every later call.
    ///
    /// # Errors
    ///
    /// Returns [`DelugeError::Config`] when the endpoint cannot be derived and
    /// [`DelugeError::ClientBuild`] when the HTTP client cannot be constructed.
    pub fn from_settings(settings: &DelugeSettings) -> DelugeResult<Self> {
        let endpoint = settings.endpoint()?;
        let client = Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(!settings.verify_cert)
            .timeout(settings.timeout())
            .build()
            .map_err(|source| DelugeError::ClientBuild { source })?;
        Ok(Self { client, endpoint })
    }

    /// JSON-RPC endpoint every call is posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(&self, call: &RpcCall) -> Result<RpcResponse, TransportError> {
        trace!(method = call.method, id = call.id, "posting rpc call");
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(call)
            .send()
            .await
            .map_err(|err| TransportError::request(call.method, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                method: call.method,
                status: status.as_u16(),
            });
        }

        response
            .json::<RpcResponse>()
            .await
            .map_err(|err| TransportError::Decode {
                method: call.method,
                source: Box::new(err),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;

    use crate::rpc::{call_id, method};

    fn transport_for(server: &MockServer) -> Result<HttpTransport> {
        let settings = DelugeSettings::new(server.base_url().parse()?, "deluge");
        Ok(HttpTransport::from_settings(&settings)?)
    }

    #[tokio::test]
    async fn posts_call_to_json_endpoint() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/json")
                .json_body(json!({"method": "auth.login", "params": ["deluge"], "id": 1}));
            then.status(200)
                .json_body(json!({"result": true, "error": null, "id": 1}));
        });

        let transport = transport_for(&server)?;
        let response = transport
            .call(&RpcCall::new(
                method::AUTH_LOGIN,
                vec![json!("deluge")],
                call_id::LOGIN,
            ))
            .await?;

        mock.assert();
        assert_eq!(response.result, json!(true));
        assert!(!response.is_error());
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_transport_failure() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/json");
            then.status(502);
        });

        let transport = transport_for(&server)?;
        let err = transport
            .call(&RpcCall::new(method::WEB_CONNECTED, Vec::new(), call_id::CONNECTED))
            .await
            .expect_err("502 should fail");
        assert!(matches!(
            err,
            TransportError::Status {
                method: "web.connected",
                status: 502
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn non_json_body_is_decode_failure() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/json");
            then.status(200).body("<html>login</html>");
        });

        let transport = transport_for(&server)?;
        let err = transport
            .call(&RpcCall::new(method::WEB_CONNECTED, Vec::new(), call_id::CONNECTED))
            .await
            .expect_err("html should fail to decode");
        assert!(matches!(err, TransportError::Decode { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_is_request_failure() -> Result<()> {
        let settings = DelugeSettings::new("http://127.0.0.1:9/".parse()?, "deluge");
        let transport = HttpTransport::from_settings(&settings)?;
        let err = transport
            .call(&RpcCall::new(method::AUTH_LOGIN, vec![json!("deluge")], call_id::LOGIN))
            .await
            .expect_err("closed port should fail");
        assert!(matches!(err, TransportError::Request { .. }));
        Ok(())
    }

    #[test]
    fn endpoint_is_derived_from_host() -> Result<()> {
        let settings = DelugeSettings::new("http://localhost:8112".parse()?, "deluge");
        let transport = HttpTransport::from_settings(&settings)?;
        assert_eq!(transport.endpoint().as_str(), "http://localhost:8112/json");
        Ok(())
    }
}
