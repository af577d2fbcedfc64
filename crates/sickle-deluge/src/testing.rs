//! Scripted transport recording every call it receives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use sickle_config::DelugeSettings;

use crate::error::TransportError;
use crate::rpc::{RpcCall, RpcResponse, RpcTransport};

enum Reply {
    Response(RpcResponse),
    Fail,
}

/// Answers calls from a queue; an exhausted queue fails like a dead connection.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<RpcCall>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, result: Value) -> Self {
        self.push(Reply::Response(RpcResponse::with_result(result)))
    }

    pub(crate) fn reply_error(self, message: &str) -> Self {
        self.push(Reply::Response(RpcResponse {
            result: Value::Null,
            error: Some(json!({"message": message, "code": 4})),
            id: None,
        }))
    }

    pub(crate) fn fail(self) -> Self {
        self.push(Reply::Fail)
    }

    fn push(self, reply: Reply) -> Self {
        self.replies
            .lock()
            .expect("replies lock poisoned")
            .push_back(reply);
        self
    }

    pub(crate) fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub(crate) fn calls(&self) -> Vec<RpcCall> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    pub(crate) fn methods(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|call| call.method).collect()
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn call(&self, call: &RpcCall) -> Result<RpcResponse, TransportError> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(call.clone());
        let next = self
            .replies
            .lock()
            .expect("replies lock poisoned")
            .pop_front();
        match next {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Fail) | None => Err(TransportError::request(
                call.method,
                "connection reset by peer",
            )),
        }
    }
}

pub(crate) fn settings() -> DelugeSettings {
    DelugeSettings::new(
        "http://localhost:8112/".parse().expect("valid URL"),
        "deluge",
    )
}
