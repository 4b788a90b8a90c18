//! Scripted in-memory transport shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use sendsay_api::transport::Transport;
use sendsay_api::types::{RequestEnvelope, ResponseEnvelope};
use sendsay_api::{Credentials, Params, SendsayClient, SendsayClientBuilder};
use serde_json::Value;
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "https://api.example.test";

/// One POST as the transport saw it.
#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub body: Params,
}

impl Call {
    pub fn action(&self) -> &str {
        self.body.get("action").and_then(Value::as_str).unwrap_or("")
    }

    pub fn session(&self) -> Option<&str> {
        self.body.get("session").and_then(Value::as_str)
    }
}

type Handler = Box<dyn FnMut(&Call) -> Value + Send>;

/// Answers every POST through a handler and records what was sent.
pub struct ScriptedTransport {
    handler: Mutex<Handler>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new(handler: impl FnMut(&Call) -> Value + Send + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Mutex::new(Box::new(handler)),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.action().to_string()).collect()
    }

    pub fn count(&self, action: &str) -> usize {
        self.calls().iter().filter(|c| c.action() == action).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(&self, url: &str, request: &RequestEnvelope) -> sendsay_api::Result<ResponseEnvelope> {
        let call = Call {
            url: url.to_string(),
            body: request.to_json(),
        };
        let reply = {
            let mut handler = self.handler.lock().unwrap();
            (*handler)(&call)
        };
        self.calls.lock().unwrap().push(call);
        match reply {
            Value::Object(fields) => Ok(ResponseEnvelope::classify(fields)),
            other => panic!("scripted reply must be an object, got {other}"),
        }
    }
}

/// Client with static credentials talking to `transport`.
pub fn client_with(transport: &Arc<ScriptedTransport>) -> SendsayClient {
    builder_with(transport)
        .credentials(Credentials::new("acme", "secret"))
        .build()
        .unwrap()
}

pub fn builder_with(transport: &Arc<ScriptedTransport>) -> SendsayClientBuilder {
    SendsayClientBuilder::new()
        .api_url(BASE_URL)
        .transport(transport.clone())
}

pub fn expired() -> Value {
    serde_json::json!({"errors": [{"id": "error/auth/failed", "explain": "expired"}]})
}
