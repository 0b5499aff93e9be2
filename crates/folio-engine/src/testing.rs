//! Scripted transport for tests.
//!
//! Replies are queued up front and handed out in order; every request is
//! recorded so tests can assert on what was sent.

use crate::chat::ChatRequest;
use crate::transport::{ChatTransport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One queued outcome.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Succeed with this JSON body.
    Body(Value),
    /// Fail with this error.
    Error(TransportError),
    /// Never resolve.
    Hang,
}

/// Transport that returns queued replies.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body.
    pub fn queue_body(&self, body: Value) {
        self.replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Body(body));
    }

    /// Queue an error response.
    pub fn queue_error(&self, error: TransportError) {
        self.replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Error(error));
    }

    /// Queue a reply that never arrives.
    pub fn queue_hang(&self) {
        self.replies.lock().unwrap().push_back(ScriptedReply::Hang);
    }

    /// Get recorded requests.
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests sent so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(&self, request: &ChatRequest) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(ScriptedReply::Body(body)) => Ok(body),
            Some(ScriptedReply::Error(error)) => Err(error),
            Some(ScriptedReply::Hang) => std::future::pending().await,
            None => Err(TransportError::Network("no scripted reply queued".into())),
        }
    }

    fn endpoint(&self) -> &str {
        "scripted"
    }
}
