//! Mock transport for testing
//!
//! Replays queued responses in order and records every request it sees.

use super::{ApiRequest, RawResponse, Transport};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use vaakku_core::CallerIdentity;

/// A request as seen by the mock, with the caller it was sent for
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The request
    pub request: ApiRequest,
    /// The caller identity attached to it
    pub caller: CallerIdentity,
}

#[derive(Debug)]
enum Reply {
    Response(RawResponse),
    NetworkFailure(String),
}

/// A transport that returns queued replies
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Create a mock with nothing queued
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response
    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push(Reply::Response(RawResponse::json(status, &body)));
    }

    /// Queue a response with a raw body
    pub fn push_raw(&self, status: u16, body: impl Into<String>) {
        self.push(Reply::Response(RawResponse {
            status,
            body: body.into(),
        }));
    }

    /// Queue a connection failure
    pub fn push_network_error(&self, message: impl Into<String>) {
        self.push(Reply::NetworkFailure(message.into()));
    }

    /// Every request sent so far
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of requests sent so far
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn push(&self, reply: Reply) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest, caller: &CallerIdentity) -> Result<RawResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedRequest {
                request: request.clone(),
                caller: caller.clone(),
            });

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::NetworkFailure(message)) => Err(Error::Network(message)),
            None => Err(Error::Network(format!(
                "no mock response queued for {} {}",
                request.method.as_str(),
                request.path
            ))),
        }
    }
}
