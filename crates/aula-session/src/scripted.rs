use std::collections::VecDeque;
use std::sync::Mutex;

use crate::request::{HttpResponse, RequestConfig, Transport, TransportError};

/// A request as the transport saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub config: RequestConfig,
}

/// Replays queued replies in order and records every request (for testing).
/// Once the queue is empty every send fails with a network error.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, reply: Result<HttpResponse, TransportError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Queue a reply with a JSON body.
    pub fn reply_json(self, status: u16, body: serde_json::Value) -> Self {
        self.push(Ok(HttpResponse::json_body(status, &body)))
    }

    /// Queue a reply with an empty body.
    pub fn reply_status(self, status: u16) -> Self {
        self.push(Ok(HttpResponse::new(status, Vec::new())))
    }

    /// Queue a reply with a raw body.
    pub fn reply_raw(self, status: u16, body: &str) -> Self {
        self.push(Ok(HttpResponse::new(status, body)))
    }

    /// Queue a transport failure.
    pub fn fail(self, reason: &str) -> Self {
        self.push(Err(TransportError::Network(reason.to_string())))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            config,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted reply".into())))
    }
}
