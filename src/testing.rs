//! In-memory transport for unit tests

use crate::http::{
    RequestExecutor, RetryPolicy, Transport, TransportError, TransportRequest, TransportResponse,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, LINK};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub(crate) const BASE: &str = "https://canvas.test";

type Scripted = Result<TransportResponse, TransportError>;

/// Replays queued responses in order and records every request
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push(&self, outcome: Scripted) -> &Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub(crate) fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push(Ok(json_response(status, &body, None)))
    }

    pub(crate) fn push_page(&self, body: Value, next: Option<&str>) -> &Self {
        let link = next.map(|url| format!("<{url}>; rel=\"next\""));
        self.push(Ok(json_response(200, &body, link.as_deref())))
    }

    pub(crate) fn push_error(&self, error: TransportError) -> &Self {
        self.push(Err(error))
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.to_string())
            .collect()
    }

    pub(crate) fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("script exhausted".to_string())))
    }
}

pub(crate) fn json_response(status: u16, body: &Value, link: Option<&str>) -> TransportResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    if let Some(link) = link {
        headers.insert(LINK, HeaderValue::from_str(link).unwrap());
    }
    TransportResponse::new(status, headers, serde_json::to_vec(body).unwrap())
}

pub(crate) fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::from_millis(1)).with_max_delay(Duration::from_millis(5))
}

pub(crate) fn executor(transport: Arc<ScriptedTransport>) -> RequestExecutor {
    RequestExecutor::new(transport, Url::parse(BASE).unwrap()).with_policy(fast_policy(3))
}
