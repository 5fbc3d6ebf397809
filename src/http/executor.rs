//! Request executor
//!
//! Sends one described request with credentials and impersonation attached,
//! retries transient failures, and decodes the successful body into a page.

use super::rate_limit::RateLimiter;
use super::request::RequestDescriptor;
use super::retry::{HttpOutcome, RetryClass, RetryPolicy};
use super::transport::{Transport, TransportRequest, TransportResponse};
use crate::auth::AuthContext;
use crate::error::{Error, Result};
use crate::pagination::{LinkRelations, PageResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Executes descriptors against one Canvas instance
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    base_url: Url,
    policy: RetryPolicy,
    rate_limiter: Option<RateLimiter>,
}

impl RequestExecutor {
    /// Create an executor with the default retry policy and no throttling
    pub fn new(transport: Arc<dyn Transport>, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
            policy: RetryPolicy::default(),
            rate_limiter: None,
        }
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Throttle requests through a shared token bucket
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Base URL relative paths are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Active retry policy
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Send the request and decode the body as a page of items
    pub async fn execute(
        &self,
        descriptor: &RequestDescriptor,
        auth: &AuthContext,
    ) -> Result<PageResult> {
        let response = self.send(descriptor, auth).await?;
        decode_page(&response, descriptor.items_key_name())
    }

    /// Send the request, retrying per policy, and return the raw 2xx response
    pub async fn send(
        &self,
        descriptor: &RequestDescriptor,
        auth: &AuthContext,
    ) -> Result<TransportResponse> {
        let mut url = descriptor.resolve(&self.base_url)?;
        // Read on every call so a change of impersonation applies immediately.
        auth.apply_impersonation(&mut url);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth.authorization_header()?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let method = descriptor.method();
        let max_attempts = self.policy.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let request = TransportRequest {
                method,
                url: url.clone(),
                headers: headers.clone(),
                body: descriptor.body().cloned(),
            };

            debug!("{method} {url} (attempt {attempt}/{max_attempts})");

            let (outcome, failure, retry_after) = match self.transport.send(request).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => (
                    HttpOutcome::Status(response.status),
                    Error::http_status(response.status, response.text()),
                    extract_retry_after(&response),
                ),
                Err(e) => (e.outcome(), Error::Transport(e), None),
            };

            if self.policy.classify(&outcome) == RetryClass::Terminal {
                debug!("{method} {url} failed terminally: {failure}");
                return Err(failure);
            }

            if attempt >= max_attempts {
                warn!("{method} {url} still failing after {attempt} attempts: {failure}");
                return Err(Error::ExhaustedRetries {
                    attempts: attempt,
                    last: Box::new(failure),
                });
            }

            let delay = retry_after
                .map_or_else(|| self.policy.delay_for(attempt), |d| d.min(self.policy.max_delay));
            warn!(
                "{outcome:?} on {method} {url}, attempt {attempt}/{max_attempts}, retrying in {delay:?}"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url.as_str())
            .field("policy", &self.policy)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Decode a successful response into items and link relations.
///
/// A JSON array yields its elements; a single object is promoted to a
/// one-element page. With `items_key`, the array is read from that field of
/// the top-level object.
pub fn decode_page(response: &TransportResponse, items_key: Option<&str>) -> Result<PageResult> {
    let relations = LinkRelations::from_headers(&response.headers);

    if response.status == 204 || response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PageResult::new(Vec::new(), relations));
    }

    if let Some(content_type) = response.header(CONTENT_TYPE.as_str()) {
        if !content_type.to_ascii_lowercase().contains("json") {
            return Err(Error::malformed(format!(
                "unexpected content type '{content_type}'"
            )));
        }
    }

    let body: Value = serde_json::from_slice(&response.body)
        .map_err(|e| Error::malformed(format!("body is not valid JSON: {e}")))?;

    let body = match items_key {
        Some(key) => match body {
            Value::Object(mut map) => map
                .remove(key)
                .ok_or_else(|| Error::malformed(format!("response has no '{key}' field")))?,
            _ => {
                return Err(Error::malformed(format!(
                    "expected an object holding '{key}'"
                )))
            }
        },
        None => body,
    };

    let items = match body {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            return Err(Error::malformed(format!(
                "expected a JSON array or object, got {other}"
            )))
        }
    };

    Ok(PageResult::new(items, relations))
}

/// Extract retry-after header value (delta-seconds form)
fn extract_retry_after(response: &TransportResponse) -> Option<Duration> {
    response
        .header(RETRY_AFTER.as_str())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
