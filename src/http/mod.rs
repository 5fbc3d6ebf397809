//! HTTP request module
//!
//! Turns a [`RequestDescriptor`] into an authenticated call with retry,
//! rate limiting, and backoff.
//!
//! # Features
//!
//! - **Automatic Retries**: Classifier-driven retry of timeouts, 429 and 5xx
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Pluggable Transport**: reqwest by default, anything implementing [`Transport`]

mod executor;
mod rate_limit;
mod request;
mod retry;
mod transport;

pub use executor::{decode_page, RequestExecutor};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use request::RequestDescriptor;
pub use retry::{default_classifier, Classifier, HttpOutcome, RetryClass, RetryPolicy};
pub use transport::{
    ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse,
};
