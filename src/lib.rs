// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Canvas Client
//!
//! A typed client for the Canvas LMS REST API.
//!
//! ## Features
//!
//! - **Enum Wire Registry**: Typed enums and flag sets for Canvas string tokens,
//!   tolerant of tokens a newer Canvas release might add
//! - **Lazy Pagination**: Follows `Link: rel="next"` only as items are consumed
//! - **Retry**: Timeouts, 429 and 5xx are retried with capped exponential backoff
//! - **Impersonation**: Per-client `as_user_id` masquerading, scoped by guard
//! - **Worker Fan-out**: One independent client per concurrent worker
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use canvas_client::{CanvasClient, ClientConfig, CourseInclude, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let mut client = CanvasClient::new(&config)?;
//!
//!     let mut courses = client.account_courses(1, CourseInclude::Term.into());
//!     while let Some(course) = courses.next_item().await {
//!         println!("{:?}", course?.name);
//!     }
//!
//!     let guard = client.impersonate(42u64);
//!     let me = guard.current_user().await?;
//!     println!("acting as {}", me.name);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        CanvasClient                          │
//! │  execute / fetch_one / stream     impersonate / for_worker   │
//! └──────────────────────────────────────────────────────────────┘
//!                │                                  │
//! ┌──────────────┴──────────────┐     ┌─────────────┴────────────┐
//! │        Paginated<T>         │     │       AuthContext        │
//! │  Link parser, lazy pages    │     │  token, acting_as        │
//! └──────────────┬──────────────┘     └─────────────┬────────────┘
//!                │                                  │
//! ┌──────────────┴──────────────────────────────────┴────────────┐
//! │                      RequestExecutor                         │
//! │  resolve URL, attach auth, retry policy, rate limit, decode  │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//!                      Transport (reqwest)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Enum wire-representation registry
pub mod wire;

/// Credentials and impersonation
pub mod auth;

/// Request execution with retry and rate limiting
pub mod http;

/// Link-header pagination
pub mod pagination;

/// Client configuration
pub mod config;

/// The Canvas client
pub mod client;

/// Canvas resource models
pub mod models;

/// Concurrent workers
pub mod pool;

/// Command-line interface
pub mod cli;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::{CanvasClient, ImpersonationGuard};
pub use config::{ClientConfig, RetryConfig};
pub use error::{Error, Result, ResultExt};
pub use pagination::Paginated;
pub use pool::WorkerPool;
pub use types::*;
pub use wire::{
    CourseInclude, CourseWorkflowState, EnrollmentState, EnrollmentType, FlagSet, SubmissionType,
    Wire, WireEnum,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
