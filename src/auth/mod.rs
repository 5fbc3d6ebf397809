//! Authentication module
//!
//! Bearer-token credentials and the per-client masquerade target.
//!
//! The [`AuthContext`] is consulted by the executor on every request, so
//! starting or ending impersonation affects the very next call.

mod types;

pub use types::{AuthContext, IMPERSONATION_PARAM};

#[cfg(test)]
mod tests;
