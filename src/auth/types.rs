//! Auth context
//!
//! Credentials and the masquerade target of one client.

use crate::error::{Error, Result};
use crate::types::UserId;
use reqwest::header::HeaderValue;
use tracing::{debug, warn};
use url::Url;

/// Query parameter that makes Canvas execute a call as another user
pub const IMPERSONATION_PARAM: &str = "as_user_id";

/// Bearer token plus the optional "act as" user.
///
/// Owned by exactly one client. Not `Clone`: a worker that needs its own
/// credentials gets a fresh context through [`detached`](Self::detached),
/// never a copy of someone else's impersonation state.
pub struct AuthContext {
    token: String,
    acting_as: Option<UserId>,
}

impl AuthContext {
    /// Create a context for `token` with no impersonation
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            acting_as: None,
        }
    }

    /// Same credentials, no impersonation
    pub fn detached(&self) -> Self {
        Self::new(self.token.clone())
    }

    /// `Authorization` header value, marked sensitive
    pub fn authorization_header(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| Error::config("access token contains characters not allowed in a header"))?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// User requests currently execute as, if any
    pub fn acting_as(&self) -> Option<&UserId> {
        self.acting_as.as_ref()
    }

    /// Whether impersonation is active
    pub fn is_impersonating(&self) -> bool {
        self.acting_as.is_some()
    }

    /// Start acting as `user`. Returns the target this call replaced.
    ///
    /// There is no stack: a second call overwrites the first and ending
    /// impersonation afterwards does not restore it.
    pub fn begin_impersonation(&mut self, user: impl Into<UserId>) -> Option<UserId> {
        let user = user.into();
        let previous = self.acting_as.replace(user.clone());
        match &previous {
            Some(old) if *old != user => {
                warn!("Impersonation of user {old} replaced by user {user}");
            }
            _ => debug!("Acting as user {user}"),
        }
        previous
    }

    /// Stop impersonating. A no-op when nothing is active.
    pub fn end_impersonation(&mut self) -> Option<UserId> {
        let previous = self.acting_as.take();
        if let Some(ref user) = previous {
            debug!("No longer acting as user {user}");
        }
        previous
    }

    /// Rewrite `url` so its impersonation parameter matches this context.
    ///
    /// Any parameter already present is dropped first; Canvas echoes it into
    /// pagination links. The remaining pairs keep their original encoding.
    pub fn apply_impersonation(&self, url: &mut Url) {
        if let Some(query) = url.query() {
            let pairs: Vec<&str> = query.split('&').collect();
            let kept: Vec<&str> = pairs
                .iter()
                .copied()
                .filter(|pair| pair.split('=').next() != Some(IMPERSONATION_PARAM))
                .collect();
            if kept.len() != pairs.len() {
                let kept = kept.join("&");
                url.set_query(if kept.is_empty() { None } else { Some(&kept) });
            }
        }

        if let Some(ref user) = self.acting_as {
            url.query_pairs_mut()
                .append_pair(IMPERSONATION_PARAM, user.as_str());
        }
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &"[REDACTED]")
            .field("acting_as", &self.acting_as)
            .finish()
    }
}
