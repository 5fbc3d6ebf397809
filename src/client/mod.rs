//! Canvas client
//!
//! [`CanvasClient`] pairs one [`RequestExecutor`] with one [`AuthContext`].
//!
//! Impersonation is per client. The mutators take `&mut self` while open
//! streams borrow `&self`, so the target cannot change under a running
//! stream. Concurrent workers each get their own client from
//! [`CanvasClient::for_worker`].

mod resources;

use crate::auth::AuthContext;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{
    RateLimiter, ReqwestTransport, RequestDescriptor, RequestExecutor, Transport,
    TransportResponse,
};
use crate::pagination::{decode_json, PageResult, Paginated};
use crate::types::UserId;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Client for one Canvas instance and one access token
pub struct CanvasClient {
    executor: RequestExecutor,
    auth: AuthContext,
    per_page: Option<u32>,
}

impl CanvasClient {
    /// Build a client over reqwest
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout(), &config.user_agent)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build a client over a caller-supplied transport
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        let mut executor = RequestExecutor::new(transport, config.parsed_base_url()?)
            .with_policy(config.retry.to_policy());
        if let Some(ref limit) = config.rate_limit {
            executor = executor.with_rate_limiter(RateLimiter::new(limit));
        }

        debug!("Canvas client for {}", config.base_url);

        Ok(Self {
            executor,
            auth: AuthContext::new(config.token.clone()),
            per_page: config.per_page,
        })
    }

    /// Build a client from `CANVAS_BASE_URL` / `CANVAS_TOKEN`
    pub fn from_env() -> Result<Self> {
        Self::new(&ClientConfig::from_env()?)
    }

    /// Instance root
    pub fn base_url(&self) -> &Url {
        self.executor.base_url()
    }

    /// Underlying executor
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Configured page size, if any
    pub fn per_page(&self) -> Option<u32> {
        self.per_page
    }

    // ------------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------------

    /// Send a request and return its raw successful response
    pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<TransportResponse> {
        self.executor.send(descriptor, &self.auth).await
    }

    /// Send a request and decode one page
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<PageResult> {
        self.executor.execute(descriptor, &self.auth).await
    }

    /// Send a request and decode its single object
    pub async fn fetch_one<T: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> Result<T> {
        let page = self.execute(descriptor).await?;
        let item = page
            .items
            .into_iter()
            .next()
            .ok_or_else(|| Error::malformed("expected an object, got an empty response"))?;
        decode_json(item)
    }

    /// GET `path` and decode the object
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch_one(&RequestDescriptor::get(path)).await
    }

    /// Lazily walk every page of a listing, decoding items with serde
    pub fn stream<'a, T>(&'a self, descriptor: RequestDescriptor) -> Paginated<'a, T>
    where
        T: DeserializeOwned + 'a,
    {
        self.stream_with(descriptor, decode_json::<T>)
    }

    /// Lazily walk every page of a listing with a custom item decoder
    pub fn stream_with<'a, T, F>(&'a self, descriptor: RequestDescriptor, decode: F) -> Paginated<'a, T>
    where
        F: Fn(Value) -> Result<T> + Send + Sync + 'a,
    {
        let descriptor = match self.per_page {
            Some(per_page) if !descriptor.has_query("per_page") => {
                descriptor.query("per_page", per_page)
            }
            _ => descriptor,
        };
        Paginated::new(&self.executor, &self.auth, descriptor, decode)
    }

    // ------------------------------------------------------------------------
    // Impersonation
    // ------------------------------------------------------------------------

    /// Execute subsequent requests as `user`. Returns the target replaced.
    pub fn begin_impersonation(&mut self, user: impl Into<UserId>) -> Option<UserId> {
        self.auth.begin_impersonation(user)
    }

    /// Execute subsequent requests as the token owner again
    pub fn end_impersonation(&mut self) -> Option<UserId> {
        self.auth.end_impersonation()
    }

    /// Current impersonation target
    pub fn acting_as(&self) -> Option<&UserId> {
        self.auth.acting_as()
    }

    /// Impersonate `user` until the returned guard is dropped.
    ///
    /// Dropping the guard always clears impersonation, including any target
    /// that was active before the guard was created.
    pub fn impersonate(&mut self, user: impl Into<UserId>) -> ImpersonationGuard<'_> {
        self.begin_impersonation(user);
        ImpersonationGuard { client: self }
    }

    /// Run `f` while impersonating `user`, clearing it on every exit path
    pub async fn with_impersonation<R, F>(&mut self, user: impl Into<UserId>, f: F) -> Result<R>
    where
        F: for<'c> FnOnce(&'c CanvasClient) -> BoxFuture<'c, Result<R>>,
    {
        let guard = self.impersonate(user);
        let result = f(&*guard).await;
        drop(guard);
        result
    }

    // ------------------------------------------------------------------------
    // Workers
    // ------------------------------------------------------------------------

    /// A client for another concurrent worker.
    ///
    /// Same instance, token, retry policy and rate-limit bucket; its own
    /// impersonation state, starting with none.
    pub fn for_worker(&self) -> CanvasClient {
        CanvasClient {
            executor: self.executor.clone(),
            auth: self.auth.detached(),
            per_page: self.per_page,
        }
    }
}

impl std::fmt::Debug for CanvasClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasClient")
            .field("executor", &self.executor)
            .field("auth", &self.auth)
            .field("per_page", &self.per_page)
            .finish()
    }
}

/// Scoped impersonation; clears the target when dropped.
///
/// Derefs to the client for requests. There is no `DerefMut`, so a second
/// impersonation cannot be started through a live guard.
pub struct ImpersonationGuard<'a> {
    client: &'a mut CanvasClient,
}

impl Deref for ImpersonationGuard<'_> {
    type Target = CanvasClient;

    fn deref(&self) -> &CanvasClient {
        self.client
    }
}

impl Drop for ImpersonationGuard<'_> {
    fn drop(&mut self) {
        self.client.end_impersonation();
    }
}

impl std::fmt::Debug for ImpersonationGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImpersonationGuard")
            .field("acting_as", &self.client.acting_as())
            .finish()
    }
}

#[cfg(test)]
mod tests;
