//! Lazy page-following item stream
//!
//! [`Paginated`] fetches a page only when the consumer asks for an item and
//! the previous page is used up. Dropping it stops all further requests.

use super::types::StreamState;
use crate::auth::AuthContext;
use crate::error::{Error, Result};
use crate::http::{RequestDescriptor, RequestExecutor};
use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::VecDeque;
use tracing::debug;

/// Converts one raw item into the caller's type
pub type ItemDecoder<'a, T> = Box<dyn Fn(Value) -> Result<T> + Send + Sync + 'a>;

/// Decode an item with serde; shape mismatches are malformed responses
pub fn decode_json<T: DeserializeOwned>(raw: Value) -> Result<T> {
    serde_json::from_value(raw).map_err(|e| Error::malformed(format!("item decode failed: {e}")))
}

/// Single-pass, pull-based sequence of items across all pages of one query
pub struct Paginated<'a, T> {
    executor: &'a RequestExecutor,
    auth: &'a AuthContext,
    state: StreamState,
    buffer: VecDeque<Value>,
    decode: ItemDecoder<'a, T>,
}

impl<'a, T> Paginated<'a, T> {
    /// Open a stream at `initial`. Nothing is sent until the first pull.
    pub fn new<F>(
        executor: &'a RequestExecutor,
        auth: &'a AuthContext,
        initial: RequestDescriptor,
        decode: F,
    ) -> Self
    where
        F: Fn(Value) -> Result<T> + Send + Sync + 'a,
    {
        Self {
            executor,
            auth,
            state: StreamState::new(initial),
            buffer: VecDeque::new(),
            decode: Box::new(decode),
        }
    }

    /// Next item, or `None` at the end of the sequence.
    ///
    /// A failure is returned once at the point it occurs; the stream yields
    /// nothing afterwards.
    pub async fn next_item(&mut self) -> Option<Result<T>> {
        loop {
            if let Some(raw) = self.buffer.pop_front() {
                self.state.add_yielded(1);
                let item = (self.decode)(raw);
                if item.is_err() {
                    self.buffer.clear();
                    self.state.mark_exhausted();
                }
                return Some(item);
            }

            let request = self.state.take_pending()?;

            match self.executor.execute(&request, self.auth).await {
                Ok(page) => {
                    let next = page.next_request(&request);
                    debug!(
                        "Page {}: {} items ({} yielded so far), {}",
                        self.state.pages_fetched + 1,
                        page.len(),
                        self.state.items_yielded,
                        if next.is_some() { "more to follow" } else { "last page" }
                    );
                    self.state.advance(next);
                    self.buffer.extend(page.items);
                }
                Err(e) => {
                    self.state.mark_exhausted();
                    return Some(Err(e));
                }
            }
        }
    }

    /// Pull every remaining item, stopping at the first failure
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next_item().await {
            items.push(item?);
        }
        Ok(items)
    }

    /// Adapt to a [`futures::Stream`] for use with stream combinators
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> + 'a
    where
        T: 'a,
    {
        stream::unfold(self, |mut pages| async move {
            pages.next_item().await.map(|item| (item, pages))
        })
    }

    /// Progress counters
    pub fn state(&self) -> &StreamState {
        &self.state
    }

    /// Pages fetched so far
    pub fn pages_fetched(&self) -> u32 {
        self.state.pages_fetched
    }

    /// Items handed out so far, including one that failed to decode
    pub fn items_yielded(&self) -> u64 {
        self.state.items_yielded
    }

    /// Whether the sequence has ended
    pub fn is_exhausted(&self) -> bool {
        self.buffer.is_empty() && (self.state.exhausted || self.state.pending.is_none())
    }
}

impl<T> std::fmt::Debug for Paginated<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginated")
            .field("state", &self.state)
            .field("buffered", &self.buffer.len())
            .finish_non_exhaustive()
    }
}
