//! Pagination types
//!
//! Page-level values produced by the executor and consumed by [`Paginated`](super::Paginated).

use super::link::parse_link_header;
use crate::http::RequestDescriptor;
use reqwest::header::{HeaderMap, LINK};
use serde_json::Value;
use url::Url;

/// Named page pointers from one response's `Link` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRelations {
    /// First page of the collection
    pub first: Option<Url>,
    /// Previous page
    pub prev: Option<Url>,
    /// Next page; absent on the last page
    pub next: Option<Url>,
    /// Last page (Canvas omits it when counting is expensive)
    pub last: Option<Url>,
}

impl LinkRelations {
    /// Parse a single `Link` header value
    pub fn parse(header: &str) -> Self {
        parse_link_header(header)
    }

    /// Parse every `Link` header in a response.
    ///
    /// Repeated headers are treated as one comma-joined value.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let joined = headers
            .get_all(LINK)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ");
        Self::parse(&joined)
    }

    /// Whether no relation was found
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.prev.is_none() && self.next.is_none() && self.last.is_none()
    }

    /// Whether this response ends the collection
    pub fn is_last_page(&self) -> bool {
        self.next.is_none()
    }

    pub(crate) fn set_if_absent(&mut self, rel: &str, url: &Url) {
        let slot = match rel.to_ascii_lowercase().as_str() {
            "first" => &mut self.first,
            "prev" => &mut self.prev,
            "next" => &mut self.next,
            "last" => &mut self.last,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(url.clone());
        }
    }
}

/// One page of raw items plus the pointers to its neighbours
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    /// Items in server order
    pub items: Vec<Value>,
    /// Parsed `Link` header
    pub relations: LinkRelations,
}

impl PageResult {
    /// Create a page
    pub fn new(items: Vec<Value>, relations: LinkRelations) -> Self {
        Self { items, relations }
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Request for the following page, if the server announced one.
    ///
    /// The `next` URL replaces path and query of `current`; everything else
    /// about how the page is read stays the same.
    pub fn next_request(&self, current: &RequestDescriptor) -> Option<RequestDescriptor> {
        self.relations.next.clone().map(|url| current.follow(url))
    }
}

/// Per-stream progress through the page chain
#[derive(Debug, Clone, Default)]
pub struct StreamState {
    /// Request for the page not yet fetched
    pub pending: Option<RequestDescriptor>,
    /// No further page will be fetched
    pub exhausted: bool,
    /// Pages fetched so far
    pub pages_fetched: u32,
    /// Items handed to the consumer so far
    pub items_yielded: u64,
}

impl StreamState {
    /// Create state positioned at the first request
    pub fn new(initial: RequestDescriptor) -> Self {
        Self {
            pending: Some(initial),
            ..Default::default()
        }
    }

    /// Take the pending request, if the stream can still advance
    pub fn take_pending(&mut self) -> Option<RequestDescriptor> {
        if self.exhausted {
            return None;
        }
        let request = self.pending.take();
        if request.is_none() {
            self.exhausted = true;
        }
        request
    }

    /// Record a fetched page and queue its successor
    pub fn advance(&mut self, next: Option<RequestDescriptor>) {
        self.pages_fetched += 1;
        self.pending = next;
    }

    /// Stop the stream; nothing else is fetched
    pub fn mark_exhausted(&mut self) {
        self.pending = None;
        self.exhausted = true;
    }

    /// Add to the yielded count
    pub fn add_yielded(&mut self, count: u64) {
        self.items_yielded += count;
    }
}
