//! Pagination module
//!
//! Follows RFC 5988 `Link` headers from page to page.
//!
//! # Overview
//!
//! - [`LinkRelations`] / [`parse_link_header`] read the `first`, `prev`,
//!   `next` and `last` pointers of one response.
//! - [`Paginated`] turns a first request into a lazy item sequence that
//!   fetches the next page only when the current one is used up.

mod link;
mod stream;
mod types;

pub use link::parse_link_header;
pub use stream::{decode_json, ItemDecoder, Paginated};
pub use types::{LinkRelations, PageResult, StreamState};
