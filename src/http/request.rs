//! Request descriptors
//!
//! A [`RequestDescriptor`] names one HTTP call: method, target, ordered query
//! parameters and an optional JSON body. It carries no credentials and no
//! impersonation; the executor adds those at send time.

use crate::error::{Error, Result};
use crate::types::Method;
use crate::wire::{FlagSet, WireEnum, WireFlag};
use serde_json::Value;
use url::Url;

/// Where a request goes
#[derive(Debug, Clone, PartialEq)]
enum Target {
    /// Path relative to the client's base URL
    Path(String),
    /// Absolute URL supplied by the server (pagination links)
    Url(Url),
}

/// Immutable description of one HTTP call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    target: Target,
    query: Vec<(String, String)>,
    body: Option<Value>,
    items_key: Option<String>,
}

impl RequestDescriptor {
    /// Create a descriptor for `method` on a path under the base URL
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            target: Target::Path(path.into()),
            query: Vec::new(),
            body: None,
            items_key: None,
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request with a JSON body
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).json(body)
    }

    /// PUT request with a JSON body
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).json(body)
    }

    /// DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// GET of a server-supplied absolute URL, used verbatim
    pub fn from_url(url: Url) -> Self {
        Self {
            method: Method::GET,
            target: Target::Url(url),
            query: Vec::new(),
            body: None,
            items_key: None,
        }
    }

    /// Request for a server-supplied `next` link that continues this one.
    ///
    /// Path and query come from `url`; the item location carries over.
    #[must_use]
    pub fn follow(&self, url: Url) -> Self {
        Self {
            items_key: self.items_key.clone(),
            ..Self::from_url(url)
        }
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter carrying an enum's wire token
    #[must_use]
    pub fn query_wire<E: WireEnum>(self, key: impl Into<String>, value: E) -> Self {
        self.query(key, value.to_wire())
    }

    /// Append one `key[]` parameter per flag in `flags`
    #[must_use]
    pub fn query_flags<F: WireFlag>(mut self, key: &str, flags: FlagSet<F>) -> Self {
        let key = if key.ends_with("[]") {
            key.to_string()
        } else {
            format!("{key}[]")
        };
        for token in flags.to_wire() {
            self.query.push((key.clone(), token.to_string()));
        }
        self
    }

    /// Set the JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Name of the response field that holds the item array, for endpoints
    /// that wrap their list in an object
    #[must_use]
    pub fn items_key(mut self, key: impl Into<String>) -> Self {
        self.items_key = Some(key.into());
        self
    }

    /// HTTP method
    pub fn method(&self) -> Method {
        self.method
    }

    /// Query parameters in insertion order
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// Whether a query parameter with `key` is present, either as an added
    /// parameter or inside an absolute target URL
    pub fn has_query(&self, key: &str) -> bool {
        self.query.iter().any(|(k, _)| k == key)
            || matches!(&self.target, Target::Url(url) if url.query_pairs().any(|(k, _)| k == key))
    }

    /// JSON body, if any
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Field holding the item array, if the endpoint wraps it
    pub fn items_key_name(&self) -> Option<&str> {
        self.items_key.as_deref()
    }

    /// Build the full URL against `base`
    pub fn resolve(&self, base: &Url) -> Result<Url> {
        let mut url = match &self.target {
            Target::Url(url) => url.clone(),
            Target::Path(path) if path.starts_with("http://") || path.starts_with("https://") => {
                Url::parse(path)?
            }
            Target::Path(path) => {
                let base = base.as_str().trim_end_matches('/');
                let path = path.trim_start_matches('/');
                Url::parse(&format!("{base}/{path}"))?
            }
        };

        if url.cannot_be_a_base() {
            return Err(Error::config(format!("'{url}' is not a usable request URL")));
        }

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}
