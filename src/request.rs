//! Incoming request abstraction.
//!
//! The router does not parse HTTP itself. Whatever server layer sits in
//! front of it supplies requests through the [`Request`] trait, which exposes
//! just the four facts matching needs: the verb, the transport security flag,
//! the path component and query-string lookup.
//!
//! Two implementations ship with the crate:
//!
//! - [`IncomingRequest`], an owned request built from a method and a
//!   `path?query` string (used by the CLI and tests)
//! - `http::Request<B>`, so requests from any `http`-based server can be
//!   routed directly

use std::borrow::Cow;

/// The parts of an HTTP request the router inspects.
pub trait Request {
    /// HTTP method as sent by the client (any case).
    fn http_method(&self) -> &str;

    /// Whether the request arrived over a secure transport.
    fn is_secure(&self) -> bool;

    /// Path component of the request URL, without the query string.
    fn request_path(&self) -> &str;

    /// Look up a query-string parameter by name.
    fn query_param(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// Owned request used when no HTTP server type is at hand.
///
/// ```
/// use roundabout::{IncomingRequest, Request};
///
/// let req = IncomingRequest::new("GET", "/users/42?method=delete", false);
/// assert_eq!(req.request_path(), "/users/42");
/// assert_eq!(req.query_param("method").as_deref(), Some("delete"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingRequest {
    method: String,
    path: String,
    query: Vec<(String, String)>,
    secure: bool,
}

impl IncomingRequest {
    /// Build a request from a method, a `path?query` string and the
    /// transport security flag.
    pub fn new(method: impl Into<String>, uri: &str, secure: bool) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, parse_query_params(query)),
            None => (uri, Vec::new()),
        };
        Self {
            method: method.into(),
            path: path.to_string(),
            query,
            secure,
        }
    }

    /// All decoded query parameters in the order they were sent.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }
}

impl Request for IncomingRequest {
    fn http_method(&self) -> &str {
        &self.method
    }

    fn is_secure(&self) -> bool {
        self.secure
    }

    fn request_path(&self) -> &str {
        &self.path
    }

    /// Last occurrence wins for repeated names (`?method=put&method=delete`).
    fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        self.query
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| Cow::Borrowed(v.as_str()))
    }
}

impl<B> Request for http::Request<B> {
    fn http_method(&self) -> &str {
        http::Request::method(self).as_str()
    }

    fn is_secure(&self) -> bool {
        self.uri().scheme() == Some(&http::uri::Scheme::HTTPS)
    }

    fn request_path(&self) -> &str {
        self.uri().path()
    }

    fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        let query = self.uri().query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .filter(|(k, _)| k == name)
            .last()
            .map(|(_, v)| Cow::Owned(v.into_owned()))
    }
}

/// Decode a raw query string (without the leading `?`) into name/value pairs.
pub fn parse_query_params(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
