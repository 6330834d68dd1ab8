//! Request context handed to route handlers.
//!
//! This module contains the types a handler reads its input from:
//! - `RequestContext`: the request head and body, plus what the matched route extracted
//! - `PathParams`: values captured by the dynamic `[name]` segments of the route template
//!
//! The context is built per request by the dispatcher and moved into the handler,
//! nothing about it is shared with other in-flight requests.

use crate::pattern::RouteMatch;
use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, Method, Uri, Version};
use serde::Deserialize;

/// Represents the context of an HTTP request: the request head, its body, and the
/// path parameters and query string captured by the route that matched it.
#[derive(Debug)]
pub struct RequestContext {
    parts: Parts,
    body: Bytes,
    path_params: PathParams,
    query: Option<String>,
}

impl RequestContext {
    /// Creates a new RequestContext from the request parts and the match of its route
    pub fn new(parts: Parts, body: Bytes, route_match: RouteMatch) -> Self {
        let (path_params, query) = route_match.into_parts();
        Self { parts, body, path_params, query }
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Returns the URI of the request
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Returns the HTTP version of the request
    pub fn version(&self) -> Version {
        self.parts.version
    }

    /// Returns the HTTP headers of the request
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Returns the raw request body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the path parameters captured by the matched route
    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    /// Returns the query string captured by the matched route, without the leading `?`
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Deserializes the query string; a request without one deserializes from an empty string
    pub fn query_as<T>(&self) -> Result<T, serde_qs::Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        serde_qs::from_str(self.query().unwrap_or_default())
    }
}

/// Values of the dynamic segments of a matched route, in declaration order.
///
/// For the template `/users/[id]` and the path `/users/42`, `get("id")` returns `"42"`.
/// Values are the raw path text, no percent-decoding is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    params: Vec<(String, String)>,
}

impl PathParams {
    /// Creates an empty PathParams instance with no parameters
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Gets the value of a path parameter by its name.
    /// When a name repeats in the template, the first occurrence wins.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();
        self.params.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl FromIterator<(String, String)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { params: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    fn context(uri: &str, route_match: RouteMatch) -> RequestContext {
        let (parts, ()) = Request::builder().method(Method::GET).uri(uri).body(()).unwrap().into_parts();
        RequestContext::new(parts, Bytes::from_static(b"{}"), route_match)
    }

    #[test]
    fn test_path_params() {
        let params = [("id".to_owned(), "42".to_owned()), ("id".to_owned(), "43".to_owned())].into_iter().collect::<PathParams>();

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("name"), None);
        assert_eq!(params.iter().map(|(_, value)| value).collect::<Vec<_>>(), vec!["42", "43"]);
        assert!(PathParams::empty().is_empty());
    }

    #[test]
    fn test_request_context_accessors() {
        let params = [("id".to_owned(), "7".to_owned())].into_iter().collect();
        let req = context("/users/7?page=2", RouteMatch::new(params, Some("page=2".to_owned())));

        assert_eq!(req.method(), &Method::GET);
        assert_eq!(req.uri().path(), "/users/7");
        assert_eq!(req.path_params().get("id"), Some("7"));
        assert_eq!(req.query(), Some("page=2"));
        assert_eq!(req.body().as_ref(), b"{}");
    }

    #[test]
    fn test_query_as() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Paging {
            page: u32,
            size: Option<u32>,
        }

        let req = context("/users?page=3", RouteMatch::new(PathParams::empty(), Some("page=3".to_owned())));
        assert_eq!(req.query_as::<Paging>().unwrap(), Paging { page: 3, size: None });

        let req = context("/users", RouteMatch::default());
        assert!(req.query_as::<Paging>().is_err());
    }
}
