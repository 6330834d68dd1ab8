//! Per-request route resolution.
//!
//! Every route of the table is checked independently and concurrently. The winner is the
//! first successful check *by table position*, never by completion order, so the result
//! is the same as walking the table front to back.

use crate::pattern::RouteMatch;
use crate::route::{CompiledRoute, SharedHandler};
use crate::table::RouteTable;
use futures::future::join_all;
use http::uri::PathAndQuery;
use http::{Method, Uri};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Outcome of resolving one request. Not finding a route is a normal outcome, not an error.
#[derive(Debug)]
pub enum Resolution<'table> {
    Matched(MatchedRoute<'table>),
    NotFound,
}

/// The selected route, its handler for the request method, and what its pattern extracted.
pub struct MatchedRoute<'table> {
    route: &'table CompiledRoute,
    handler: &'table SharedHandler,
    route_match: RouteMatch,
}

impl<'table> Resolution<'table> {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Matched(_))
    }

    pub fn matched(self) -> Option<MatchedRoute<'table>> {
        match self {
            Resolution::Matched(matched) => Some(matched),
            Resolution::NotFound => None,
        }
    }
}

impl fmt::Debug for MatchedRoute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchedRoute").field("route", &self.route.path()).field("route_match", &self.route_match).finish()
    }
}

impl<'table> MatchedRoute<'table> {
    pub fn route(&self) -> &'table CompiledRoute {
        self.route
    }

    pub fn handler(&self) -> &'table SharedHandler {
        self.handler
    }

    pub fn route_match(&self) -> &RouteMatch {
        &self.route_match
    }

    pub fn into_route_match(self) -> RouteMatch {
        self.route_match
    }
}

/// Resolves requests against a shared, immutable [`RouteTable`].
#[derive(Debug, Clone)]
pub struct Resolver {
    table: Arc<RouteTable>,
}

impl Resolver {
    pub fn new(table: RouteTable) -> Self {
        Self { table: Arc::new(table) }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Selects the handler for `method` and `uri`.
    ///
    /// The method is compared lower-cased; the target is the path plus query,
    /// `/` when the uri carries neither.
    pub async fn resolve(&self, method: &Method, uri: &Uri) -> Resolution<'_> {
        let method = method.as_str().to_ascii_lowercase();
        let url = uri.path_and_query().map_or("/", PathAndQuery::as_str);

        let candidates = join_all(self.table.iter().map(|route| select(route, &method, url))).await;

        match candidates.into_iter().flatten().next() {
            Some(matched) => {
                trace!(%method, url, route = matched.route.path(), "route resolved");
                Resolution::Matched(matched)
            }
            None => {
                debug!(%method, url, "no route found");
                Resolution::NotFound
            }
        }
    }
}

#[allow(clippy::unused_async, reason = "evaluated as one future per route by join_all")]
async fn select<'table>(route: &'table CompiledRoute, method: &str, target: &str) -> Option<MatchedRoute<'table>> {
    let (handler, route_match) = route.select(method, target)?;
    Some(MatchedRoute { route, handler, route_match })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteDefinition;
    use crate::route::tests::{Named, name_of};
    use serde_json::{Value, json};

    fn resolver(definitions: Vec<RouteDefinition>) -> Resolver {
        Resolver::new(RouteTable::from_definitions(definitions).unwrap())
    }

    fn route(path: &str, name: &'static str) -> RouteDefinition {
        RouteDefinition::module().get(Named(name)).with_path(path)
    }

    async fn resolve_name(resolver: &Resolver, method: Method, uri: &str) -> Option<Value> {
        let uri = uri.parse::<Uri>().unwrap();
        match resolver.resolve(&method, &uri).await {
            Resolution::Matched(matched) => Some(name_of(matched.handler()).await),
            Resolution::NotFound => None,
        }
    }

    #[tokio::test]
    async fn test_index_loses_to_sibling() {
        let resolver = resolver(vec![route("/index", "home"), route("/about", "about")]);

        assert_eq!(resolve_name(&resolver, Method::GET, "/about").await, Some(json!("about")));
        assert_eq!(resolve_name(&resolver, Method::GET, "/").await, Some(json!("home")));
        assert_eq!(resolve_name(&resolver, Method::GET, "/index").await, Some(json!("home")));
        assert_eq!(resolve_name(&resolver, Method::GET, "/contact").await, None);
    }

    #[tokio::test]
    async fn test_index_against_dynamic_sibling() {
        let by_default = resolver(vec![route("/index", "home"), route("/[page]", "page")]);

        assert_eq!(by_default.table().routes()[0].path(), "/[page]");
        assert_eq!(resolve_name(&by_default, Method::GET, "/").await, Some(json!("home")));
        assert_eq!(resolve_name(&by_default, Method::GET, "/index").await, Some(json!("page")));
        assert_eq!(resolve_name(&by_default, Method::GET, "/pricing").await, Some(json!("page")));

        let by_priority = resolver(vec![
            RouteDefinition::module().get(Named("home")).with_path("/index").with_priority(1),
            route("/[page]", "page"),
        ]);

        assert_eq!(by_priority.table().routes()[0].path(), "/index");
        assert_eq!(resolve_name(&by_priority, Method::GET, "/index").await, Some(json!("home")));
    }

    #[tokio::test]
    async fn test_static_and_dynamic_resolve_by_declaration_order() {
        let dynamic_first = resolver(vec![route("/users/[id]", "user"), route("/users/new", "new user")]);
        assert_eq!(resolve_name(&dynamic_first, Method::GET, "/users/new").await, Some(json!("user")));

        let static_first = resolver(vec![route("/users/new", "new user"), route("/users/[id]", "user")]);
        assert_eq!(resolve_name(&static_first, Method::GET, "/users/new").await, Some(json!("new user")));
        assert_eq!(resolve_name(&static_first, Method::GET, "/users/42").await, Some(json!("user")));
    }

    #[tokio::test]
    async fn test_priority_beats_declaration_order() {
        let resolver = resolver(vec![
            route("/users/[id]", "user"),
            RouteDefinition::module().get(Named("new user")).with_path("/users/new").with_priority(1),
        ]);

        assert_eq!(resolve_name(&resolver, Method::GET, "/users/new").await, Some(json!("new user")));
    }

    #[tokio::test]
    async fn test_method_without_handler_is_not_found() {
        let resolver = resolver(vec![route("/health", "health")]);

        assert_eq!(resolve_name(&resolver, Method::GET, "/health").await, Some(json!("health")));
        assert_eq!(resolve_name(&resolver, Method::POST, "/health").await, None);
    }

    #[tokio::test]
    async fn test_method_mismatch_falls_through_to_next_route() {
        let resolver = resolver(vec![
            RouteDefinition::module().post(Named("create")).with_path("/items"),
            RouteDefinition::callable(Named("any")).with_path("/items"),
        ]);

        assert_eq!(resolve_name(&resolver, Method::POST, "/items").await, Some(json!("create")));
        assert_eq!(resolve_name(&resolver, Method::DELETE, "/items").await, Some(json!("any")));
    }

    #[tokio::test]
    async fn test_extension_method_is_lower_cased() {
        let resolver = resolver(vec![RouteDefinition::module().method("PURGE", Named("purge")).with_path("/cache")]);
        let purge = Method::from_bytes(b"PURGE").unwrap();

        assert_eq!(resolve_name(&resolver, purge, "/cache").await, Some(json!("purge")));
    }

    #[tokio::test]
    async fn test_match_data_is_returned() {
        let resolver = resolver(vec![route("/orgs/[org]/members/[user]", "member")]);
        let uri = "/orgs/acme/members/ada?fields=name".parse::<Uri>().unwrap();

        let matched = resolver.resolve(&Method::GET, &uri).await.matched().unwrap();

        assert_eq!(matched.route().path(), "/orgs/[org]/members/[user]");
        assert_eq!(matched.route_match().params().get("org"), Some("acme"));
        assert_eq!(matched.route_match().params().get("user"), Some("ada"));
        assert_eq!(matched.route_match().query(), Some("fields=name"));
    }

    #[tokio::test]
    async fn test_absolute_uri_and_empty_path() {
        let resolver = resolver(vec![route("/index", "home"), route("/about", "about")]);

        assert_eq!(resolve_name(&resolver, Method::GET, "http://example.com/about?x=1").await, Some(json!("about")));
        assert_eq!(resolve_name(&resolver, Method::GET, "http://example.com").await, Some(json!("home")));
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let resolver = resolver(vec![route("/a/[x]", "first"), route("/a/[y]", "second"), route("/a/b", "third")]);
        let uri = "/a/b".parse::<Uri>().unwrap();

        for _ in 0..3 {
            let matched = resolver.resolve(&Method::GET, &uri).await.matched().unwrap();
            assert_eq!(matched.route().path(), "/a/[x]");
            assert_eq!(name_of(matched.handler()).await, json!("first"));
        }
    }

    #[tokio::test]
    async fn test_empty_table() {
        let resolver = resolver(Vec::new());

        assert!(!resolver.resolve(&Method::GET, &Uri::from_static("/")).await.is_found());
    }
}
