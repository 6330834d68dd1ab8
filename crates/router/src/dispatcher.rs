//! The boundary between a transport and the route table.
//!
//! A [`Dispatcher`] resolves a request, invokes the selected handler with a
//! [`RequestContext`] and serializes the outcome as JSON:
//!
//! - `200` with the handler's return value
//! - `404` with `{"message":"Not found","status":404}` when no route matches
//! - `500` with `{"message":<error>,"status":500}` when the handler fails

use crate::config::RouterConfig;
use crate::error::RouterError;
use crate::loader::RouteLoader;
use crate::resolver::{Resolution, Resolver};
use crate::table::RouteTable;
use crate::RequestContext;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Request, Response, StatusCode};
use serde_json::{Value, json};
use tracing::error;

#[derive(Debug, Clone)]
pub struct Dispatcher {
    resolver: Resolver,
}

/// Builds the route table from `config` and wraps it in a [`Dispatcher`].
///
/// Fails if the route root can't be read or any route source can't be loaded.
pub fn router<L>(config: &RouterConfig, loader: &L) -> Result<Dispatcher, RouterError>
where
    L: RouteLoader + ?Sized,
{
    RouteTable::build(config, loader).map(Dispatcher::new)
}

impl Dispatcher {
    pub fn new(table: RouteTable) -> Self {
        Self { resolver: Resolver::new(table) }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub async fn dispatch(&self, request: Request<Bytes>) -> Response<String> {
        let (parts, body) = request.into_parts();

        let matched = match self.resolver.resolve(&parts.method, &parts.uri).await {
            Resolution::Matched(matched) => matched,
            Resolution::NotFound => return not_found(),
        };

        let route = matched.route();
        let handler = matched.handler();
        let req = RequestContext::new(parts, body, matched.into_route_match());

        match handler.invoke(req).await {
            Ok(value) => json_response(StatusCode::OK, &value),
            Err(e) => {
                error!(route = route.path(), cause = %e, "route handler failed");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                json_response(status, &json!({ "message": e.to_string(), "status": status.as_u16() }))
            }
        }
    }
}

fn not_found() -> Response<String> {
    let status = StatusCode::NOT_FOUND;
    json_response(status, &json!({ "message": "Not found", "status": status.as_u16() }))
}

fn json_response(status: StatusCode, body: &Value) -> Response<String> {
    let mut response = Response::new(body.to_string());
    *response.status_mut() = status;
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use crate::loader::RouteRegistry;
    use crate::route::RouteDefinition;
    use serde::Deserialize;
    use std::fs::File;
    use std::io;

    async fn get_user(req: RequestContext) -> Result<Value, io::Error> {
        Ok(json!({ "id": req.path_params().get("id"), "query": req.query() }))
    }

    async fn create_user(req: RequestContext) -> Result<Value, io::Error> {
        let name = String::from_utf8_lossy(req.body()).into_owned();
        Ok(json!({ "created": name }))
    }

    async fn failing(_req: RequestContext) -> Result<(), io::Error> {
        Err(io::Error::other("boom"))
    }

    #[derive(Deserialize)]
    struct Search {
        q: String,
    }

    async fn search(req: RequestContext) -> Result<Vec<String>, serde_qs::Error> {
        let search = req.query_as::<Search>()?;
        Ok(search.q.split(' ').map(str::to_owned).collect())
    }

    fn dispatcher() -> Dispatcher {
        let table = RouteTable::from_definitions([
            RouteDefinition::module().get(handler_fn(get_user)).post(handler_fn(create_user)).with_path("/users/[id]"),
            RouteDefinition::callable(handler_fn(failing)).with_path("/broken"),
            RouteDefinition::module().get(handler_fn(search)).with_path("/search"),
        ])
        .unwrap();
        Dispatcher::new(table)
    }

    fn request(method: http::Method, uri: &str, body: &'static str) -> Request<Bytes> {
        Request::builder().method(method).uri(uri).body(Bytes::from_static(body.as_bytes())).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_ok() {
        let response = dispatcher().dispatch(request(http::Method::GET, "/users/42?verbose=1", "")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let body: Value = serde_json::from_str(response.body()).unwrap();
        assert_eq!(body, json!({ "id": "42", "query": "verbose=1" }));
    }

    #[tokio::test]
    async fn test_dispatch_reads_body() {
        let response = dispatcher().dispatch(request(http::Method::POST, "/users/new", "ada")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), r#"{"created":"ada"}"#);
    }

    #[tokio::test]
    async fn test_dispatch_not_found() {
        let dispatcher = dispatcher();

        for (method, uri) in [(http::Method::GET, "/nowhere"), (http::Method::DELETE, "/users/42")] {
            let response = dispatcher.dispatch(request(method, uri, "")).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(response.body(), r#"{"message":"Not found","status":404}"#);
        }
    }

    #[tokio::test]
    async fn test_dispatch_handler_error() {
        let response = dispatcher().dispatch(request(http::Method::PUT, "/broken", "")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body(), r#"{"message":"boom","status":500}"#);
    }

    #[tokio::test]
    async fn test_dispatch_query_extraction() {
        let dispatcher = dispatcher();

        let response = dispatcher.dispatch(request(http::Method::GET, "/search?q=file%20router", "")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), r#"["file","router"]"#);

        let response = dispatcher.dispatch(request(http::Method::GET, "/search", "")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_router_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("index.ts")).unwrap();
        let registry = RouteRegistry::new().register("index.ts", RouteDefinition::module().get(handler_fn(get_user)));

        let dispatcher = router(&RouterConfig::new(dir.path()), &registry).unwrap();
        let response = dispatcher.dispatch(request(http::Method::GET, "/", "")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(dispatcher.resolver().table().len(), 1);
    }

    #[test]
    fn test_router_missing_root() {
        let dir = tempfile::tempdir().unwrap();

        let result = router(&RouterConfig::new(dir.path().join("missing")), &RouteRegistry::new());

        assert!(matches!(result, Err(RouterError::FileSystem { .. })));
    }
}
