//! A file-system driven HTTP request router
//!
//! Route handlers live in a directory tree, and each file's location becomes the URL
//! it answers:
//!
//! ```text
//! routes/
//! ├── index.ts          -> /            (and /index)
//! ├── about.ts          -> /about
//! └── users/
//!     ├── index.ts      -> /users       (and /users/index)
//!     └── [id].ts       -> /users/42, /users/ada, ...
//! ```
//!
//! The route table is built once at start-up: files are discovered, loaded through a
//! [`RouteLoader`], compiled into anchored case-insensitive patterns and sorted by
//! priority. Per request, the [`Resolver`] picks the first route, in table order, whose
//! pattern matches the URL and which has a handler for the request method.
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use http::Request;
//! use micro_fs_router::{RequestContext, RouteDefinition, RouteRegistry, RouterConfig, handler_fn, router};
//! use serde_json::{Value, json};
//! use std::io;
//!
//! async fn get_user(req: RequestContext) -> Result<Value, io::Error> {
//!     Ok(json!({ "id": req.path_params().get("id") }))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = RouteRegistry::new().register("users/[id].ts", RouteDefinition::module().get(handler_fn(get_user)));
//!     let dispatcher = router(&RouterConfig::new("routes"), &registry).expect("route table should build");
//!
//!     let request = Request::get("/users/42").body(Bytes::new()).unwrap();
//!     let response = dispatcher.dispatch(request).await;
//!     assert_eq!(response.body(), r#"{"id":"42"}"#);
//! }
//! ```
//!
//! # Resolution order
//!
//! Routes sort by descending priority. A route without an explicit priority has `0`,
//! an index route has `-1` so that its siblings win when both match. Equal priorities
//! keep discovery order: a static `/users/new` and a dynamic `/users/[id]` are not
//! ranked by specificity, give the static route a higher priority to prefer it.
//!
//! # Architecture
//!
//! - [`discovery`]: walks the route root
//! - [`pattern`]: compiles route templates
//! - [`loader`]: turns discovered files into [`RouteDefinition`]s
//! - [`table`]: builds the immutable [`RouteTable`]
//! - [`resolver`]: selects the handler for a request
//! - [`dispatcher`]: invokes it and serializes the outcome

mod config;
mod error;
mod handler;
mod request;
mod route;

pub mod discovery;
pub mod dispatcher;
pub mod loader;
pub mod pattern;
pub mod resolver;
pub mod table;

pub use config::{DEFAULT_EXTENSIONS, RouterConfig, RouterConfigBuilder};
pub use discovery::{RouteFile, discover};
pub use dispatcher::{Dispatcher, router};
pub use error::{ConfigError, FileSystemError, RouteLoadError, RouterError};
pub use handler::{FnHandler, RequestHandler, handler_fn};
pub use loader::{FnLoader, RouteLoader, RouteRegistry, loader_fn};
pub use pattern::{RouteMatch, RoutePattern};
pub use request::{PathParams, RequestContext};
pub use resolver::{MatchedRoute, Resolution, Resolver};
pub use route::{CompiledRoute, MethodHandlers, RouteDefinition, RouteExport, SharedHandler, effective_priority};
pub use table::RouteTable;
