use bytes::Bytes;
use http::{Method, Request};
use micro_fs_router::{RequestContext, RouteDefinition, RouteRegistry, RouterConfig, handler_fn, router};
use serde::Serialize;
use serde_json::{Value, json};
use std::fs::{self, File};
use std::io;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Serialize)]
struct User {
    id: String,
    name: &'static str,
}

async fn home(_req: RequestContext) -> Result<&'static str, io::Error> {
    Ok("hello world")
}

async fn list_users(_req: RequestContext) -> Result<Vec<&'static str>, io::Error> {
    Ok(vec!["ada", "grace"])
}

async fn get_user(req: RequestContext) -> Result<User, io::Error> {
    let id = req.path_params().get("id").unwrap_or_default().to_owned();
    Ok(User { id, name: "ada" })
}

async fn health(req: RequestContext) -> Result<Value, io::Error> {
    Ok(json!({ "status": "up", "method": req.method().as_str() }))
}

async fn crash(_req: RequestContext) -> Result<(), io::Error> {
    Err(io::Error::other("something went wrong"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let root = tempfile::tempdir()?;
    for file in ["index.ts", "health.ts", "crash.ts", "users/index.ts", "users/[id].ts"] {
        let path = root.path().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        File::create(path)?;
    }

    let registry = RouteRegistry::new()
        .register("index", RouteDefinition::module().get(handler_fn(home)))
        .register("health", RouteDefinition::callable(handler_fn(health)))
        .register("crash", RouteDefinition::module().get(handler_fn(crash)))
        .register("users/index", RouteDefinition::module().get(handler_fn(list_users)))
        .register("users/[id]", RouteDefinition::module().get(handler_fn(get_user)));

    let dispatcher = router(&RouterConfig::new(root.path()), &registry)?;

    let requests = [
        (Method::GET, "/"),
        (Method::GET, "/users"),
        (Method::GET, "/users/42?expand=posts"),
        (Method::HEAD, "/health"),
        (Method::POST, "/users/42"),
        (Method::GET, "/crash"),
    ];
    for (method, uri) in requests {
        let request = Request::builder().method(method.clone()).uri(uri).body(Bytes::new())?;
        let response = dispatcher.dispatch(request).await;
        info!(%method, uri, status = response.status().as_u16(), body = %response.body(), "dispatched");
    }

    Ok(())
}
