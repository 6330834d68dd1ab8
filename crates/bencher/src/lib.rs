use async_trait::async_trait;
use micro_fs_router::{RequestContext, RequestHandler, RouteDefinition, RouteTable};
use serde_json::Value;
use std::error::Error;

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    uri: &'static str,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, uri: &'static str) -> Self {
        Self { name, group, uri }
    }

    pub fn small(name: &'static str, uri: &'static str) -> Self {
        Self::new(name, TestGroup::Small, uri)
    }

    pub fn normal(name: &'static str, uri: &'static str) -> Self {
        Self::new(name, TestGroup::Normal, uri)
    }

    pub fn large(name: &'static str, uri: &'static str) -> Self {
        Self::new(name, TestGroup::Large, uri)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn uri(&self) -> &'static str {
        self.uri
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}

impl TestGroup {
    /// number of filler routes placed ahead of the fixed ones
    pub fn filler_routes(self) -> usize {
        match self {
            TestGroup::Small => 8,
            TestGroup::Normal => 64,
            TestGroup::Large => 512,
        }
    }
}

/// Does nothing, resolution is what gets measured.
#[derive(Debug, Clone, Copy)]
pub struct NoopHandler;

#[async_trait]
impl RequestHandler for NoopHandler {
    async fn invoke(&self, _req: RequestContext) -> Result<Value, Box<dyn Error + Send + Sync>> {
        Ok(Value::Null)
    }
}

/// Route templates every bench table carries, after its filler routes.
pub const FIXED_ROUTES: [&str; 6] =
    ["/index", "/about", "/users/index", "/users/[id]", "/orgs/[org]/repos/[repo]", "/orgs/[org]/repos/[repo]/issues/[number]"];

/// A table of `filler` static routes like `/section-3/page-7` followed by [`FIXED_ROUTES`].
pub fn route_table(filler: usize) -> RouteTable {
    let filler_routes = (0..filler).map(|i| format!("/section-{}/page-{}", i / 8, i % 8));
    let templates = filler_routes.chain(FIXED_ROUTES.iter().map(|template| (*template).to_owned()));

    RouteTable::from_definitions(templates.map(|template| RouteDefinition::module().get(NoopHandler).with_path(template)))
        .expect("bench routes must compile")
}
