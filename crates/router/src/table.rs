//! The route table: every route compiled once at start-up, in resolution order.
//!
//! Building is all-or-nothing. An unreadable directory or a route source that can't be
//! loaded aborts the build, a partial table is never handed out.

use crate::config::RouterConfig;
use crate::discovery::{RouteFile, discover};
use crate::error::{RouteLoadError, RouterError};
use crate::loader::RouteLoader;
use crate::route::{CompiledRoute, RouteDefinition};
use std::cmp::Reverse;
use std::slice::Iter;
use tracing::{debug, info};

/// Compiled routes sorted by descending priority. Equal priorities keep discovery order.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    /// Discovers the route files below the configured root, loads each one with `loader`
    /// and compiles the result.
    pub fn build<L>(config: &RouterConfig, loader: &L) -> Result<Self, RouterError>
    where
        L: RouteLoader + ?Sized,
    {
        let root = config.root();
        let files = discover(root, config.extensions())?;

        let routes = files
            .into_iter()
            .map(|path| {
                let file = RouteFile::new(root, path);
                let definition = loader.load(&file)?;
                CompiledRoute::from_file(&file, definition)
            })
            .collect::<Result<Vec<_>, RouteLoadError>>()?;

        let table = Self::from_routes(routes);
        info!(root = %root.display(), routes = table.len(), "route table built");
        Ok(table)
    }

    /// Builds a table from definitions that declare their own path.
    /// The iteration order stands in for discovery order.
    pub fn from_definitions<I>(definitions: I) -> Result<Self, RouteLoadError>
    where
        I: IntoIterator<Item = RouteDefinition>,
    {
        let routes = definitions.into_iter().map(CompiledRoute::from_definition).collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_routes(routes))
    }

    fn from_routes(mut routes: Vec<CompiledRoute>) -> Self {
        // stable, so equal priorities stay in discovery order
        routes.sort_by_key(|route| Reverse(route.priority()));

        for route in &routes {
            debug!(path = route.path(), priority = route.priority(), index = route.is_index(), "route registered");
        }
        Self { routes }
    }

    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    pub fn iter(&self) -> Iter<'_, CompiledRoute> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a CompiledRoute;
    type IntoIter = Iter<'a, CompiledRoute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
