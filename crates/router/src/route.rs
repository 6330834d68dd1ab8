//! Route definitions as authored, and routes as compiled into the table.
//!
//! A route source exports its handlers in one of two shapes, see [`RouteExport`].
//! Both shapes are normalized once, while the table is built, into a
//! [`MethodHandlers`] table, so resolution never inspects the authored shape.

use crate::discovery::RouteFile;
use crate::error::RouteLoadError;
use crate::handler::RequestHandler;
use crate::pattern::{RouteMatch, RoutePattern};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type SharedHandler = Arc<dyn RequestHandler>;

/// The handlers a route source exports.
#[derive(Clone)]
pub enum RouteExport {
    /// The source itself is a handler, used for every method.
    Callable(SharedHandler),
    /// Handlers bound to lower-case method names, plus an optional `default`
    /// handler for the methods without a binding.
    Module { methods: HashMap<String, SharedHandler>, default: Option<SharedHandler> },
}

/// A route as authored by a route source, before compilation.
#[derive(Clone)]
pub struct RouteDefinition {
    path: Option<String>,
    priority: Option<i32>,
    export: RouteExport,
}

macro_rules! method_binding {
    ($method:ident) => {
        #[doc = concat!("Binds `handler` to `", stringify!($method), "` requests")]
        pub fn $method<H: RequestHandler + 'static>(self, handler: H) -> Self {
            self.method(stringify!($method), handler)
        }
    };
}

impl RouteDefinition {
    /// A route source that is itself the handler for any method
    pub fn callable<H: RequestHandler + 'static>(handler: H) -> Self {
        Self::from_export(RouteExport::Callable(Arc::new(handler)))
    }

    /// A route source without bindings yet; add them with [`get`](Self::get), [`post`](Self::post), ...
    pub fn module() -> Self {
        Self::from_export(RouteExport::Module { methods: HashMap::new(), default: None })
    }

    pub fn from_export(export: RouteExport) -> Self {
        Self { path: None, priority: None, export }
    }

    /// Binds `handler` to the method `name`, compared case-insensitively.
    ///
    /// Binding a method on a callable source keeps the callable as the `default`.
    pub fn method<H: RequestHandler + 'static>(mut self, name: impl AsRef<str>, handler: H) -> Self {
        let name = name.as_ref().to_ascii_lowercase();
        let handler: SharedHandler = Arc::new(handler);

        self.export = match self.export {
            RouteExport::Callable(callable) => {
                RouteExport::Module { methods: HashMap::from([(name, handler)]), default: Some(callable) }
            }
            RouteExport::Module { mut methods, default } => {
                methods.insert(name, handler);
                RouteExport::Module { methods, default }
            }
        };
        self
    }

    method_binding!(get);
    method_binding!(post);
    method_binding!(put);
    method_binding!(delete);
    method_binding!(head);
    method_binding!(options);
    method_binding!(patch);
    method_binding!(connect);
    method_binding!(trace);

    /// Sets the `default` handler, used for methods without a binding
    pub fn default_handler<H: RequestHandler + 'static>(mut self, handler: H) -> Self {
        let handler: SharedHandler = Arc::new(handler);

        self.export = match self.export {
            RouteExport::Callable(_) => RouteExport::Callable(handler),
            RouteExport::Module { methods, .. } => RouteExport::Module { methods, default: Some(handler) },
        };
        self
    }

    /// Declares the URL template explicitly instead of deriving it from the file location
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Declares the resolution priority, higher sorts first
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    pub fn export(&self) -> &RouteExport {
        &self.export
    }
}

impl fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("path", &self.path)
            .field("priority", &self.priority)
            .field("export", &self.export)
            .finish()
    }
}

impl fmt::Debug for RouteExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteExport::Callable(_) => f.write_str("Callable"),
            RouteExport::Module { methods, default } => f
                .debug_struct("Module")
                .field("methods", &sorted_names(methods))
                .field("default", &default.is_some())
                .finish(),
        }
    }
}

fn sorted_names(methods: &HashMap<String, SharedHandler>) -> Vec<&str> {
    let mut names = methods.keys().map(String::as_str).collect::<Vec<_>>();
    names.sort_unstable();
    names
}

/// Method to handler table of a compiled route.
///
/// Lookup tries the exact method binding first, then the fallback
/// (the callable source or its `default` export).
#[derive(Clone)]
pub struct MethodHandlers {
    by_method: HashMap<String, SharedHandler>,
    fallback: Option<SharedHandler>,
}

impl MethodHandlers {
    /// Normalizes an export, `None` when it can't handle any method.
    pub fn from_export(export: RouteExport) -> Option<Self> {
        let handlers = match export {
            RouteExport::Callable(handler) => Self { by_method: HashMap::new(), fallback: Some(handler) },
            RouteExport::Module { methods, default } => Self { by_method: methods, fallback: default },
        };

        (!handlers.by_method.is_empty() || handlers.fallback.is_some()).then_some(handlers)
    }

    /// Finds the handler for a lower-case method name
    pub fn lookup(&self, method: &str) -> Option<&SharedHandler> {
        self.by_method.get(method).or(self.fallback.as_ref())
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Lower-case names of the explicitly bound methods, sorted
    pub fn methods(&self) -> Vec<&str> {
        sorted_names(&self.by_method)
    }
}

impl fmt::Debug for MethodHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodHandlers").field("methods", &self.methods()).field("fallback", &self.has_fallback()).finish()
    }
}

/// Effective priority: an explicit non-zero priority wins, otherwise index routes
/// sort after their siblings.
pub fn effective_priority(explicit: Option<i32>, is_index: bool) -> i32 {
    match explicit {
        Some(priority) if priority != 0 => priority,
        _ if is_index => -1,
        _ => 0,
    }
}

/// A route of the table. Immutable once compiled.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    source: Option<PathBuf>,
    priority: i32,
    pattern: RoutePattern,
    handlers: MethodHandlers,
}

impl CompiledRoute {
    /// Compiles the definition loaded from `file`; the file location supplies the
    /// template when the definition declares none.
    pub fn from_file(file: &RouteFile, definition: RouteDefinition) -> Result<Self, RouteLoadError> {
        let template = definition.path.clone().unwrap_or_else(|| file.route_path());
        Self::compile(Some(file.path()), &template, definition)
    }

    /// Compiles a definition that declares its own path.
    pub fn from_definition(definition: RouteDefinition) -> Result<Self, RouteLoadError> {
        let template = definition.path.clone().ok_or(RouteLoadError::MissingPath)?;
        Self::compile(None, &template, definition)
    }

    fn compile(source: Option<&Path>, template: &str, definition: RouteDefinition) -> Result<Self, RouteLoadError> {
        let source_name = source.map_or_else(|| PathBuf::from(template), Path::to_path_buf);

        let handlers =
            MethodHandlers::from_export(definition.export).ok_or_else(|| RouteLoadError::no_handler(&source_name))?;
        let pattern = RoutePattern::compile(template).map_err(|e| RouteLoadError::invalid_pattern(template, e))?;
        let priority = effective_priority(definition.priority, pattern.is_index());

        Ok(Self { source: source.map(Path::to_path_buf), priority, pattern, handlers })
    }

    /// The route template, without extension
    pub fn path(&self) -> &str {
        self.pattern.template()
    }

    /// The file this route was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_index(&self) -> bool {
        self.pattern.is_index()
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn handlers(&self) -> &MethodHandlers {
        &self.handlers
    }

    /// Matches the request target and looks up the handler for the lower-case `method`.
    /// Both must succeed for the route to be selected.
    pub fn select(&self, method: &str, target: &str) -> Option<(&SharedHandler, RouteMatch)> {
        let route_match = self.pattern.matches(target)?;
        let handler = self.handlers.lookup(method)?;
        Some((handler, route_match))
    }
}
