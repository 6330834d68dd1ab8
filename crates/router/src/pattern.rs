//! Path pattern compiler.
//!
//! Turns a route template such as `/users/[id]/posts.ts` into an anchored,
//! case-insensitive regular expression:
//!
//! - everything from the first `.` on is dropped, so a template can't carry a literal dot
//! - every `[name]` becomes a capture of one path segment, `[^?/]+`
//! - a trailing `/index` becomes optional, so an index route answers its parent directory
//! - the whole path must match, only a `?query` tail may follow it
//!
//! Literal template text is escaped, so `+` or `(` in a file name match themselves.

use crate::request::PathParams;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

static PARAM_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+?)\]").expect("param pattern must be valid"));

const SEGMENT_CAPTURE: &str = "([^?/]+)";
const INDEX_SEGMENT: &str = "index";
const INDEX_SUFFIX: &str = "/index";
const OPTIONAL_INDEX: &str = "(?:/?[:%]index|/(?:index)?)?";
const QUERY_TAIL: &str = r"(?:\?(?P<query>.*))?$";

/// A compiled route template.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    template: String,
    regex: Regex,
    param_names: Vec<String>,
    is_index: bool,
}

/// What a successful [`RoutePattern::matches`] extracted from the request target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMatch {
    params: PathParams,
    query: Option<String>,
}

impl RoutePattern {
    pub fn compile(template: &str) -> Result<Self, regex::Error> {
        let template = normalize_template(template);

        let is_index = template.rsplit('/').next() == Some(INDEX_SEGMENT);
        let head = if is_index { &template[..template.len() - INDEX_SUFFIX.len()] } else { template.as_str() };

        let mut expression = String::with_capacity(template.len() + 32);
        expression.push('^');
        let param_names = push_segments(&mut expression, head);
        if is_index {
            expression.push_str(OPTIONAL_INDEX);
        }
        expression.push_str(QUERY_TAIL);

        let regex = RegexBuilder::new(&expression).case_insensitive(true).build()?;
        Ok(Self { template, regex, param_names, is_index })
    }

    /// The template with its extension stripped
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn is_index(&self) -> bool {
        self.is_index
    }

    /// Names of the dynamic segments, in declaration order
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    /// Matches a request target, path plus optional query, against this pattern.
    pub fn matches(&self, target: &str) -> Option<RouteMatch> {
        let captures = self.regex.captures(target)?;

        // dynamic segments are the leading groups, in declaration order
        let params = self
            .param_names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| captures.get(i + 1).map(|value| (name.clone(), value.as_str().to_owned())))
            .collect();
        let query = captures.name("query").map(|query| query.as_str().to_owned());

        Some(RouteMatch::new(params, query))
    }
}

/// Drops the extension and makes sure the template starts with `/`.
fn normalize_template(template: &str) -> String {
    let template = template.split_once('.').map_or(template, |(head, _)| head);
    if template.starts_with('/') { template.to_owned() } else { format!("/{template}") }
}

/// Appends the regex for `template` to `expression`, returning the parameter names.
fn push_segments(expression: &mut String, template: &str) -> Vec<String> {
    let mut param_names = Vec::new();
    let mut last = 0;

    for captures in PARAM_PATTERN.captures_iter(template) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        expression.push_str(&regex::escape(&template[last..whole.start()]));
        expression.push_str(SEGMENT_CAPTURE);
        param_names.push(name.as_str().to_owned());
        last = whole.end();
    }
    expression.push_str(&regex::escape(&template[last..]));

    param_names
}

impl RouteMatch {
    pub fn new(params: PathParams, query: Option<String>) -> Self {
        Self { params, query }
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn into_parts(self) -> (PathParams, Option<String>) {
        (self.params, self.query)
    }
}
