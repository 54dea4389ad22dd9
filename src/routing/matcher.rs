//! Route matching logic.
//!
//! # Responsibilities
//! - Match the request path against an anchored route pattern
//! - Match the request method against a route's method list
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Patterns are anchored: `src` must match the whole path
//! - Method matching is case-insensitive on the descriptor side
//! - Empty condition = always matches (wildcard)

use axum::http::Method;
use regex::{Captures, Regex};

use crate::routing::descriptor::anchored;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, method: &Method, path: &str) -> bool;
}

/// Matches the request path against a route `src` pattern.
#[derive(Debug, Clone)]
pub struct PathPatternMatcher {
    pattern: Regex,
}

impl PathPatternMatcher {
    /// Compile a route `src`, anchored at both ends.
    pub fn new(src: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&anchored(src))?,
        })
    }

    /// Capture groups for `path`, if it matches.
    pub fn captures<'p>(&self, path: &'p str) -> Option<Captures<'p>> {
        self.pattern.captures(path)
    }
}

impl Matcher for PathPatternMatcher {
    fn matches(&self, _method: &Method, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}

/// Matches the request method against an allow list.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    methods: Vec<Method>,
}

impl MethodMatcher {
    /// Build from descriptor method names; unparseable names are dropped.
    pub fn new<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let methods = methods
            .into_iter()
            .filter_map(|m| Method::from_bytes(m.as_ref().to_ascii_uppercase().as_bytes()).ok())
            .collect();
        Self { methods }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, method: &Method, _path: &str) -> bool {
        self.methods.iter().any(|m| m == method)
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, method: &Method, path: &str) -> bool {
        // All matchers must pass (AND)
        self.matchers.iter().all(|m| m.matches(method, path))
    }
}
