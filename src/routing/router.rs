//! Route lookup against a compiled descriptor.
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in declaration order; first match wins
//! - Explicit `None` rather than a silent default

use axum::http::Method;

use crate::routing::descriptor::{Descriptor, DescriptorError, DescriptorIssue};
use crate::routing::matcher::{AndMatcher, Matcher, MethodMatcher, PathPatternMatcher};

#[derive(Debug)]
struct CompiledRoute {
    condition: AndMatcher,
    pattern: PathPatternMatcher,
    dest: String,
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Index of the matching route in the descriptor.
    pub route: usize,
    /// Destination with captures substituted.
    pub dest: String,
    /// `src` of the build the destination names, if any.
    pub build: Option<String>,
}

/// A descriptor compiled for request lookup.
#[derive(Debug)]
pub struct DescriptorRouter {
    routes: Vec<CompiledRoute>,
    descriptor: Descriptor,
}

impl DescriptorRouter {
    /// Validate and compile a descriptor.
    pub fn compile(descriptor: Descriptor) -> Result<Self, DescriptorError> {
        descriptor.validate().map_err(DescriptorError::Invalid)?;

        let mut routes = Vec::with_capacity(descriptor.routes.len());
        for route in &descriptor.routes {
            // Validation already compiled every pattern once.
            let pattern = PathPatternMatcher::new(&route.src).map_err(|e| {
                DescriptorError::Invalid(vec![DescriptorIssue {
                    location: "routes".into(),
                    message: e.to_string(),
                }])
            })?;

            let mut matchers: Vec<Box<dyn Matcher>> = vec![Box::new(pattern.clone())];
            if let Some(methods) = &route.methods {
                matchers.push(Box::new(MethodMatcher::new(methods)));
            }

            routes.push(CompiledRoute {
                condition: AndMatcher::new(matchers),
                pattern,
                dest: route.dest.clone(),
            });
        }

        Ok(Self { routes, descriptor })
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Find the first route matching `method` and `path`.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<Resolved> {
        let (index, route) = self
            .routes
            .iter()
            .enumerate()
            .find(|(_, r)| r.condition.matches(method, path))?;

        let mut dest = String::new();
        match route.pattern.captures(path) {
            Some(caps) => caps.expand(&route.dest, &mut dest),
            None => dest.push_str(&route.dest),
        }

        let target = dest.split('?').next().unwrap_or_default();
        let build = self.descriptor.build(target).map(|b| b.src.clone());

        Some(Resolved {
            route: index,
            dest,
            build,
        })
    }
}
