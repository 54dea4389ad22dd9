//! Routing descriptor (`vercel.json`) schema, loading and validation.

use std::path::Path;

use axum::http::Method;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only descriptor version understood.
pub const SUPPORTED_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub version: u32,

    #[serde(default)]
    pub builds: Vec<Build>,

    #[serde(default)]
    pub routes: Vec<Route>,
}

/// A function build: source entry point and the builder that packages it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub src: String,

    #[serde(rename = "use")]
    pub builder: String,
}

/// A URL pattern mapped to a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Regular expression matched against the whole request path.
    pub src: String,

    /// Destination, may reference captures as `$1`.
    pub dest: String,

    /// Restrict the route to these methods. Absent means any method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
}

/// One problem found while validating a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorIssue {
    /// Location such as `routes[2].src`.
    pub location: String,
    pub message: String,
}

impl std::fmt::Display for DescriptorIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("cannot read descriptor: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse descriptor: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid descriptor: {}", join_issues(.0))]
    Invalid(Vec<DescriptorIssue>),
}

fn join_issues(issues: &[DescriptorIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Anchor a route `src` so it must match the whole path.
pub fn anchored(src: &str) -> String {
    format!("^(?:{})$", src)
}

impl Descriptor {
    /// Parse and validate a descriptor from JSON text.
    pub fn from_json(content: &str) -> Result<Self, DescriptorError> {
        let descriptor: Descriptor = serde_json::from_str(content)?;
        descriptor.validate().map_err(DescriptorError::Invalid)?;
        Ok(descriptor)
    }

    /// Find a build by its `src`, ignoring a leading `/`.
    pub fn build(&self, src: &str) -> Option<&Build> {
        let src = src.trim_start_matches('/');
        self.builds
            .iter()
            .find(|b| b.src.trim_start_matches('/') == src)
    }

    /// Check every semantic constraint and collect the failures.
    pub fn validate(&self) -> Result<(), Vec<DescriptorIssue>> {
        let mut issues = Vec::new();
        let mut issue = |location: String, message: String| {
            issues.push(DescriptorIssue { location, message });
        };

        if self.version != SUPPORTED_VERSION {
            issue(
                "version".into(),
                format!("expected {}, found {}", SUPPORTED_VERSION, self.version),
            );
        }

        if self.builds.is_empty() {
            issue("builds".into(), "at least one build is required".into());
        }
        for (i, build) in self.builds.iter().enumerate() {
            if build.src.trim().is_empty() {
                issue(format!("builds[{}].src", i), "must not be empty".into());
            }
            if build.builder.trim().is_empty() {
                issue(format!("builds[{}].use", i), "must not be empty".into());
            }
        }

        for (i, route) in self.routes.iter().enumerate() {
            if let Err(e) = Regex::new(&anchored(&route.src)) {
                issue(format!("routes[{}].src", i), format!("invalid pattern: {}", e));
            }
            if route.dest.trim().is_empty() {
                issue(format!("routes[{}].dest", i), "must not be empty".into());
            }
            for method in route.methods.iter().flatten() {
                if method.is_empty() || Method::from_bytes(method.as_bytes()).is_err() {
                    issue(
                        format!("routes[{}].methods", i),
                        format!("'{}' is not an HTTP method", method),
                    );
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Read, parse and validate a descriptor file.
pub fn load_descriptor(path: &Path) -> Result<Descriptor, DescriptorError> {
    let content = std::fs::read_to_string(path)?;
    Descriptor::from_json(&content)
}
