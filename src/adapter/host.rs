//! Host-side request/response representation.
//!
//! A serverless host hands the function a JSON event describing the request
//! and expects a JSON result describing the response. These types are that
//! pair, with conversions to and from `http` types.

use std::collections::BTreeMap;

use axum::{
    body::{Body, Bytes},
    http::{header::SET_COOKIE, HeaderName, HeaderValue, Method, Request, Uri},
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::response::SOMETHING_BROKE;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("invalid method '{0}'")]
    Method(String),

    #[error("invalid uri '{uri}': {message}")]
    Uri { uri: String, message: String },

    #[error("invalid header '{0}'")]
    Header(String),

    #[error("invalid base64 body: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("cannot build request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("cannot read response body: {0}")]
    Body(#[from] axum::Error),
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_path() -> String {
    "/".to_string()
}

/// Incoming request as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRequest {
    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default = "default_path")]
    pub path: String,

    /// Raw query string, without the leading `?`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl Default for HostRequest {
    fn default() -> Self {
        Self {
            method: default_method(),
            path: default_path(),
            query: None,
            headers: BTreeMap::new(),
            body: None,
            is_base64_encoded: false,
        }
    }
}

impl HostRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Convert into an `http::Request` the application can dispatch.
    pub fn into_request(self) -> Result<Request<Body>, HostError> {
        let HostRequest {
            method,
            path,
            query,
            headers,
            body,
            is_base64_encoded,
        } = self;

        let method =
            Method::from_bytes(method.as_bytes()).map_err(|_| HostError::Method(method.clone()))?;

        let mut target = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(&query);
        }
        let uri: Uri = target.parse().map_err(|e: axum::http::uri::InvalidUri| HostError::Uri {
            uri: target.clone(),
            message: e.to_string(),
        })?;

        let body = match body {
            None => Bytes::new(),
            Some(encoded) if is_base64_encoded => Bytes::from(STANDARD.decode(encoded)?),
            Some(text) => Bytes::from(text),
        };

        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in &headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HostError::Header(name.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| HostError::Header(name.to_string()))?;
            builder = builder.header(name, value);
        }

        Ok(builder.body(Body::from(body))?)
    }
}

/// Outgoing response handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostResponse {
    pub status_code: u16,

    /// Repeated headers are joined with `, `. `set-cookie` is never listed
    /// here; see `cookies`.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// One entry per `set-cookie` header. Cookie values may contain commas,
    /// so they cannot be joined.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cookies: Vec<String>,

    #[serde(default)]
    pub body: String,

    /// Set when `body` holds base64 of a non-UTF-8 payload.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl HostResponse {
    /// Buffer an application response into host form.
    pub async fn from_response(response: Response) -> Result<Self, HostError> {
        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await?;

        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        let mut cookies = Vec::new();
        for (name, value) in parts.headers.iter() {
            let Ok(value) = value.to_str() else {
                tracing::warn!(header = %name, "Dropping non-UTF-8 response header");
                continue;
            };
            if *name == SET_COOKIE {
                cookies.push(value.to_string());
                continue;
            }
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }

        let (body, is_base64_encoded) = match std::str::from_utf8(&bytes) {
            Ok(text) => (text.to_string(), false),
            Err(_) => (STANDARD.encode(&bytes), true),
        };

        Ok(Self {
            status_code: parts.status.as_u16(),
            headers,
            cookies,
            body,
            is_base64_encoded,
        })
    }

    /// The fixed catch-all 500 in host form.
    pub fn something_broke() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(
            "content-type".to_string(),
            "text/plain; charset=utf-8".to_string(),
        );
        Self {
            status_code: 500,
            headers,
            cookies: Vec::new(),
            body: SOMETHING_BROKE.to_string(),
            is_base64_encoded: false,
        }
    }

    /// Decoded body bytes.
    pub fn body_bytes(&self) -> Result<Vec<u8>, HostError> {
        if self.is_base64_encoded {
            Ok(STANDARD.decode(&self.body)?)
        } else {
            Ok(self.body.clone().into_bytes())
        }
    }
}
