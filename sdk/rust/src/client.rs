//! Client for the IJ portfolio backend API.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Welcome {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

#[derive(Debug)]
pub enum ClientError {
    Http(reqwest::Error),
    /// The API answered with a non-success status.
    Status { status: StatusCode, body: String },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "HTTP error: {}", e),
            ClientError::Status { status, body } => {
                write!(f, "API returned error status {}: {}", status, body)
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}

pub struct PortfolioClient {
    client: Client,
    base_url: String,
}

impl PortfolioClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /`
    pub async fn welcome(&self) -> Result<Welcome, ClientError> {
        self.get_json("/").await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<Value, ClientError> {
        self.get_json("/health").await
    }

    /// `GET /api/v1/{collection}`
    pub async fn list(&self, collection: &str) -> Result<Vec<Value>, ClientError> {
        self.get_json(&format!("/api/v1/{}", collection)).await
    }

    /// `GET /api/v1/{collection}/{id}`; `None` on 404.
    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, ClientError> {
        match self.get_json(&format!("/api/v1/{}/{}", collection, id)).await {
            Ok(doc) => Ok(Some(doc)),
            Err(ClientError::Status { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        Ok(resp.json().await?)
    }
}
