//! Multipart file upload.
//!
//! Files land in `http.upload_dir` under a UUID-prefixed, sanitized name.
//! Non-file form fields are ignored. Size is bounded by
//! `http.upload_limit_bytes` via a route-level `DefaultBodyLimit`.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::AppContext;
use crate::http::response::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub stored_as: String,
    pub size: usize,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub files: Vec<UploadedFile>,
}

/// Keep the final path component and replace anything outside `[A-Za-z0-9._-]`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

pub async fn upload_files(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut multipart = multipart?;
    let dir = &ctx.config.http.upload_dir;
    tokio::fs::create_dir_all(dir).await?;

    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(sanitize_file_name) else {
            continue;
        };
        let field_name = field.name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        let stored_as = format!("{}-{}", Uuid::new_v4(), file_name);
        tokio::fs::write(dir.join(&stored_as), &data).await?;

        tracing::info!(file = %stored_as, size = data.len(), "Stored upload");
        files.push(UploadedFile {
            field: field_name,
            file_name,
            stored_as,
            size: data.len(),
            content_type,
        });
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("no files in request".into()));
    }

    Ok((StatusCode::CREATED, Json(UploadResponse { files })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("resume.pdf"), "resume.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\me 1.png"), "me_1.png");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(""), "upload");
    }
}
