//! Read-only collection endpoints.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{Method, Uri},
    Json,
};
use serde::Deserialize;

use super::COLLECTIONS;
use crate::context::AppContext;
use crate::http::response::AppError;
use crate::storage::{Document, ListOptions};

/// `?skip=&limit=` pagination.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

impl From<ListQuery> for ListOptions {
    fn from(q: ListQuery) -> Self {
        ListOptions {
            skip: q.skip.unwrap_or(0),
            limit: q.limit,
        }
    }
}

fn ensure_collection(collection: &str, method: &Method, uri: &Uri) -> Result<(), AppError> {
    if COLLECTIONS.contains(&collection) {
        Ok(())
    } else {
        Err(AppError::no_route(method, uri))
    }
}

pub async fn list_documents(
    State(ctx): State<AppContext>,
    Path(collection): Path<String>,
    method: Method,
    uri: Uri,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Document>>, AppError> {
    ensure_collection(&collection, &method, &uri)?;
    let Query(query) = query?;

    let docs = ctx.store()?.list(&collection, query.into()).await?;
    tracing::debug!(collection = %collection, count = docs.len(), "Listed documents");
    Ok(Json(docs))
}

pub async fn get_document(
    State(ctx): State<AppContext>,
    Path((collection, id)): Path<(String, String)>,
    method: Method,
    uri: Uri,
) -> Result<Json<Document>, AppError> {
    ensure_collection(&collection, &method, &uri)?;

    ctx.store()?
        .find_by_id(&collection, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{} '{}' not found", collection, id)))
}
