use axum::extract::Path;
use axum::response::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::content_service::ContentPost;
use crate::services::ContentService;

/// POST /api/subindustries/:id/content/bulk
pub async fn create_bulk(
    Path(sub_industry_id): Path<Uuid>,
    Json(posts): Json<Vec<ContentPost>>,
) -> ApiResult<Value> {
    if posts.is_empty() {
        return Err(ApiError::bad_request("Contents are required"));
    }
    let service = ContentService::new().await?;
    let created = service.create_bulk(sub_industry_id, posts).await?;
    Ok(ApiResponse::created(json!({
        "total": created.len(),
        "contents": created
    })))
}

/// GET /api/subindustries/:id/content - Newest first, hashtags flattened
pub async fn list(Path(sub_industry_id): Path<Uuid>) -> ApiResult<Value> {
    let service = ContentService::new().await?;
    let listing = service.list(sub_industry_id).await?;
    Ok(ApiResponse::success(json!(listing)))
}

/// DELETE /api/subindustries/:id/content
pub async fn delete_all(Path(sub_industry_id): Path<Uuid>) -> ApiResult<Value> {
    let service = ContentService::new().await?;
    let report = service.delete_all(sub_industry_id).await?;
    Ok(ApiResponse::success(json!(report)))
}
