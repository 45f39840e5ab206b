use axum::extract::{Multipart, Path, Query};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ImageService;

#[derive(Debug, Deserialize)]
pub struct TextFilter {
    #[serde(default)]
    pub text: bool,
}

/// POST /api/subindustries/:id/images/multiple?text=bool
///
/// Multipart batch upload. Every file part is forwarded to the image host;
/// the hosted URLs are bulk-inserted afterwards.
pub async fn ingest(
    Path(sub_industry_id): Path<Uuid>,
    Query(filter): Query<TextFilter>,
    mut multipart: Multipart,
) -> ApiResult<Value> {
    let max_files = config::config().api.max_upload_files;

    let mut files: Vec<Vec<u8>> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        if field.file_name().is_none() {
            continue;
        }
        if files.len() >= max_files {
            return Err(ApiError::bad_request(format!(
                "At most {} files per upload",
                max_files
            )));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
        if !bytes.is_empty() {
            files.push(bytes.to_vec());
        }
    }

    if files.is_empty() {
        return Err(ApiError::bad_request("No files uploaded"));
    }

    let service = ImageService::new().await?;
    let report = service.ingest(sub_industry_id, files, filter.text).await?;
    Ok(ApiResponse::created(json!(report)))
}

/// GET /api/subindustries/:id/images
pub async fn list(Path(sub_industry_id): Path<Uuid>) -> ApiResult<Value> {
    let service = ImageService::new().await?;
    let images = service.find_all(sub_industry_id).await?;
    Ok(ApiResponse::success(json!(images)))
}

/// GET /api/subindustries/:id/images/grouped - Split by the consumed flag
pub async fn grouped(Path(sub_industry_id): Path<Uuid>) -> ApiResult<Value> {
    let service = ImageService::new().await?;
    let groups = service.grouped(sub_industry_id).await?;
    Ok(ApiResponse::success(json!(groups)))
}

/// DELETE /api/subindustries/:id/images?text=bool
pub async fn delete(
    Path(sub_industry_id): Path<Uuid>,
    Query(filter): Query<TextFilter>,
) -> ApiResult<Value> {
    let service = ImageService::new().await?;
    let report = service.delete_by_text(sub_industry_id, filter.text).await?;
    Ok(ApiResponse::success(json!(report)))
}
