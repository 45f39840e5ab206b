use axum::extract::Path;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::SubIndustryService;

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub industry_id: Uuid,
    pub names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

/// POST /api/subindustries/bulk - Duplicate-skipping bulk insert
pub async fn create_bulk(Json(payload): Json<BulkRequest>) -> ApiResult<Value> {
    if payload.names.is_empty() {
        return Err(crate::error::ApiError::bad_request("Names are required"));
    }
    let service = SubIndustryService::new().await?;
    let report = service.create_bulk(payload.industry_id, &payload.names).await?;
    Ok(ApiResponse::created(json!(report)))
}

/// GET /api/subindustries - With parent industry and images
pub async fn list() -> ApiResult<Value> {
    let service = SubIndustryService::new().await?;
    let subs = service.find_all().await?;
    Ok(ApiResponse::success(json!(subs)))
}

/// GET /api/subindustries/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let service = SubIndustryService::new().await?;
    let sub = service.find_one(id).await?;
    Ok(ApiResponse::success(json!(sub)))
}

/// PUT /api/subindustries/:id
pub async fn update(Path(id): Path<Uuid>, Json(payload): Json<RenameRequest>) -> ApiResult<Value> {
    let service = SubIndustryService::new().await?;
    let sub = service.update(id, &payload.name).await?;
    Ok(ApiResponse::success(json!(sub)))
}

/// DELETE /api/subindustries/:id
pub async fn delete(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let service = SubIndustryService::new().await?;
    let sub = service.delete(id).await?;
    Ok(ApiResponse::success(json!({
        "message": "Sub-industry deleted successfully",
        "sub_industry": sub
    })))
}
