use axum::extract::Path;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::IndustryService;

#[derive(Debug, Deserialize)]
pub struct IndustryRequest {
    pub name: String,
}

/// POST /api/industries
pub async fn create(Json(payload): Json<IndustryRequest>) -> ApiResult<Value> {
    let service = IndustryService::new().await?;
    let industry = service.create(&payload.name).await?;
    Ok(ApiResponse::created(json!(industry)))
}

/// GET /api/industries - Full taxonomy tree through the cache-aside layer
pub async fn list() -> ApiResult<Value> {
    let service = IndustryService::new().await?;
    let tree = service.list_tree().await?;
    Ok(ApiResponse::success(json!(tree)))
}

/// GET /api/industries/clear-cache - Manual invalidation
pub async fn clear_cache() -> ApiResult<Value> {
    let service = IndustryService::new().await?;
    service.clear_cache().await?;
    Ok(ApiResponse::success(json!({ "message": "Cache cleared successfully" })))
}

/// GET /api/industries/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let service = IndustryService::new().await?;
    let industry = service.get(id).await?;
    Ok(ApiResponse::success(json!(industry)))
}

/// PUT /api/industries/:id
pub async fn update(Path(id): Path<Uuid>, Json(payload): Json<IndustryRequest>) -> ApiResult<Value> {
    let service = IndustryService::new().await?;
    let industry = service.update(id, &payload.name).await?;
    Ok(ApiResponse::success(json!(industry)))
}

/// DELETE /api/industries/:id
pub async fn delete(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let service = IndustryService::new().await?;
    let industry = service.delete(id).await?;
    Ok(ApiResponse::success(json!({
        "message": "Industry deleted successfully",
        "industry": industry
    })))
}
