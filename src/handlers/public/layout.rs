use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::LayoutService;

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub title: String,
    pub description: String,
}

/// POST /api/imagelayout/create - Compose text and logo onto a stock image
pub async fn create(Json(payload): Json<LayoutRequest>) -> ApiResult<Value> {
    let service = LayoutService::new().await?;
    let outcome = service.create(&payload.title, &payload.description).await?;
    Ok(ApiResponse::created(json!(outcome)))
}
