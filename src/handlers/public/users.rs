use axum::extract::Path;
use axum::response::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::user_service::{NewUser, UserUpdate};
use crate::services::UserService;

/// GET /api/users - All users with their brand logo attached
pub async fn list() -> ApiResult<Value> {
    let service = UserService::new().await?;
    let users = service.find_all().await?;
    Ok(ApiResponse::success(json!(users)))
}

/// POST /api/users
pub async fn create(Json(payload): Json<NewUser>) -> ApiResult<Value> {
    let service = UserService::new().await?;
    let user = service.create(payload).await?;
    Ok(ApiResponse::created(json!(user)))
}

/// GET /api/users/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let service = UserService::new().await?;
    let user = service.find_one(id).await?;
    Ok(ApiResponse::success(json!(user)))
}

/// PUT /api/users/:id
pub async fn update(Path(id): Path<Uuid>, Json(payload): Json<UserUpdate>) -> ApiResult<Value> {
    let service = UserService::new().await?;
    let user = service.update(id, payload).await?;
    Ok(ApiResponse::success(json!(user)))
}

/// DELETE /api/users/:id
pub async fn delete(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let service = UserService::new().await?;
    let user = service.delete(id).await?;
    Ok(ApiResponse::success(json!({
        "message": "User deleted successfully",
        "user": user
    })))
}
