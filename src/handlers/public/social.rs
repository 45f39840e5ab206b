use axum::extract::{Path, Query};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::SocialService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

/// GET /api/social-media/meta/list?userId=
pub async fn list(Query(query): Query<ListQuery>) -> ApiResult<Value> {
    let service = SocialService::new().await?;
    let accounts = service.list(query.user_id).await?;
    Ok(ApiResponse::success(json!(accounts)))
}

/// GET /api/social-media/meta/callback?code=&userId=
///
/// OAuth redirect target: exchanges the authorization code and persists the
/// linked account.
pub async fn callback(Query(query): Query<CallbackQuery>) -> ApiResult<Value> {
    let service = SocialService::new().await?;
    let account = service.link(query.user_id, &query.code).await?;
    Ok(ApiResponse::created(json!(account)))
}

/// POST /api/social-media/meta/refresh/:id
pub async fn refresh(Path(account_id): Path<Uuid>) -> ApiResult<Value> {
    let service = SocialService::new().await?;
    let account = service.refresh(account_id).await?;
    Ok(ApiResponse::success(json!(account)))
}
