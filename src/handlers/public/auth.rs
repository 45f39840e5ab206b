use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::UserRole;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::auth_service::ProfileUpdate;
use crate::services::AuthService;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub email: String,
    #[serde(flatten)]
    pub update: ProfileUpdate,
}

/// POST /api/auth/register - Create an account and issue the first OTP
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<Value> {
    let service = AuthService::new().await?;
    let outcome = service
        .register(&payload.name, &payload.email, payload.role)
        .await?;
    Ok(ApiResponse::created(json!(outcome)))
}

/// POST /api/auth/verify-otp
pub async fn verify_otp(Json(payload): Json<OtpRequest>) -> ApiResult<Value> {
    let service = AuthService::new().await?;
    service.verify_otp(&payload.email, &payload.otp).await?;
    Ok(ApiResponse::success(json!({ "message": "OTP verified successfully" })))
}

/// POST /api/auth/set-password
pub async fn set_password(Json(payload): Json<PasswordRequest>) -> ApiResult<Value> {
    let service = AuthService::new().await?;
    service.set_password(&payload.email, &payload.password).await?;
    Ok(ApiResponse::success(json!({ "message": "Password set successfully" })))
}

/// POST /api/auth/login - Throttled credential check, returns a token pair
pub async fn login(Json(payload): Json<PasswordRequest>) -> ApiResult<Value> {
    let service = AuthService::new().await?;
    let outcome = service.login(&payload.email, &payload.password).await?;
    Ok(ApiResponse::success(json!(outcome)))
}

/// POST /api/auth/refresh-token - Rotate the access/refresh pair
pub async fn refresh_token(Json(payload): Json<RefreshRequest>) -> ApiResult<Value> {
    let service = AuthService::new().await?;
    let pair = service.refresh(&payload.refresh_token).await?;
    Ok(ApiResponse::success(json!(pair)))
}

/// POST /api/auth/send-otp - Password-reset entry point
pub async fn send_otp(Json(payload): Json<EmailRequest>) -> ApiResult<Value> {
    let service = AuthService::new().await?;
    let otp = service.send_otp(&payload.email).await?;
    Ok(ApiResponse::success(json!({
        "message": "OTP sent successfully",
        "otp": otp
    })))
}

/// POST /api/auth/verify-otp-reset
pub async fn verify_otp_reset(Json(payload): Json<OtpRequest>) -> ApiResult<Value> {
    let service = AuthService::new().await?;
    service.verify_otp(&payload.email, &payload.otp).await?;
    Ok(ApiResponse::success(json!({ "message": "OTP verified successfully" })))
}

/// POST /api/auth/reset-password
pub async fn reset_password(Json(payload): Json<PasswordRequest>) -> ApiResult<Value> {
    let service = AuthService::new().await?;
    service.reset_password(&payload.email, &payload.password).await?;
    Ok(ApiResponse::success(json!({ "message": "Password reset successfully" })))
}

/// POST /api/auth/update-profile - Brand fields keyed by email
pub async fn update_profile(Json(payload): Json<ProfileRequest>) -> ApiResult<Value> {
    let service = AuthService::new().await?;
    let user = service.update_profile(&payload.email, payload.update).await?;
    Ok(ApiResponse::success(json!(user)))
}
