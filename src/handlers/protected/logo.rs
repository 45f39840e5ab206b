use axum::extract::Multipart;
use axum::Extension;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::database::models::{LogoPosition, LogoSize};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::logo_service::{LogoUpdate, NewLogo};
use crate::services::LogoService;

#[derive(Debug, Default)]
struct LogoForm {
    file: Option<Vec<u8>>,
    size: Option<LogoSize>,
    position: Option<LogoPosition>,
    color: Option<String>,
    phone: Option<String>,
    website: Option<String>,
}

/// Multipart fields come in as plain strings; enum fields reuse the serde
/// renames (SMALL, TOP_LEFT, ...) for parsing.
fn parse_variant<T: DeserializeOwned>(field: &str, value: String) -> Result<T, ApiError> {
    serde_json::from_value(Value::String(value))
        .map_err(|_| ApiError::bad_request(format!("Invalid value for {}", field)))
}

async fn read_form(mut multipart: Multipart) -> Result<LogoForm, ApiError> {
    let mut form = LogoForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
            if !bytes.is_empty() {
                form.file = Some(bytes.to_vec());
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read field {}: {}", name, e)))?;
        match name.as_str() {
            "size" => form.size = Some(parse_variant("size", value)?),
            "position" => form.position = Some(parse_variant("position", value)?),
            "color" => form.color = Some(value),
            "phone" => form.phone = Some(value),
            "website" => form.website = Some(value),
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/logo - One logo per authenticated user
pub async fn create(
    Extension(auth_user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<Value> {
    let form = read_form(multipart).await?;
    let file = form
        .file
        .ok_or_else(|| ApiError::bad_request("Logo file is required"))?;
    let new_logo = NewLogo {
        size: form
            .size
            .ok_or_else(|| ApiError::bad_request("size is required"))?,
        position: form
            .position
            .ok_or_else(|| ApiError::bad_request("position is required"))?,
        color: form.color,
        phone: form.phone,
        website: form.website,
    };

    let service = LogoService::new().await?;
    let logo = service.create(auth_user.user_id, new_logo, &file).await?;
    Ok(ApiResponse::created(json!(logo)))
}

/// GET /api/logo
pub async fn get(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    let service = LogoService::new().await?;
    let logo = service.find(auth_user.user_id).await?;
    Ok(ApiResponse::success(json!(logo)))
}

/// PATCH /api/logo - Any subset of fields, optionally a replacement file
pub async fn update(
    Extension(auth_user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<Value> {
    let form = read_form(multipart).await?;
    let update = LogoUpdate {
        size: form.size,
        position: form.position,
        color: form.color,
        phone: form.phone,
        website: form.website,
    };

    let service = LogoService::new().await?;
    let logo = service
        .update(auth_user.user_id, update, form.file.as_deref())
        .await?;
    Ok(ApiResponse::success(json!(logo)))
}

/// DELETE /api/logo
pub async fn delete(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    let service = LogoService::new().await?;
    let logo = service.remove(auth_user.user_id).await?;
    Ok(ApiResponse::success(json!({
        "message": "Logo deleted successfully",
        "logo": logo
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_fields_parse_from_form_values() {
        let size: LogoSize = parse_variant("size", "SMALL".to_string()).unwrap();
        assert!(matches!(size, LogoSize::Small));

        let position: LogoPosition = parse_variant("position", "TOP_LEFT".to_string()).unwrap();
        assert!(matches!(position, LogoPosition::TopLeft));
    }

    #[test]
    fn unknown_variant_is_a_bad_request() {
        let result: Result<LogoSize, _> = parse_variant("size", "HUGE".to_string());
        assert!(result.is_err());
    }
}
