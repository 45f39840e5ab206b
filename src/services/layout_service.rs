use rand::Rng;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clients::{ImageKitClient, HTTP};
use crate::config;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::layout;

#[derive(Debug, Serialize)]
pub struct LayoutOutcome {
    pub original_url: String,
    pub image_with_text_url: String,
}

/// The layout pipeline: pick a random unconsumed stock image, fetch it,
/// compose the overlay, upload the result, mark the source consumed.
pub struct LayoutService {
    pool: PgPool,
}

impl LayoutService {
    pub async fn new() -> Result<Self, ApiError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub async fn create(&self, title: &str, description: &str) -> Result<LayoutOutcome, ApiError> {
        if title.trim().is_empty() || description.trim().is_empty() {
            return Err(ApiError::bad_request("Title and description are required"));
        }

        let candidates = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT id, file FROM images WHERE text = false",
        )
        .fetch_all(&self.pool)
        .await?;
        if candidates.is_empty() {
            return Err(ApiError::not_found("No available images found"));
        }

        let (image_id, file) = {
            let index = rand::thread_rng().gen_range(0..candidates.len());
            candidates[index].clone()
        };
        if file.trim().is_empty() {
            return Err(ApiError::bad_request("Image file is empty"));
        }

        let source_url = resolve_source_url(&file, &config::config().integrations.imagekit_url_endpoint);
        let source_bytes = fetch_bytes(&source_url)
            .await
            .map_err(|_| ApiError::bad_request("Failed to fetch image"))?;

        let layout_config = &config::config().layout;
        let logo_bytes = fetch_bytes(&layout_config.logo_url)
            .await
            .map_err(|_| ApiError::bad_request("Failed to fetch logo"))?;

        let font = layout::load_font(&layout_config.font_path)?;
        let quality = layout_config.jpeg_quality;
        let title_owned = title.to_string();
        let description_owned = description.to_string();

        // Compositing is CPU-bound; keep it off the request executor
        let composed = tokio::task::spawn_blocking(move || {
            layout::compose(
                &source_bytes,
                &logo_bytes,
                &title_owned,
                &description_owned,
                &font,
                quality,
            )
        })
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Layout task failed: {}", e)))??;

        let uploaded_url = ImageKitClient::upload_layout(&composed).await?;

        self.mark_consumed(image_id).await;

        info!("Composed layout from image {}", image_id);
        Ok(LayoutOutcome {
            original_url: source_url,
            image_with_text_url: uploaded_url,
        })
    }

    /// Best-effort: a failed flag update must not fail the request that
    /// already produced and uploaded the layout
    async fn mark_consumed(&self, image_id: Uuid) {
        let result = sqlx::query("UPDATE images SET text = true WHERE id = $1")
            .bind(image_id)
            .execute(&self.pool)
            .await;
        if let Err(e) = result {
            warn!("Failed to mark image {} as consumed: {}", image_id, e);
        }
    }
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let bytes = HTTP
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    Ok(bytes.to_vec())
}

/// Absolute URLs pass through; bare storage paths are joined onto the
/// ImageKit endpoint
fn resolve_source_url(file: &str, endpoint: &str) -> String {
    if file.starts_with("http://") || file.starts_with("https://") {
        return file.to_string();
    }
    let base = if endpoint.is_empty() {
        "http://localhost:3000"
    } else {
        endpoint
    };
    let base = base.trim_end_matches('/');
    if file.starts_with('/') {
        format!("{}{}", base, file)
    } else {
        format!("{}/{}", base, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(
            resolve_source_url("https://img.example/a.jpg", "https://ik.example"),
            "https://img.example/a.jpg"
        );
    }

    #[test]
    fn bare_paths_join_the_endpoint() {
        assert_eq!(
            resolve_source_url("folder/a.jpg", "https://ik.example/"),
            "https://ik.example/folder/a.jpg"
        );
        assert_eq!(
            resolve_source_url("/folder/a.jpg", "https://ik.example"),
            "https://ik.example/folder/a.jpg"
        );
    }

    #[test]
    fn missing_endpoint_falls_back_to_localhost() {
        assert_eq!(
            resolve_source_url("a.jpg", ""),
            "http://localhost:3000/a.jpg"
        );
    }
}
