use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use tracing::warn;

use super::{ClientError, HTTP};
use crate::config;

const UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";

/// Result of a single imgbb upload: the hosted URL plus the URL that removes
/// the image again (used for compensation when a DB insert fails)
#[derive(Debug, Clone)]
pub struct ImgbbUpload {
    pub image_url: String,
    pub delete_url: String,
}

#[derive(Debug, Deserialize)]
struct ImgbbResponse {
    data: Option<ImgbbData>,
}

#[derive(Debug, Deserialize)]
struct ImgbbData {
    url: Option<String>,
    delete_url: Option<String>,
}

pub struct ImgbbClient;

impl ImgbbClient {
    /// Upload raw image bytes, base64-encoded as the imgbb API expects
    pub async fn upload(bytes: &[u8]) -> Result<ImgbbUpload, ClientError> {
        let key = &config::config().integrations.imgbb_key;
        if key.is_empty() {
            return Err(ClientError::NotConfigured("imgbb"));
        }

        let form = [("image", BASE64.encode(bytes))];
        let response = HTTP
            .post(format!("{}?key={}", UPLOAD_URL, key))
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json::<ImgbbResponse>()
            .await?;

        let data = response
            .data
            .ok_or_else(|| ClientError::UnexpectedResponse("imgbb response missing data".into()))?;

        match (data.url, data.delete_url) {
            (Some(image_url), Some(delete_url)) => Ok(ImgbbUpload {
                image_url,
                delete_url,
            }),
            _ => Err(ClientError::UnexpectedResponse(
                "imgbb response missing url fields".into(),
            )),
        }
    }

    /// Best-effort removal of previously uploaded images. Failures are
    /// logged; the caller has already decided to fail the request.
    pub async fn delete_all(delete_urls: &[String]) {
        for url in delete_urls {
            if let Err(e) = HTTP.get(url).send().await {
                warn!("imgbb rollback failed for {}: {}", url, e);
            }
        }
    }
}
