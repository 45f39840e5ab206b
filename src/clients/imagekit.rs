use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use serde::Deserialize;

use super::{ClientError, HTTP};
use crate::config;

const UPLOAD_URL: &str = "https://upload.imagekit.io/api/v1/files/upload";

#[derive(Debug, Deserialize)]
struct ImageKitResponse {
    url: Option<String>,
}

pub struct ImageKitClient;

impl ImageKitClient {
    /// Upload a composed layout to the /layouts folder and return its URL.
    /// ImageKit authenticates with the private key as basic-auth username.
    pub async fn upload_layout(bytes: &[u8]) -> Result<String, ClientError> {
        let integrations = &config::config().integrations;
        if integrations.imagekit_private_key.is_empty() {
            return Err(ClientError::NotConfigured("ImageKit"));
        }

        let file_name = format!("layout-{}.jpg", Utc::now().timestamp_millis());
        let form = reqwest::multipart::Form::new()
            .text("file", BASE64.encode(bytes))
            .text("fileName", file_name)
            .text("folder", "/layouts")
            .text("useUniqueFileName", "true");

        let response = HTTP
            .post(UPLOAD_URL)
            .basic_auth(&integrations.imagekit_private_key, Some(""))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json::<ImageKitResponse>()
            .await?;

        response
            .url
            .ok_or_else(|| ClientError::UnexpectedResponse("ImageKit response missing url".into()))
    }
}
