use serde_json::json;
use tracing::{info, warn};

use super::{ClientError, HTTP};
use crate::config;

/// Transactional-mail client. Posts to a JSON mail API when configured;
/// otherwise logs and skips so development works without a provider.
pub struct Mailer;

impl Mailer {
    /// Send the OTP mail. Returns whether a mail was actually dispatched.
    pub async fn send_otp(to: &str, otp: &str) -> Result<bool, ClientError> {
        let integrations = &config::config().integrations;
        if integrations.mail_api_url.is_empty() || integrations.mail_api_key.is_empty() {
            warn!("Mail provider not configured, skipping OTP mail to {}", to);
            return Ok(false);
        }

        let body = json!({
            "from": integrations.mail_from,
            "to": [to],
            "subject": "Your verification code",
            "text": format!("Your verification code is {}. It expires in {} minutes.",
                otp, config::config().security.otp_ttl_minutes),
        });

        HTTP.post(&integrations.mail_api_url)
            .bearer_auth(&integrations.mail_api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        info!("Dispatched OTP mail to {}", to);
        Ok(true)
    }
}
