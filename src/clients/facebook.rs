use serde::Deserialize;
use tracing::error;

use super::{ClientError, HTTP};
use crate::config;

const GRAPH_BASE: &str = "https://graph.facebook.com";
const GRAPH_VERSION: &str = "v18.0";

#[derive(Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct GraphIdentity {
    pub id: String,
    pub name: Option<String>,
}

pub struct FacebookClient;

impl FacebookClient {
    /// Exchange an OAuth authorization code for a user access token
    pub async fn exchange_code(code: &str) -> Result<AccessToken, ClientError> {
        let integrations = &config::config().integrations;
        if integrations.meta_client_id.is_empty()
            || integrations.meta_client_secret.is_empty()
            || integrations.meta_redirect_uri.is_empty()
        {
            return Err(ClientError::NotConfigured("Meta OAuth"));
        }

        let response = HTTP
            .get(format!("{}/{}/oauth/access_token", GRAPH_BASE, GRAPH_VERSION))
            .query(&[
                ("client_id", integrations.meta_client_id.as_str()),
                ("client_secret", integrations.meta_client_secret.as_str()),
                ("redirect_uri", integrations.meta_redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await?;

        Self::parse_token(response).await
    }

    /// Fetch the id/name of the user the token belongs to
    pub async fn identity(access_token: &str) -> Result<GraphIdentity, ClientError> {
        let response = HTTP
            .get(format!("{}/me", GRAPH_BASE))
            .query(&[("access_token", access_token), ("fields", "id,name")])
            .send()
            .await?
            .error_for_status()?
            .json::<GraphIdentity>()
            .await?;
        Ok(response)
    }

    /// Long-lived token refresh via the fb_exchange_token grant
    pub async fn refresh_token(current_token: &str) -> Result<AccessToken, ClientError> {
        let integrations = &config::config().integrations;
        if integrations.meta_client_id.is_empty() || integrations.meta_client_secret.is_empty() {
            return Err(ClientError::NotConfigured("Meta OAuth"));
        }

        let response = HTTP
            .get(format!("{}/{}/oauth/access_token", GRAPH_BASE, GRAPH_VERSION))
            .query(&[
                ("grant_type", "fb_exchange_token"),
                ("client_id", integrations.meta_client_id.as_str()),
                ("client_secret", integrations.meta_client_secret.as_str()),
                ("fb_exchange_token", current_token),
            ])
            .send()
            .await?;

        Self::parse_token(response).await
    }

    async fn parse_token(response: reqwest::Response) -> Result<AccessToken, ClientError> {
        if !response.status().is_success() {
            // The Graph API explains failures in the body; log it, never echo it
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Graph API token request failed ({}): {}", status, body);
            return Err(ClientError::UnexpectedResponse(format!(
                "Graph API returned {}",
                status
            )));
        }
        let token = response.json::<AccessToken>().await?;
        if token.access_token.is_empty() {
            return Err(ClientError::UnexpectedResponse("No access token returned".into()));
        }
        Ok(token)
    }
}
