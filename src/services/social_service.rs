use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::clients::FacebookClient;
use crate::config;
use crate::database::models::{LinkedAccount, SocialPlatform};
use crate::database::DatabaseManager;
use crate::error::ApiError;

/// Meta/Facebook account linking: OAuth code exchange, identity lookup and
/// long-lived token refresh.
pub struct SocialService {
    pool: PgPool,
}

impl SocialService {
    pub async fn new() -> Result<Self, ApiError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<LinkedAccount>, ApiError> {
        let accounts = sqlx::query_as::<_, LinkedAccount>(
            "SELECT * FROM linked_accounts WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts)
    }

    /// OAuth callback: exchange the authorization code, resolve the platform
    /// identity, persist the link with a one-hour expiry.
    pub async fn link(&self, user_id: Uuid, code: &str) -> Result<LinkedAccount, ApiError> {
        let token = FacebookClient::exchange_code(code).await?;
        let identity = FacebookClient::identity(&token.access_token).await?;

        let account = sqlx::query_as::<_, LinkedAccount>(
            "INSERT INTO linked_accounts
                (user_id, platform, platform_user_id, access_token, scopes, token_expiry)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(user_id)
        .bind(SocialPlatform::Facebook)
        .bind(&identity.id)
        .bind(&token.access_token)
        .bind(&config::config().integrations.meta_scopes)
        .bind(Utc::now() + Duration::hours(1))
        .fetch_one(&self.pool)
        .await?;
        Ok(account)
    }

    pub async fn refresh(&self, account_id: Uuid) -> Result<LinkedAccount, ApiError> {
        let account = sqlx::query_as::<_, LinkedAccount>(
            "SELECT * FROM linked_accounts WHERE id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;

        let token = FacebookClient::refresh_token(&account.access_token).await?;

        let updated = sqlx::query_as::<_, LinkedAccount>(
            "UPDATE linked_accounts
             SET access_token = $2, token_expiry = $3, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(account_id)
        .bind(&token.access_token)
        .bind(Utc::now() + Duration::hours(1))
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }
}
