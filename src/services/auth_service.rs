use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::auth::{self, TokenPair};
use crate::cache::Cache;
use crate::clients::Mailer;
use crate::config;
use crate::database::models::{SocialPlatform, User, UserRole};
use crate::database::DatabaseManager;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub brand_name: Option<String>,
    pub brand_logo: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub connected_socials: Option<Vec<SocialPlatform>>,
}

#[derive(Debug, Serialize)]
pub struct RegisterOutcome {
    pub email: String,
    /// Echoed so development works without a mail provider
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub async fn new() -> Result<Self, ApiError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn require_by_email(&self, email: &str) -> Result<User, ApiError> {
        self.find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        role: Option<UserRole>,
    ) -> Result<RegisterOutcome, ApiError> {
        validate_email(email).map_err(ApiError::bad_request)?;
        if self.find_by_email(email).await?.is_some() {
            return Err(ApiError::bad_request("Email already exists"));
        }

        let otp = auth::generate_otp(6);
        let otp_expires_at = auth::otp_expiry();

        sqlx::query(
            "INSERT INTO users (name, email, otp, otp_expires_at, role)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(name)
        .bind(email)
        .bind(&otp)
        .bind(otp_expires_at)
        .bind(role.unwrap_or(UserRole::User))
        .execute(&self.pool)
        .await?;

        if let Err(e) = Mailer::send_otp(email, &otp).await {
            warn!("OTP mail to {} failed: {}", email, e);
        }

        Ok(RegisterOutcome {
            email: email.to_string(),
            otp,
        })
    }

    /// Check and consume an OTP. Used by both registration and password
    /// reset verification.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), ApiError> {
        let user = self.require_by_email(email).await?;

        if user.otp.as_deref() != Some(otp) {
            return Err(ApiError::bad_request("Invalid OTP"));
        }
        match user.otp_expires_at {
            Some(expiry) if expiry >= Utc::now() => {}
            _ => return Err(ApiError::bad_request("OTP expired")),
        }

        sqlx::query("UPDATE users SET otp = NULL, otp_expires_at = NULL, updated_at = now() WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn set_password(&self, email: &str, password: &str) -> Result<(), ApiError> {
        validate_password(password).map_err(ApiError::bad_request)?;
        self.require_by_email(email).await?;

        let hashed = bcrypt::hash(password, config::config().security.bcrypt_cost)?;
        sqlx::query("UPDATE users SET password = $2, updated_at = now() WHERE email = $1")
            .bind(email)
            .bind(hashed)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let cache_config = &config::config().cache;
        let now_ms = Utc::now().timestamp_millis();

        let mut cache = Cache::handle().await?;
        let attempts = prune_attempts(
            &cache.login_attempts(email).await?,
            now_ms,
            cache_config.login_window_ms,
        );

        if attempts.len() >= cache_config.login_max_attempts {
            let wait = retry_after_secs(&attempts, now_ms, cache_config.login_window_ms);
            return Err(ApiError::too_many_requests(format!(
                "Too many login attempts. Try again in {} seconds.",
                wait
            )));
        }

        let user = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::bad_request("User not found"))?;
        let Some(stored_hash) = user.password.as_deref() else {
            return Err(ApiError::bad_request("Password not set"));
        };

        if !bcrypt::verify(password, stored_hash)? {
            let mut failed = attempts;
            failed.push(now_ms);
            cache
                .store_login_attempts(email, &failed, cache_config.login_window_ms)
                .await?;
            return Err(ApiError::bad_request("Invalid credentials"));
        }

        cache.clear_login_attempts(email).await?;

        let TokenPair {
            access_token,
            refresh_token,
        } = auth::issue_token_pair(user.id, &user.email, user.role)
            .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

        sqlx::query("UPDATE users SET refresh_token = $2, updated_at = now() WHERE id = $1")
            .bind(user.id)
            .bind(&refresh_token)
            .execute(&self.pool)
            .await?;

        Ok(LoginOutcome {
            access_token,
            refresh_token,
            user,
        })
    }

    /// Rotate the token pair. The presented refresh token must match the
    /// single stored slot for the user.
    pub async fn refresh(&self, token: &str) -> Result<TokenPair, ApiError> {
        let claims =
            auth::verify_token(token).map_err(|_| ApiError::unauthorized("Invalid refresh token"))?;

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(claims.sub)
            .fetch_optional(&self.pool)
            .await?
            .filter(|u| u.refresh_token.as_deref() == Some(token))
            .ok_or_else(|| ApiError::unauthorized("Invalid refresh token"))?;

        let pair = auth::issue_token_pair(user.id, &user.email, user.role)
            .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

        sqlx::query("UPDATE users SET refresh_token = $2, updated_at = now() WHERE id = $1")
            .bind(user.id)
            .bind(&pair.refresh_token)
            .execute(&self.pool)
            .await?;

        Ok(pair)
    }

    /// Issue a fresh OTP for an existing account (password reset entry point)
    pub async fn send_otp(&self, email: &str) -> Result<String, ApiError> {
        self.require_by_email(email).await?;

        let otp = auth::generate_otp(6);
        sqlx::query("UPDATE users SET otp = $2, otp_expires_at = $3, updated_at = now() WHERE email = $1")
            .bind(email)
            .bind(&otp)
            .bind(auth::otp_expiry())
            .execute(&self.pool)
            .await?;

        if let Err(e) = Mailer::send_otp(email, &otp).await {
            warn!("OTP mail to {} failed: {}", email, e);
        }
        Ok(otp)
    }

    pub async fn reset_password(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.set_password(email, password).await
    }

    /// Update brand/profile fields. The email is the lookup key and is never
    /// itself updated.
    pub async fn update_profile(&self, email: &str, update: ProfileUpdate) -> Result<User, ApiError> {
        self.require_by_email(email).await?;

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET
                brand_name = COALESCE($2, brand_name),
                brand_logo = COALESCE($3, brand_logo),
                website = COALESCE($4, website),
                phone = COALESCE($5, phone),
                connected_socials = COALESCE($6, connected_socials),
                updated_at = now()
             WHERE email = $1
             RETURNING *",
        )
        .bind(email)
        .bind(update.brand_name)
        .bind(update.brand_logo)
        .bind(update.website)
        .bind(update.phone)
        .bind(update.connected_socials)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Drop failure timestamps that fell outside the sliding window
pub fn prune_attempts(attempts: &[i64], now_ms: i64, window_ms: i64) -> Vec<i64> {
    attempts
        .iter()
        .copied()
        .filter(|t| now_ms - t < window_ms)
        .collect()
}

/// Seconds until the earliest in-window attempt expires
pub fn retry_after_secs(attempts: &[i64], now_ms: i64, window_ms: i64) -> i64 {
    let Some(earliest) = attempts.iter().copied().min() else {
        return 0;
    };
    let remaining_ms = window_ms - (now_ms - earliest);
    (remaining_ms + 999) / 1000
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || !parts[1].contains('.') {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }
    Ok(())
}

/// OTP expiry comparison belongs to the service, but the arithmetic is kept
/// here so it can be exercised without a database.
pub fn otp_still_valid(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    matches!(expires_at, Some(expiry) if expiry >= now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn prune_drops_stale_attempts() {
        let now = 100_000;
        let attempts = vec![now - 70_000, now - 59_000, now - 1_000];
        let pruned = prune_attempts(&attempts, now, 60_000);
        assert_eq!(pruned, vec![now - 59_000, now - 1_000]);
    }

    #[test]
    fn retry_after_counts_from_earliest_attempt() {
        let now = 100_000;
        // Earliest in-window attempt was 50s ago, so 10s remain
        let attempts = vec![now - 50_000, now - 10_000, now - 2_000];
        assert_eq!(retry_after_secs(&attempts, now, 60_000), 10);
    }

    #[test]
    fn retry_after_rounds_up_partial_seconds() {
        let now = 100_000;
        let attempts = vec![now - 59_500];
        assert_eq!(retry_after_secs(&attempts, now, 60_000), 1);
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("ada@example").is_err());
        assert!(validate_email("nodomain").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn otp_validity_window() {
        let now = Utc::now();
        assert!(otp_still_valid(Some(now + Duration::minutes(5)), now));
        assert!(!otp_still_valid(Some(now - Duration::seconds(1)), now));
        assert!(!otp_still_valid(None, now));
    }
}
