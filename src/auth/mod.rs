use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::database::models::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, role: UserRole, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email,
            role,
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret is not configured")]
    MissingSecret,

    #[error("Token generation failed: {0}")]
    Generation(jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// Access + refresh token pair issued on login and rotation
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub fn issue_token_pair(user_id: Uuid, email: &str, role: UserRole) -> Result<TokenPair, JwtError> {
    let security = &config::config().security;
    let access_token = sign_claims(
        &Claims::new(user_id, email.to_string(), role, security.access_token_ttl_secs),
        &security.jwt_secret,
    )?;
    let refresh_token = sign_claims(
        &Claims::new(user_id, email.to_string(), role, security.refresh_token_ttl_secs),
        &security.jwt_secret,
    )?;
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

pub fn verify_token(token: &str) -> Result<Claims, JwtError> {
    verify_with_secret(token, &config::config().security.jwt_secret)
}

pub fn sign_claims(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(JwtError::Generation)
}

pub fn verify_with_secret(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(JwtError::Invalid)?;
    Ok(data.claims)
}

/// Generate a numeric one-time password
pub fn generate_otp(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length).map(|_| char::from(b'0' + rng.gen_range(0..10))).collect()
}

/// Expiry instant for an OTP issued now
pub fn otp_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::minutes(config::config().security.otp_ttl_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn sign_and_verify_roundtrip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "ada@example.com".to_string(), UserRole::User, 900);
        let token = sign_claims(&claims, SECRET).unwrap();

        let decoded = verify_with_secret(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, user_id);
        assert_eq!(decoded.email, "ada@example.com");
        assert_eq!(decoded.role, UserRole::User);
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.c".to_string(), UserRole::User, 900);
        let token = sign_claims(&claims, SECRET).unwrap();
        assert!(verify_with_secret(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.c".to_string(), UserRole::User, -120);
        let token = sign_claims(&claims, SECRET).unwrap();
        assert!(matches!(
            verify_with_secret(&token, SECRET),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn empty_secret_is_refused() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.c".to_string(), UserRole::User, 900);
        assert!(matches!(sign_claims(&claims, ""), Err(JwtError::MissingSecret)));
    }

    #[test]
    fn otp_is_numeric_with_requested_length() {
        for _ in 0..20 {
            let otp = generate_otp(6);
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
