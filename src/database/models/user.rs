use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::social::SocialPlatform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Superadmin,
    Contentadmin,
    Technicianadmin,
    Financeadmin,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    #[serde(skip_serializing)]
    pub otp_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub brand_name: Option<String>,
    pub brand_logo: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub connected_socials: Vec<SocialPlatform>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(
            serde_json::to_value(UserRole::Contentadmin).unwrap(),
            serde_json::json!("CONTENTADMIN")
        );
    }

    #[test]
    fn credentials_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: Some("$2b$10$hash".to_string()),
            role: UserRole::User,
            otp: Some("123456".to_string()),
            otp_expires_at: None,
            refresh_token: Some("token".to_string()),
            brand_name: None,
            brand_logo: None,
            website: None,
            phone: None,
            connected_socials: vec![SocialPlatform::Facebook],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("otp").is_none());
        assert!(value.get("refresh_token").is_none());
        assert_eq!(value["connected_socials"], serde_json::json!(["FACEBOOK"]));
    }
}
