use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgHasArrayType, PgTypeInfo};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "social_platform", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SocialPlatform {
    Facebook,
    Instagram,
    Linkedin,
    X,
}

// Needed for the social_platform[] column on users
impl PgHasArrayType for SocialPlatform {
    fn array_type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("_social_platform")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LinkedAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub platform: SocialPlatform,
    pub platform_user_id: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub scopes: String,
    pub token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_serializes_uppercase() {
        assert_eq!(
            serde_json::to_value(SocialPlatform::Linkedin).unwrap(),
            serde_json::json!("LINKEDIN")
        );
        assert_eq!(
            serde_json::from_value::<SocialPlatform>(serde_json::json!("X")).unwrap(),
            SocialPlatform::X
        );
    }
}
