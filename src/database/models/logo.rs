use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "logo_size", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum LogoSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "logo_position")]
pub enum LogoPosition {
    #[sqlx(rename = "TOP_LEFT")]
    #[serde(rename = "TOP_LEFT")]
    TopLeft,
    #[sqlx(rename = "TOP_RIGHT")]
    #[serde(rename = "TOP_RIGHT")]
    TopRight,
    #[sqlx(rename = "BOTTOM_LEFT")]
    #[serde(rename = "BOTTOM_LEFT")]
    BottomLeft,
    #[sqlx(rename = "BOTTOM_RIGHT")]
    #[serde(rename = "BOTTOM_RIGHT")]
    BottomRight,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Logo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file: String,
    pub size: LogoSize,
    pub position: LogoPosition,
    pub color: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_uses_screaming_snake_case() {
        assert_eq!(
            serde_json::to_value(LogoPosition::BottomRight).unwrap(),
            serde_json::json!("BOTTOM_RIGHT")
        );
        assert_eq!(
            serde_json::from_value::<LogoPosition>(serde_json::json!("TOP_LEFT")).unwrap(),
            LogoPosition::TopLeft
        );
    }
}
