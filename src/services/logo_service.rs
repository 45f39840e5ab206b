use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::clients::ImgbbClient;
use crate::database::models::{Logo, LogoPosition, LogoSize};
use crate::database::DatabaseManager;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct NewLogo {
    pub size: LogoSize,
    pub position: LogoPosition,
    pub color: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogoUpdate {
    pub size: Option<LogoSize>,
    pub position: Option<LogoPosition>,
    pub color: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

/// One brand logo per user, hosted on the external image host
pub struct LogoService {
    pool: PgPool,
}

impl LogoService {
    pub async fn new() -> Result<Self, ApiError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        new_logo: NewLogo,
        file: &[u8],
    ) -> Result<Logo, ApiError> {
        let existing = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM logos WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        if existing {
            return Err(ApiError::bad_request("User already has a logo"));
        }

        let upload = ImgbbClient::upload(file).await?;

        let logo = sqlx::query_as::<_, Logo>(
            "INSERT INTO logos (user_id, file, size, position, color, phone, website)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(user_id)
        .bind(upload.image_url)
        .bind(new_logo.size)
        .bind(new_logo.position)
        .bind(new_logo.color)
        .bind(new_logo.phone)
        .bind(new_logo.website)
        .fetch_one(&self.pool)
        .await?;
        Ok(logo)
    }

    pub async fn find(&self, user_id: Uuid) -> Result<Logo, ApiError> {
        sqlx::query_as::<_, Logo>("SELECT * FROM logos WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Logo not found"))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        update: LogoUpdate,
        file: Option<&[u8]>,
    ) -> Result<Logo, ApiError> {
        self.find(user_id).await?;

        let file_url = match file {
            Some(bytes) => Some(ImgbbClient::upload(bytes).await?.image_url),
            None => None,
        };

        let logo = sqlx::query_as::<_, Logo>(
            "UPDATE logos SET
                file = COALESCE($2, file),
                size = COALESCE($3, size),
                position = COALESCE($4, position),
                color = COALESCE($5, color),
                phone = COALESCE($6, phone),
                website = COALESCE($7, website)
             WHERE user_id = $1
             RETURNING *",
        )
        .bind(user_id)
        .bind(file_url)
        .bind(update.size)
        .bind(update.position)
        .bind(update.color)
        .bind(update.phone)
        .bind(update.website)
        .fetch_one(&self.pool)
        .await?;
        Ok(logo)
    }

    pub async fn remove(&self, user_id: Uuid) -> Result<Logo, ApiError> {
        sqlx::query_as::<_, Logo>("DELETE FROM logos WHERE user_id = $1 RETURNING *")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Logo not found"))
    }
}
