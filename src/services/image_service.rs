use serde::Serialize;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::clients::imgbb::{ImgbbClient, ImgbbUpload};
use crate::database::models::Image;
use crate::database::DatabaseManager;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct IngestReport {
    pub success: bool,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ImageRef {
    pub id: Uuid,
    pub file: String,
}

#[derive(Debug, Serialize)]
pub struct ImageGroup {
    pub text: bool,
    pub total: usize,
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Serialize)]
pub struct GroupedImages {
    pub sub_industry_id: Uuid,
    pub sub_industry_name: String,
    pub industry_name: String,
    pub groups: Vec<ImageGroup>,
}

#[derive(Debug, Serialize)]
pub struct DeleteReport {
    pub deleted_count: u64,
}

pub struct ImageService {
    pool: PgPool,
}

impl ImageService {
    pub async fn new() -> Result<Self, ApiError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// Upload all files to the image host, then bulk-insert the hosted URLs.
    /// A failed insert rolls the uploads back through their delete URLs so
    /// the host is not left holding orphans.
    pub async fn ingest(
        &self,
        sub_industry_id: Uuid,
        files: Vec<Vec<u8>>,
        text: bool,
    ) -> Result<IngestReport, ApiError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM sub_industries WHERE id = $1)",
        )
        .bind(sub_industry_id)
        .fetch_one(&self.pool)
        .await?;
        if !exists {
            return Err(ApiError::not_found("Sub-industry not found"));
        }

        let mut uploaded: Vec<ImgbbUpload> = Vec::with_capacity(files.len());
        for file in &files {
            uploaded.push(ImgbbClient::upload(file).await?);
        }

        let urls: Vec<String> = uploaded.iter().map(|u| u.image_url.clone()).collect();
        let insert = sqlx::query(
            "INSERT INTO images (file, sub_industry_id, text)
             SELECT unnest($1::text[]), $2, $3",
        )
        .bind(&urls)
        .bind(sub_industry_id)
        .bind(text)
        .execute(&self.pool)
        .await;

        if let Err(e) = insert {
            error!("Image insert failed, rolling back {} uploads: {}", uploaded.len(), e);
            let delete_urls: Vec<String> = uploaded.into_iter().map(|u| u.delete_url).collect();
            ImgbbClient::delete_all(&delete_urls).await;
            return Err(ApiError::internal_server_error(
                "Database failed. Images rolled back.",
            ));
        }

        info!("Ingested {} images for sub-industry {}", urls.len(), sub_industry_id);
        Ok(IngestReport {
            success: true,
            total: urls.len(),
        })
    }

    pub async fn find_all(&self, sub_industry_id: Uuid) -> Result<Vec<Image>, ApiError> {
        let images = sqlx::query_as::<_, Image>("SELECT * FROM images WHERE sub_industry_id = $1")
            .bind(sub_industry_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(images)
    }

    /// Split into consumed / unconsumed groups with the taxonomy names
    pub async fn grouped(&self, sub_industry_id: Uuid) -> Result<GroupedImages, ApiError> {
        let names = sqlx::query_as::<_, (String, String)>(
            "SELECT s.name, i.name
             FROM sub_industries s
             JOIN industries i ON i.id = s.industry_id
             WHERE s.id = $1",
        )
        .bind(sub_industry_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Sub-industry not found"))?;

        let mut groups = Vec::with_capacity(2);
        for flag in [true, false] {
            let images = sqlx::query_as::<_, (Uuid, String)>(
                "SELECT id, file FROM images WHERE sub_industry_id = $1 AND text = $2",
            )
            .bind(sub_industry_id)
            .bind(flag)
            .fetch_all(&self.pool)
            .await?;

            let images: Vec<ImageRef> = images
                .into_iter()
                .map(|(id, file)| ImageRef { id, file })
                .collect();
            groups.push(ImageGroup {
                text: flag,
                total: images.len(),
                images,
            });
        }

        Ok(GroupedImages {
            sub_industry_id,
            sub_industry_name: names.0,
            industry_name: names.1,
            groups,
        })
    }

    pub async fn delete_by_text(
        &self,
        sub_industry_id: Uuid,
        text: bool,
    ) -> Result<DeleteReport, ApiError> {
        let result = sqlx::query("DELETE FROM images WHERE sub_industry_id = $1 AND text = $2")
            .bind(sub_industry_id)
            .bind(text)
            .execute(&self.pool)
            .await?;
        Ok(DeleteReport {
            deleted_count: result.rows_affected(),
        })
    }
}
