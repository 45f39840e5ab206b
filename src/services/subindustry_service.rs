use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Image, Industry, SubIndustry};
use crate::database::DatabaseManager;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct SubIndustryDetail {
    #[serde(flatten)]
    pub sub_industry: SubIndustry,
    pub industry: Industry,
    pub images: Vec<Image>,
}

#[derive(Debug, Serialize)]
pub struct BulkCreateReport {
    pub requested: usize,
    pub inserted: u64,
}

pub struct SubIndustryService {
    pool: PgPool,
}

impl SubIndustryService {
    pub async fn new() -> Result<Self, ApiError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// Duplicate-skipping bulk insert under one industry
    pub async fn create_bulk(
        &self,
        industry_id: Uuid,
        names: &[String],
    ) -> Result<BulkCreateReport, ApiError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM industries WHERE id = $1)",
        )
        .bind(industry_id)
        .fetch_one(&self.pool)
        .await?;
        if !exists {
            return Err(ApiError::not_found("Industry not found"));
        }

        let result = sqlx::query(
            "INSERT INTO sub_industries (name, industry_id)
             SELECT unnest($1::text[]), $2
             ON CONFLICT (industry_id, name) DO NOTHING",
        )
        .bind(names)
        .bind(industry_id)
        .execute(&self.pool)
        .await?;

        Ok(BulkCreateReport {
            requested: names.len(),
            inserted: result.rows_affected(),
        })
    }

    pub async fn find_all(&self) -> Result<Vec<SubIndustryDetail>, ApiError> {
        let subs = sqlx::query_as::<_, SubIndustry>("SELECT * FROM sub_industries ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        let mut details = Vec::with_capacity(subs.len());
        for sub in subs {
            details.push(self.attach_relations(sub).await?);
        }
        Ok(details)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<SubIndustryDetail, ApiError> {
        let sub = sqlx::query_as::<_, SubIndustry>("SELECT * FROM sub_industries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Sub-industry not found"))?;
        self.attach_relations(sub).await
    }

    async fn attach_relations(&self, sub: SubIndustry) -> Result<SubIndustryDetail, ApiError> {
        let industry = sqlx::query_as::<_, Industry>("SELECT * FROM industries WHERE id = $1")
            .bind(sub.industry_id)
            .fetch_one(&self.pool)
            .await?;
        let images = sqlx::query_as::<_, Image>("SELECT * FROM images WHERE sub_industry_id = $1")
            .bind(sub.id)
            .fetch_all(&self.pool)
            .await?;
        Ok(SubIndustryDetail {
            sub_industry: sub,
            industry,
            images,
        })
    }

    pub async fn update(&self, id: Uuid, name: &str) -> Result<SubIndustry, ApiError> {
        let sub = sqlx::query_as::<_, SubIndustry>(
            "UPDATE sub_industries SET name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Sub-industry not found"))?;
        Ok(sub)
    }

    pub async fn delete(&self, id: Uuid) -> Result<SubIndustry, ApiError> {
        let sub = sqlx::query_as::<_, SubIndustry>(
            "DELETE FROM sub_industries WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Sub-industry not found"))?;
        Ok(sub)
    }
}
