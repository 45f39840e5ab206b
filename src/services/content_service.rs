use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::Content;
use crate::database::DatabaseManager;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ContentPost {
    pub text: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ContentListing {
    pub sub_industry: SubIndustryRef,
    pub total: usize,
    pub contents: Vec<ContentEntry>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SubIndustryRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ContentEntry {
    pub text: String,
    pub hashtags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteReport {
    pub deleted_count: usize,
}

pub struct ContentService {
    pool: PgPool,
}

impl ContentService {
    pub async fn new() -> Result<Self, ApiError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// Insert posts and their hashtags in one transaction. Hashtags are
    /// global and deduplicated; links go through the join table.
    pub async fn create_bulk(
        &self,
        sub_industry_id: Uuid,
        posts: Vec<ContentPost>,
    ) -> Result<Vec<Content>, ApiError> {
        self.require_sub_industry(sub_industry_id).await?;

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(posts.len());

        for post in posts {
            let content = sqlx::query_as::<_, Content>(
                "INSERT INTO contents (text, sub_industry_id) VALUES ($1, $2) RETURNING *",
            )
            .bind(&post.text)
            .bind(sub_industry_id)
            .fetch_one(&mut *tx)
            .await?;

            if !post.hashtags.is_empty() {
                sqlx::query(
                    "INSERT INTO hashtags (tag)
                     SELECT unnest($1::text[])
                     ON CONFLICT (tag) DO NOTHING",
                )
                .bind(&post.hashtags)
                .execute(&mut *tx)
                .await?;

                sqlx::query(
                    "INSERT INTO content_hashtags (content_id, hashtag_id)
                     SELECT $1, id FROM hashtags WHERE tag = ANY($2)
                     ON CONFLICT DO NOTHING",
                )
                .bind(content.id)
                .bind(&post.hashtags)
                .execute(&mut *tx)
                .await?;
            }

            created.push(content);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Newest-first listing with hashtags flattened to plain strings
    pub async fn list(&self, sub_industry_id: Uuid) -> Result<ContentListing, ApiError> {
        let sub_industry = self.require_sub_industry(sub_industry_id).await?;

        let contents = sqlx::query_as::<_, Content>(
            "SELECT * FROM contents WHERE sub_industry_id = $1 ORDER BY created_at DESC",
        )
        .bind(sub_industry_id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = contents.iter().map(|c| c.id).collect();
        let tag_rows = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT ch.content_id, h.tag
             FROM content_hashtags ch
             JOIN hashtags h ON h.id = ch.hashtag_id
             WHERE ch.content_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut tags_by_content: HashMap<Uuid, Vec<String>> = HashMap::new();
        for (content_id, tag) in tag_rows {
            tags_by_content.entry(content_id).or_default().push(tag);
        }

        let entries: Vec<ContentEntry> = contents
            .into_iter()
            .map(|c| ContentEntry {
                hashtags: tags_by_content.remove(&c.id).unwrap_or_default(),
                text: c.text,
            })
            .collect();

        Ok(ContentListing {
            sub_industry,
            total: entries.len(),
            contents: entries,
        })
    }

    /// Transactional delete: join rows first, then the contents themselves
    pub async fn delete_all(&self, sub_industry_id: Uuid) -> Result<DeleteReport, ApiError> {
        let mut tx = self.pool.begin().await?;

        let ids: Vec<Uuid> = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM contents WHERE sub_industry_id = $1",
        )
        .bind(sub_industry_id)
        .fetch_all(&mut *tx)
        .await?;

        if !ids.is_empty() {
            sqlx::query("DELETE FROM content_hashtags WHERE content_id = ANY($1)")
                .bind(&ids)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM contents WHERE id = ANY($1)")
                .bind(&ids)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(DeleteReport {
            deleted_count: ids.len(),
        })
    }

    async fn require_sub_industry(&self, id: Uuid) -> Result<SubIndustryRef, ApiError> {
        sqlx::query_as::<_, SubIndustryRef>("SELECT id, name FROM sub_industries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Sub-industry not found"))
    }
}
