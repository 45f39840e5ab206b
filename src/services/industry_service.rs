use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::{Cache, INDUSTRIES_CACHE_KEY};
use crate::config;
use crate::database::models::{
    Image, ImageSummary, Industry, IndustryTree, SubIndustry, SubIndustryTree,
};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::services::user_service::map_unique_violation;

pub struct IndustryService {
    pool: PgPool,
}

impl IndustryService {
    pub async fn new() -> Result<Self, ApiError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub async fn create(&self, name: &str) -> Result<Industry, ApiError> {
        let industry =
            sqlx::query_as::<_, Industry>("INSERT INTO industries (name) VALUES ($1) RETURNING *")
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_unique_violation(e, "Industry already exists"))?;
        Ok(industry)
    }

    /// Full taxonomy tree through the cache-aside layer: gzip-compressed in
    /// Redis, read-through on miss. A cache outage degrades to the database
    /// rather than failing the listing.
    pub async fn list_tree(&self) -> Result<Vec<IndustryTree>, ApiError> {
        let ttl = config::config().cache.ttl_secs;

        let mut cache = match Cache::handle().await {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("Cache unavailable, serving industries from database: {}", e);
                None
            }
        };

        if let Some(cache) = cache.as_mut() {
            match cache.get_json::<Vec<IndustryTree>>(INDUSTRIES_CACHE_KEY).await {
                Ok(Some(tree)) => {
                    debug!("Industries tree served from cache");
                    return Ok(tree);
                }
                Ok(None) => {}
                Err(e) => warn!("Cache read failed: {}", e),
            }
        }

        let tree = self.build_tree().await?;

        if let Some(cache) = cache.as_mut() {
            if let Err(e) = cache.put_json(INDUSTRIES_CACHE_KEY, &tree, ttl).await {
                warn!("Cache write failed: {}", e);
            }
        }

        Ok(tree)
    }

    async fn build_tree(&self) -> Result<Vec<IndustryTree>, ApiError> {
        let industries = sqlx::query_as::<_, Industry>("SELECT * FROM industries ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        let subs =
            sqlx::query_as::<_, SubIndustry>("SELECT * FROM sub_industries ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        let images = sqlx::query_as::<_, Image>("SELECT * FROM images")
            .fetch_all(&self.pool)
            .await?;

        Ok(assemble_tree(industries, subs, images))
    }

    pub async fn get(&self, id: Uuid) -> Result<IndustryTree, ApiError> {
        let industry = sqlx::query_as::<_, Industry>("SELECT * FROM industries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Industry not found"))?;

        let subs = sqlx::query_as::<_, SubIndustry>(
            "SELECT * FROM sub_industries WHERE industry_id = $1 ORDER BY name",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        let images = sqlx::query_as::<_, Image>(
            "SELECT i.* FROM images i
             JOIN sub_industries s ON s.id = i.sub_industry_id
             WHERE s.industry_id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut tree = assemble_tree(vec![industry], subs, images);
        Ok(tree.remove(0))
    }

    pub async fn update(&self, id: Uuid, name: &str) -> Result<Industry, ApiError> {
        let industry = sqlx::query_as::<_, Industry>(
            "UPDATE industries SET name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Industry not found"))?;
        Ok(industry)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Industry, ApiError> {
        let industry =
            sqlx::query_as::<_, Industry>("DELETE FROM industries WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| ApiError::not_found("Industry not found"))?;
        Ok(industry)
    }

    /// Manual cache invalidation; the only invalidation path by design
    pub async fn clear_cache(&self) -> Result<(), ApiError> {
        let mut cache = Cache::handle().await?;
        cache.delete(INDUSTRIES_CACHE_KEY).await?;
        Ok(())
    }
}

/// Group flat rows into the nested industry → sub-industry → image shape
fn assemble_tree(
    industries: Vec<Industry>,
    subs: Vec<SubIndustry>,
    images: Vec<Image>,
) -> Vec<IndustryTree> {
    let mut images_by_sub: HashMap<Uuid, Vec<ImageSummary>> = HashMap::new();
    for image in images {
        images_by_sub
            .entry(image.sub_industry_id)
            .or_default()
            .push(ImageSummary {
                id: image.id,
                file: image.file,
                text: image.text,
            });
    }

    let mut subs_by_industry: HashMap<Uuid, Vec<SubIndustryTree>> = HashMap::new();
    for sub in subs {
        let images = images_by_sub.remove(&sub.id).unwrap_or_default();
        subs_by_industry
            .entry(sub.industry_id)
            .or_default()
            .push(SubIndustryTree {
                id: sub.id,
                name: sub.name,
                images,
            });
    }

    industries
        .into_iter()
        .map(|industry| IndustryTree {
            sub_industries: subs_by_industry.remove(&industry.id).unwrap_or_default(),
            id: industry.id,
            name: industry.name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn industry(name: &str) -> Industry {
        Industry {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    #[test]
    fn tree_groups_subs_and_images() {
        let food = industry("Food");
        let tech = industry("Tech");
        let bakery = SubIndustry {
            id: Uuid::new_v4(),
            name: "Bakery".to_string(),
            industry_id: food.id,
        };
        let image = Image {
            id: Uuid::new_v4(),
            file: "https://img.example/1.jpg".to_string(),
            text: false,
            sub_industry_id: bakery.id,
        };

        let tree = assemble_tree(vec![food.clone(), tech.clone()], vec![bakery], vec![image]);

        assert_eq!(tree.len(), 2);
        let food_tree = tree.iter().find(|t| t.id == food.id).unwrap();
        assert_eq!(food_tree.sub_industries.len(), 1);
        assert_eq!(food_tree.sub_industries[0].images.len(), 1);
        assert!(!food_tree.sub_industries[0].images[0].text);

        let tech_tree = tree.iter().find(|t| t.id == tech.id).unwrap();
        assert!(tech_tree.sub_industries.is_empty());
    }

    #[test]
    fn tree_shape_matches_listing_contract() {
        let food = industry("Food");
        let tree = assemble_tree(vec![food], vec![], vec![]);
        let value = serde_json::to_value(&tree).unwrap();
        assert!(value[0]["sub_industries"].is_array());
        assert!(value[0]["name"].is_string());
    }
}
