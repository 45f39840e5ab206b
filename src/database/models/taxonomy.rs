use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Industry {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubIndustry {
    pub id: Uuid,
    pub name: String,
    pub industry_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Image {
    pub id: Uuid,
    pub file: String,
    /// True once the image has been consumed by layout generation (or was
    /// ingested as a text-bearing image)
    pub text: bool,
    pub sub_industry_id: Uuid,
}

/// Industry with its sub-industries and their images, as served by the
/// cached listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryTree {
    pub id: Uuid,
    pub name: String,
    pub sub_industries: Vec<SubIndustryTree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubIndustryTree {
    pub id: Uuid,
    pub name: String,
    pub images: Vec<ImageSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSummary {
    pub id: Uuid,
    pub file: String,
    pub text: bool,
}
