use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::LocalizedText;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: i32,
    pub title: Json<LocalizedText>,
    pub content: Option<Json<LocalizedText>>,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Promotion {
    pub fn localize(&self, locale: &str) -> PromotionView {
        PromotionView {
            id: self.id,
            title: self.title.resolve_or_empty(locale),
            content: self
                .content
                .as_ref()
                .map(|c| c.resolve_or_empty(locale))
                .unwrap_or_default(),
            thumbnail: self.thumbnail.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionView {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromotionRequest {
    pub title: LocalizedText,
    #[serde(default)]
    pub content: Option<LocalizedText>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromotionRequest {
    #[serde(default)]
    pub title: Option<LocalizedText>,
    #[serde(default)]
    pub content: Option<LocalizedText>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}
