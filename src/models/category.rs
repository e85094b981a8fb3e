use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::LocalizedText;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: Json<LocalizedText>,
    pub description: Json<LocalizedText>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Flatten the locale maps into plain strings for one locale.
    pub fn localize(&self, locale: &str) -> CategoryView {
        CategoryView {
            id: self.id,
            name: self.name.resolve_or_empty(locale),
            description: self.description.resolve_or_empty(locale),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category as it appears nested inside product responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: i32,
    pub name: Json<LocalizedText>,
}

impl From<&Category> for CategoryRef {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: LocalizedText,
    #[serde(default)]
    pub description: Option<LocalizedText>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub name: Option<LocalizedText>,
    #[serde(default)]
    pub description: Option<LocalizedText>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category() -> Category {
        Category {
            id: 7,
            name: Json(LocalizedText::new("nhà bếp", "kitchen")),
            description: Json(LocalizedText {
                vi: Some("thiết bị nhà bếp".to_string()),
                en: None,
            }),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn localize_flattens_both_fields() {
        let view = category().localize("en");
        assert_eq!(view.name, "kitchen");
        // no English description stored, falls back to Vietnamese
        assert_eq!(view.description, "thiết bị nhà bếp");
    }

    #[test]
    fn localized_view_serializes_camel_case() {
        let json = serde_json::to_value(category().localize("vi")).unwrap();
        assert_eq!(json["name"], "nhà bếp");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
