use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::{CategoryRef, CategoryView, LocalizedText};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: Json<LocalizedText>,
    pub description: Option<Json<LocalizedText>>,
    pub price: Decimal,
    pub total_price: Option<Decimal>,
    pub brand: Option<String>,
    pub product_code: Option<String>,
    pub color: Option<String>,
    pub origin: Option<Json<LocalizedText>>,
    pub material: Option<Json<LocalizedText>>,
    pub size: Option<String>,
    pub specifications: Option<Json<LocalizedText>>,
    pub is_active: bool,
    pub view_count: i32,
    pub category_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Price charged at checkout: the computed total price when present,
    /// otherwise the base price.
    pub fn effective_price(&self) -> Decimal {
        self.total_price.unwrap_or(self.price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub url: String,
}

/// A product with its category and ordered images attached, the shape most
/// read endpoints work with before any locale projection.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub product: Product,
    pub category: Option<super::Category>,
    pub images: Vec<ProductImage>,
}

impl ProductDetail {
    /// Flatten every locale map into plain strings for one locale. A pure
    /// post-fetch transform, applied to list and detail responses.
    pub fn localize(&self, locale: &str) -> ProductView {
        ProductView {
            id: self.product.id,
            name: self.product.name.resolve(locale).map(str::to_string),
            description: self
                .product
                .description
                .as_ref()
                .and_then(|d| d.resolve(locale))
                .map(str::to_string),
            price: self.product.price,
            total_price: self.product.total_price,
            brand: self.product.brand.clone(),
            product_code: self.product.product_code.clone(),
            color: self.product.color.clone(),
            origin: self
                .product
                .origin
                .as_ref()
                .and_then(|o| o.resolve(locale))
                .map(str::to_string),
            material: self
                .product
                .material
                .as_ref()
                .and_then(|m| m.resolve(locale))
                .map(str::to_string),
            size: self.product.size.clone(),
            specifications: self
                .product
                .specifications
                .as_ref()
                .and_then(|s| s.resolve(locale))
                .map(str::to_string),
            is_active: self.product.is_active,
            view_count: self.product.view_count,
            created_at: self.product.created_at,
            updated_at: self.product.updated_at,
            category: self.category.as_ref().map(|c| c.localize(locale)),
            images: self.images.clone(),
        }
    }

    /// Raw-locale shape used by the search endpoints: full `{vi, en}` maps
    /// with a trimmed category reference.
    pub fn into_search_result(self) -> ProductSearchResult {
        ProductSearchResult {
            category: self.category.as_ref().map(CategoryRef::from),
            product: self.product,
            images: self.images,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub total_price: Option<Decimal>,
    pub brand: Option<String>,
    pub product_code: Option<String>,
    pub color: Option<String>,
    pub origin: Option<String>,
    pub material: Option<String>,
    pub size: Option<String>,
    pub specifications: Option<String>,
    pub is_active: bool,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category: Option<CategoryView>,
    pub images: Vec<ProductImage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchResult {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<CategoryRef>,
    pub images: Vec<ProductImage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchResponse {
    pub products: Vec<ProductSearchResult>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// Request types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: LocalizedText,
    #[serde(default)]
    pub description: Option<LocalizedText>,
    pub price: Decimal,
    pub category_id: i32,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub origin: Option<LocalizedText>,
    #[serde(default)]
    pub material: Option<LocalizedText>,
    #[serde(default)]
    pub specifications: Option<LocalizedText>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<LocalizedText>,
    #[serde(default)]
    pub description: Option<LocalizedText>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub origin: Option<LocalizedText>,
    #[serde(default)]
    pub material: Option<LocalizedText>,
    #[serde(default)]
    pub specifications: Option<LocalizedText>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    ViewsDesc,
}

#[derive(Debug, Deserialize)]
pub struct ProductSortQuery {
    #[serde(default)]
    pub sort: Option<ProductSort>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: 3,
            name: Json(LocalizedText::new("máy rửa bát", "dishwasher")),
            description: Some(Json(LocalizedText {
                vi: None,
                en: Some("60cm built-in".to_string()),
            })),
            price: Decimal::from(18_500_000_i64),
            total_price: Some(Decimal::from(17_900_000_i64)),
            brand: Some("Bosch".to_string()),
            product_code: Some("SMS6ZCI42E".to_string()),
            color: Some("inox".to_string()),
            origin: None,
            material: None,
            size: None,
            specifications: None,
            is_active: true,
            view_count: 12,
            category_id: Some(7),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn effective_price_prefers_total_price() {
        let mut p = product();
        assert_eq!(p.effective_price(), Decimal::from(17_900_000_i64));

        p.total_price = None;
        assert_eq!(p.effective_price(), Decimal::from(18_500_000_i64));
    }

    #[test]
    fn localize_projects_every_locale_map() {
        let detail = ProductDetail {
            product: product(),
            category: None,
            images: vec![],
        };

        let view = detail.localize("vi");
        assert_eq!(view.name.as_deref(), Some("máy rửa bát"));
        // description only stored in English, falls back
        assert_eq!(view.description.as_deref(), Some("60cm built-in"));
        assert_eq!(view.brand.as_deref(), Some("Bosch"));
    }

    #[test]
    fn search_result_keeps_raw_locale_maps() {
        let detail = ProductDetail {
            product: product(),
            category: None,
            images: vec![],
        };

        let json = serde_json::to_value(detail.into_search_result()).unwrap();
        assert_eq!(json["name"]["vi"], "máy rửa bát");
        assert_eq!(json["name"]["en"], "dishwasher");
        assert_eq!(json["productCode"], "SMS6ZCI42E");
    }
}
