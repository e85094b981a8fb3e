use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        ApiResponse, CreateProductRequest, MessageResponse, ProductDetail, ProductSearchResult,
        ProductSortQuery, ProductView, UpdateProductRequest,
    },
    queries::{category_queries, product_queries},
    utils::extractors::Locale,
};

/// Showcase size for the curated home-page strips.
const SHOWCASE_SIZE: usize = 4;

const KITCHEN_KEYWORDS_EN: &[&str] = &[
    "induction cooker",
    "range hood",
    "dishwasher",
    "griller",
    "refrigerator",
    "coffee machine",
    "kitchen faucet",
    "kitchen sink",
];
const KITCHEN_KEYWORDS_VI: &[&str] = &[
    "bếp từ",
    "máy hút mùi",
    "máy rửa bát",
    "lò nướng",
    "tủ lạnh",
    "máy pha cà phê",
    "vòi bếp",
    "chậu rửa bếp",
];
const KITCHEN_PRIORITY_KEYWORDS: &[&str] =
    &["kitchen sink", "kitchen faucet", "chậu rửa bếp", "vòi bếp"];

const TECH_KEYWORDS_EN: &[&str] = &[
    "robot floor cleaner",
    "air purifier",
    "dryer",
    "smart washing machine",
    "smart home",
];
const TECH_KEYWORDS_VI: &[&str] = &[
    "robot lau nhà",
    "máy lọc không khí",
    "máy sấy quần áo",
    "máy giặt thông minh",
    "nhà thông minh",
];

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<Json<ApiResponse<ProductSearchResult>>> {
    category_queries::find_by_id(&state.db, payload.category_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Category with ID {} not found", payload.category_id))
        })?;

    if product_queries::find_by_name(&state.db, &payload.name)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Product name already exists".to_string()));
    }

    let product = product_queries::create(&state.db, &payload).await?;
    let detail = product_queries::find_detail(&state.db, product.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found after creation".to_string()))?;

    Ok(Json(ApiResponse::new(
        "Product created successfully",
        detail.into_search_result(),
    )))
}

pub async fn list_products(
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Json<ApiResponse<Vec<ProductView>>>> {
    let products = product_queries::find_by_active(&state.db, true).await?;
    let data = products.iter().map(|p| p.localize(&locale)).collect();

    Ok(Json(ApiResponse::new(
        "Product list fetched successfully",
        data,
    )))
}

pub async fn list_deleted_products(
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Json<ApiResponse<Vec<ProductView>>>> {
    let products = product_queries::find_by_active(&state.db, false).await?;
    let data = products.iter().map(|p| p.localize(&locale)).collect();

    Ok(Json(ApiResponse::new(
        "Deleted product fetched successfully",
        data,
    )))
}

pub async fn list_sorted_products(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Query(query): Query<ProductSortQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let products = product_queries::find_sorted(&state.db, query.sort).await?;

    Ok(Json(products.iter().map(|p| p.localize(&locale)).collect()))
}

/// Product detail; every fetch counts as a view.
pub async fn get_product(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProductView>>> {
    product_queries::increment_view_count(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found", id)))?;

    let detail = product_queries::find_detail(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found", id)))?;

    Ok(Json(ApiResponse::new(
        "Product fetched successfully",
        detail.localize(&locale),
    )))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<ProductSearchResult>>> {
    if let Some(category_id) = payload.category_id {
        category_queries::find_by_id(&state.db, category_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Category with ID {} not found", category_id))
            })?;
    }

    product_queries::update(&state.db, id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found", id)))?;

    let detail = product_queries::find_detail(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found", id)))?;

    Ok(Json(ApiResponse::new(
        "Product updated successfully",
        detail.into_search_result(),
    )))
}

pub async fn soft_delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    if !product_queries::set_active(&state.db, id, false).await? {
        return Err(AppError::NotFound(format!("Product with ID {} not found", id)));
    }

    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

pub async fn restore_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    if !product_queries::set_active(&state.db, id, true).await? {
        return Err(AppError::NotFound(format!("Product with ID {} not found", id)));
    }

    Ok(Json(MessageResponse::new("Product restored successfully")))
}

pub async fn hard_delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    if !product_queries::hard_delete(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Product with ID {} not found", id)));
    }

    Ok(Json(MessageResponse::new(
        "Product permanently deleted successfully",
    )))
}

/// Curated kitchen strip: keyword candidates filtered through a three-pass
/// greedy fill that favors sinks/faucets and category diversity.
pub async fn kitchen_products(
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Json<Vec<ProductView>>> {
    let keywords = match locale.as_str() {
        "en" => KITCHEN_KEYWORDS_EN,
        _ => KITCHEN_KEYWORDS_VI,
    };

    let candidates = product_queries::find_by_keywords(&state.db, keywords, &locale).await?;
    let selected = pick_showcase(candidates, KITCHEN_PRIORITY_KEYWORDS, &locale, SHOWCASE_SIZE);

    Ok(Json(selected.iter().map(|p| p.localize(&locale)).collect()))
}

/// Tech strip: same greedy fill, no priority keywords.
pub async fn tech_products(
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Json<Vec<ProductView>>> {
    let keywords = match locale.as_str() {
        "en" => TECH_KEYWORDS_EN,
        _ => TECH_KEYWORDS_VI,
    };

    let candidates = product_queries::find_by_keywords(&state.db, keywords, &locale).await?;
    let selected = pick_showcase(candidates, &[], &locale, SHOWCASE_SIZE);

    Ok(Json(selected.iter().map(|p| p.localize(&locale)).collect()))
}

/// Three-pass greedy fill over keyword candidates:
/// 1. products matching a priority keyword, one per category;
/// 2. remaining products, still one per category, in candidate order;
/// 3. backfill regardless of category duplication.
fn pick_showcase(
    candidates: Vec<ProductDetail>,
    priority_keywords: &[&str],
    locale: &str,
    max: usize,
) -> Vec<ProductDetail> {
    let mut selected_ids: Vec<i32> = Vec::with_capacity(max);
    let mut used_categories: std::collections::HashSet<Option<i32>> =
        std::collections::HashSet::new();

    for product in &candidates {
        if selected_ids.len() >= max {
            break;
        }

        if matches_priority(product, priority_keywords, locale)
            && !used_categories.contains(&product.product.category_id)
        {
            selected_ids.push(product.product.id);
            used_categories.insert(product.product.category_id);
        }
    }

    for product in &candidates {
        if selected_ids.len() >= max {
            break;
        }

        if selected_ids.contains(&product.product.id)
            || used_categories.contains(&product.product.category_id)
        {
            continue;
        }

        selected_ids.push(product.product.id);
        used_categories.insert(product.product.category_id);
    }

    if selected_ids.len() < max {
        for product in &candidates {
            if selected_ids.len() >= max {
                break;
            }

            if !selected_ids.contains(&product.product.id) {
                selected_ids.push(product.product.id);
            }
        }
    }

    let mut by_id: std::collections::HashMap<i32, ProductDetail> = candidates
        .into_iter()
        .map(|p| (p.product.id, p))
        .collect();

    selected_ids
        .into_iter()
        .filter_map(|id| by_id.remove(&id))
        .collect()
}

fn matches_priority(product: &ProductDetail, priority_keywords: &[&str], locale: &str) -> bool {
    let product_name = product
        .product
        .name
        .resolve(locale)
        .unwrap_or_default()
        .to_lowercase();
    let category_name = product
        .category
        .as_ref()
        .and_then(|c| c.name.resolve(locale))
        .unwrap_or_default()
        .to_lowercase();

    priority_keywords.iter().any(|keyword| {
        let keyword = keyword.to_lowercase();
        product_name.contains(&keyword) || category_name.contains(&keyword)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, LocalizedText, Product};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::types::Json as SqlxJson;

    fn make_product(id: i32, name_en: &str, category_id: i32, category_en: &str) -> ProductDetail {
        let now = Utc::now();
        ProductDetail {
            product: Product {
                id,
                name: SqlxJson(LocalizedText::new(name_en, name_en)),
                description: None,
                price: Decimal::from(100),
                total_price: None,
                brand: None,
                product_code: None,
                color: None,
                origin: None,
                material: None,
                size: None,
                specifications: None,
                is_active: true,
                view_count: 0,
                category_id: Some(category_id),
                created_at: now,
                updated_at: now,
            },
            category: Some(Category {
                id: category_id,
                name: SqlxJson(LocalizedText::new(category_en, category_en)),
                description: SqlxJson(LocalizedText::default()),
                is_active: true,
                created_at: now,
                updated_at: now,
            }),
            images: vec![],
        }
    }

    const PRIORITY: &[&str] = &["kitchen sink", "kitchen faucet"];

    #[test]
    fn priority_products_come_first_despite_candidate_order() {
        let candidates = vec![
            make_product(1, "fridge X", 10, "refrigerator"),
            make_product(2, "hood Y", 11, "range hood"),
            make_product(3, "basin Z", 12, "kitchen sink"),
            make_product(4, "faucet W", 13, "kitchen faucet"),
            make_product(5, "oven V", 14, "griller"),
        ];

        let picked = pick_showcase(candidates, PRIORITY, "en", 4);
        let ids: Vec<i32> = picked.iter().map(|p| p.product.id).collect();

        assert_eq!(ids, vec![3, 4, 1, 2]);
    }

    #[test]
    fn second_pass_deduplicates_categories() {
        let candidates = vec![
            make_product(1, "fridge A", 10, "refrigerator"),
            make_product(2, "fridge B", 10, "refrigerator"),
            make_product(3, "hood C", 11, "range hood"),
            make_product(4, "oven D", 12, "griller"),
            make_product(5, "cooker E", 13, "induction cooker"),
        ];

        let picked = pick_showcase(candidates, PRIORITY, "en", 4);
        let ids: Vec<i32> = picked.iter().map(|p| p.product.id).collect();

        // only one refrigerator makes the cut while unique categories remain
        assert_eq!(ids, vec![1, 3, 4, 5]);
    }

    #[test]
    fn backfill_allows_duplicate_categories_when_candidates_run_out() {
        let candidates = vec![
            make_product(1, "fridge A", 10, "refrigerator"),
            make_product(2, "fridge B", 10, "refrigerator"),
            make_product(3, "fridge C", 10, "refrigerator"),
        ];

        let picked = pick_showcase(candidates, PRIORITY, "en", 4);
        let ids: Vec<i32> = picked.iter().map(|p| p.product.id).collect();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn priority_match_works_on_product_name_too() {
        let candidates = vec![
            make_product(1, "fridge A", 10, "refrigerator"),
            make_product(2, "granite kitchen sink 780", 10, "refrigerator"),
        ];

        let picked = pick_showcase(candidates, PRIORITY, "en", 1);
        assert_eq!(picked[0].product.id, 2);
    }
}
