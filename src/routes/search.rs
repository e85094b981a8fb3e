use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState,
    error::Result,
    models::{
        AdvancedSearchQuery, CategorySuggestion, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, ProductDetail,
        ProductSearchResponse, SearchQuery, SuggestionQuery, SuggestionResponse,
    },
    queries::search_queries,
};

/// Category suggestions for the search box dropdown.
pub async fn suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<SuggestionResponse>> {
    let categories = search_queries::category_suggestions(&state.db, query.q.as_deref()).await?;

    Ok(Json(SuggestionResponse {
        categories: categories.into_iter().map(CategorySuggestion::from).collect(),
    }))
}

/// Keyword product search. A blank query returns an empty page rather than
/// the whole catalog.
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ProductSearchResponse>> {
    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Ok(Json(ProductSearchResponse {
            products: Vec::new(),
            total: 0,
            page,
            limit,
        }));
    }

    let (details, total) = search_queries::search_products(&state.db, q, page, limit).await?;

    Ok(Json(to_response(details, total, page, limit)))
}

pub async fn products_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ProductSearchResponse>> {
    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let (details, total) =
        search_queries::products_by_category(&state.db, category_id, page, limit).await?;

    Ok(Json(to_response(details, total, page, limit)))
}

pub async fn advanced_search(
    State(state): State<AppState>,
    Query(filters): Query<AdvancedSearchQuery>,
) -> Result<Json<ProductSearchResponse>> {
    let page = filters.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = filters.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let (details, total) =
        search_queries::advanced_search(&state.db, &filters, page, limit).await?;

    Ok(Json(to_response(details, total, page, limit)))
}

fn to_response(
    details: Vec<ProductDetail>,
    total: i64,
    page: i64,
    limit: i64,
) -> ProductSearchResponse {
    ProductSearchResponse {
        products: details
            .into_iter()
            .map(ProductDetail::into_search_result)
            .collect(),
        total,
        page,
        limit,
    }
}
