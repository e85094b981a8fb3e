use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::Result,
    models::{MonthlyStat, StatsOverview, TopSellingProduct, YearlyStats},
    queries::stats_queries,
};

const TOP_SELLING_LIMIT: i64 = 5;

pub async fn overview(State(state): State<AppState>) -> Result<Json<StatsOverview>> {
    let stats = stats_queries::overview(&state.db).await?;

    Ok(Json(stats))
}

pub async fn monthly(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<MonthlyStat>>> {
    let stats = stats_queries::monthly(&state.db, year).await?;

    Ok(Json(stats))
}

pub async fn yearly(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<YearlyStats>> {
    let stats = stats_queries::yearly(&state.db, year).await?;

    Ok(Json(stats))
}

pub async fn top_selling_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<TopSellingProduct>>> {
    let products = stats_queries::top_selling(&state.db, TOP_SELLING_LIMIT).await?;

    Ok(Json(products))
}
