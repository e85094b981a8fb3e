use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        ApiResponse, CreatePromotionRequest, MessageResponse, Promotion, PromotionView,
        UpdatePromotionRequest,
    },
    queries::promotion_queries,
    utils::extractors::Locale,
};

const LATEST_COUNT: i64 = 3;

pub async fn create_promotion(
    State(state): State<AppState>,
    Json(payload): Json<CreatePromotionRequest>,
) -> Result<Json<ApiResponse<Promotion>>> {
    if promotion_queries::find_by_title(&state.db, &payload.title)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Promotion title already exists".to_string(),
        ));
    }

    let promotion = promotion_queries::create(&state.db, &payload).await?;

    Ok(Json(ApiResponse::new(
        "Promotion created successfully",
        promotion,
    )))
}

pub async fn update_promotion(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePromotionRequest>,
) -> Result<Json<MessageResponse>> {
    promotion_queries::update(&state.db, id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Promotion ID {} not found", id)))?;

    Ok(Json(MessageResponse::new("Promotion updated successfully")))
}

pub async fn list_promotions(
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Json<Vec<PromotionView>>> {
    let promotions = promotion_queries::find_all(&state.db).await?;

    Ok(Json(promotions.iter().map(|p| p.localize(&locale)).collect()))
}

/// The newest promotions for the storefront banner.
pub async fn latest_promotions(
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Json<Vec<PromotionView>>> {
    let promotions = promotion_queries::find_latest(&state.db, LATEST_COUNT).await?;

    Ok(Json(promotions.iter().map(|p| p.localize(&locale)).collect()))
}

pub async fn get_promotion(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(id): Path<i32>,
) -> Result<Json<PromotionView>> {
    let promotion = promotion_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Promotion ID {} not found", id)))?;

    Ok(Json(promotion.localize(&locale)))
}

pub async fn delete_promotion(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    if !promotion_queries::delete(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Promotion ID {} not found", id)));
    }

    Ok(Json(MessageResponse::new("Promotion deleted successfully")))
}
