use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        ApiResponse, CategoryView, CreateCategoryRequest, MessageResponse, UpdateCategoryRequest,
    },
    queries::category_queries,
    utils::extractors::Locale,
};

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<Json<MessageResponse>> {
    category_queries::create(&state.db, &payload).await?;

    Ok(Json(MessageResponse::new("Category created successfully")))
}

pub async fn list_categories(
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Json<ApiResponse<Vec<CategoryView>>>> {
    let categories = category_queries::find_by_active(&state.db, true).await?;
    let data = categories.iter().map(|c| c.localize(&locale)).collect();

    Ok(Json(ApiResponse::new(
        "Categories fetched successfully",
        data,
    )))
}

/// Soft-deleted categories, still retrievable for the admin screen.
pub async fn list_deleted_categories(
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Json<ApiResponse<Vec<CategoryView>>>> {
    let categories = category_queries::find_by_active(&state.db, false).await?;
    let data = categories.iter().map(|c| c.localize(&locale)).collect();

    Ok(Json(ApiResponse::new(
        "Deleted categories fetched successfully",
        data,
    )))
}

pub async fn get_category(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CategoryView>>> {
    let category = category_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category with ID {} not found", id)))?;

    Ok(Json(ApiResponse::new(
        "Category fetched successfully",
        category.localize(&locale),
    )))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<MessageResponse>> {
    category_queries::update(&state.db, id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category with ID {} not found", id)))?;

    Ok(Json(MessageResponse::new("Category updated successfully")))
}

pub async fn soft_delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    if !category_queries::set_active(&state.db, id, false).await? {
        return Err(AppError::NotFound(format!("Category with ID {} not found", id)));
    }

    Ok(Json(MessageResponse::new("Category deleted successfully")))
}

pub async fn restore_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    if !category_queries::set_active(&state.db, id, true).await? {
        return Err(AppError::NotFound(format!("Category with ID {} not found", id)));
    }

    Ok(Json(MessageResponse::new("Category restored successfully")))
}

pub async fn hard_delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    if !category_queries::hard_delete(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Category with ID {} not found", id)));
    }

    Ok(Json(MessageResponse::new(
        "Category permanently deleted successfully",
    )))
}
