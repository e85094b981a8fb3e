use sqlx::PgPool;
use sqlx::types::Json;

use crate::{
    error::{AppError, Result, is_unique_violation},
    models::{Category, CreateCategoryRequest, UpdateCategoryRequest},
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(category)
}

/// All categories with the given active flag, oldest first.
pub async fn find_by_active(pool: &PgPool, is_active: bool) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE is_active = $1 ORDER BY id ASC",
    )
    .bind(is_active)
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Insert a category; the unique index on the raw name JSONB turns duplicates
/// into a conflict.
pub async fn create(pool: &PgPool, req: &CreateCategoryRequest) -> Result<Category> {
    let result = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING *",
    )
    .bind(Json(&req.name))
    .bind(Json(req.description.clone().unwrap_or_default()))
    .fetch_one(pool)
    .await;

    match result {
        Ok(category) => Ok(category),
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
            "Category name already exists".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Per-locale merge update: locales present on the patch replace the stored
/// ones, absent locales are kept.
pub async fn update(pool: &PgPool, id: i32, req: UpdateCategoryRequest) -> Result<Option<Category>> {
    let Some(mut category) = find_by_id(pool, id).await? else {
        return Ok(None);
    };

    if let Some(name) = req.name {
        category.name.merge(name);
    }
    if let Some(description) = req.description {
        category.description.merge(description);
    }

    let updated = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $1, description = $2, updated_at = NOW()
         WHERE id = $3 RETURNING *",
    )
    .bind(Json(&*category.name))
    .bind(Json(&*category.description))
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(updated))
}

pub async fn set_active(pool: &PgPool, id: i32, is_active: bool) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE categories SET is_active = $1, updated_at = NOW() WHERE id = $2",
    )
    .bind(is_active)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn hard_delete(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
