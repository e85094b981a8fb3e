use sqlx::PgPool;
use sqlx::types::Json;

use crate::{
    error::Result,
    models::{CreatePromotionRequest, LocalizedText, Promotion, UpdatePromotionRequest},
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Promotion>> {
    let promotion = sqlx::query_as::<_, Promotion>("SELECT * FROM promotions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(promotion)
}

pub async fn find_by_title(pool: &PgPool, title: &LocalizedText) -> Result<Option<Promotion>> {
    let promotion = sqlx::query_as::<_, Promotion>("SELECT * FROM promotions WHERE title = $1")
        .bind(Json(title))
        .fetch_optional(pool)
        .await?;

    Ok(promotion)
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<Promotion>> {
    let promotions = sqlx::query_as::<_, Promotion>("SELECT * FROM promotions ORDER BY id ASC")
        .fetch_all(pool)
        .await?;

    Ok(promotions)
}

/// The newest promotions for the storefront banner.
pub async fn find_latest(pool: &PgPool, count: i64) -> Result<Vec<Promotion>> {
    let promotions = sqlx::query_as::<_, Promotion>(
        "SELECT * FROM promotions ORDER BY created_at DESC LIMIT $1",
    )
    .bind(count)
    .fetch_all(pool)
    .await?;

    Ok(promotions)
}

pub async fn create(pool: &PgPool, req: &CreatePromotionRequest) -> Result<Promotion> {
    let promotion = sqlx::query_as::<_, Promotion>(
        "INSERT INTO promotions (title, content, thumbnail) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Json(&req.title))
    .bind(req.content.as_ref().map(Json))
    .bind(&req.thumbnail)
    .fetch_one(pool)
    .await?;

    Ok(promotion)
}

/// Per-locale merge on title and content; the thumbnail is replaced outright.
pub async fn update(
    pool: &PgPool,
    id: i32,
    req: UpdatePromotionRequest,
) -> Result<Option<Promotion>> {
    let Some(mut promotion) = find_by_id(pool, id).await? else {
        return Ok(None);
    };

    if let Some(title) = req.title {
        promotion.title.merge(title);
    }
    if let Some(content) = req.content {
        match &mut promotion.content {
            Some(stored) => stored.merge(content),
            None => promotion.content = Some(Json(content)),
        }
    }
    if let Some(thumbnail) = req.thumbnail {
        promotion.thumbnail = Some(thumbnail);
    }

    let updated = sqlx::query_as::<_, Promotion>(
        "UPDATE promotions SET title = $1, content = $2, thumbnail = $3, updated_at = NOW()
         WHERE id = $4 RETURNING *",
    )
    .bind(Json(&*promotion.title))
    .bind(promotion.content.as_ref().map(|c| Json(&**c)))
    .bind(&promotion.thumbnail)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(updated))
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
