use sqlx::PgPool;

use crate::{
    error::Result,
    models::{NewsletterSubscriber, SubscribeRequest},
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<NewsletterSubscriber>> {
    let subscriber = sqlx::query_as::<_, NewsletterSubscriber>(
        "SELECT * FROM newsletter_subscribers WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(subscriber)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<NewsletterSubscriber>> {
    let subscriber = sqlx::query_as::<_, NewsletterSubscriber>(
        "SELECT * FROM newsletter_subscribers WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(subscriber)
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<NewsletterSubscriber>> {
    let subscribers = sqlx::query_as::<_, NewsletterSubscriber>(
        "SELECT * FROM newsletter_subscribers ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(subscribers)
}

pub async fn create(pool: &PgPool, req: &SubscribeRequest) -> Result<NewsletterSubscriber> {
    let subscriber = sqlx::query_as::<_, NewsletterSubscriber>(
        "INSERT INTO newsletter_subscribers (full_name, email, phone, content)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&req.full_name)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(&req.content)
    .fetch_one(pool)
    .await?;

    Ok(subscriber)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM newsletter_subscribers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
