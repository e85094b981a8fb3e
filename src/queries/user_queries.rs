use sqlx::PgPool;

use crate::{
    config::AuthConfig,
    error::{AppError, Result},
    models::{User, UserRole},
};

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn create_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
    role: UserRole,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, password, role) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Create the default admin and demo accounts when they do not exist yet.
/// Runs at startup and behind the manual seed endpoint.
pub async fn ensure_default_users(pool: &PgPool, auth: &AuthConfig) -> Result<String> {
    if find_by_username(pool, "admin").await?.is_none() {
        let hash = bcrypt::hash(&auth.default_admin_password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;
        create_user(pool, "admin", &hash, UserRole::Admin).await?;
        return Ok("Admin account created".to_string());
    }

    if find_by_username(pool, "demo").await?.is_none() {
        let hash = bcrypt::hash(&auth.default_demo_password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;
        create_user(pool, "demo", &hash, UserRole::Demo).await?;
        return Ok("Demo account created".to_string());
    }

    Ok("Admin account already exists".to_string())
}
