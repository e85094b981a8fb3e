use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;

use crate::{
    config::{AppConfig, load_ses_client},
    database,
    error::Result,
    queries::user_queries,
    routes,
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub ses: SesClient,
    pub config: AppConfig,
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let ses = load_ses_client().await?;

    let state = AppState {
        db: pool,
        ses,
        config: config.clone(),
    };

    let seed_message = user_queries::ensure_default_users(&state.db, &state.config.auth).await?;
    tracing::info!("User seed: {}", seed_message);

    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|_| {
                crate::error::AppError::ConfigError(format!("Invalid CORS origin: {}", origin))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            http::header::CONTENT_TYPE,
            http::header::AUTHORIZATION,
            http::header::HeaderName::from_static("api-access-key"),
            http::header::HeaderName::from_static("locale-language"),
        ])
        .allow_credentials(true)
        .allow_origin(allowed_origins);

    let app = routes::create_router(&state)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors)
        .with_state(state);

    Ok(app)
}
