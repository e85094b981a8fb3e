use axum::{Json, extract::State};

use crate::{AppState, error::Result, models::MessageResponse, queries::user_queries};

/// Create the default admin/demo accounts when missing. Also runs at startup;
/// this endpoint exists for re-seeding a fresh database.
pub async fn seed(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    let message = user_queries::ensure_default_users(&state.db, &state.config.auth).await?;

    Ok(Json(MessageResponse::new(message)))
}
