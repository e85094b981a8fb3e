use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, Result},
    middleware::AUTH_COOKIE,
    models::{LoginRequest, LoginResponse, MessageResponse},
    queries::user_queries,
    utils::jwt::{self, Claims},
};

const COOKIE_MAX_AGE_SECONDS: i64 = 3600;

/// Credential check and session issuance: the signed token travels back both
/// in the body envelope and as an HTTP-only cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let user = user_queries::find_by_username(&state.db, &payload.username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let is_valid = bcrypt::verify(&payload.password, &user.password)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        return Err(AppError::Unauthorized("Incorrect password".to_string()));
    }

    let token = jwt::generate_token(user.id, &user.username, user.role)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        login_cookie(&token, state.config.server.production),
    );

    Ok((
        headers,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user: user.profile(),
        }),
    ))
}

pub async fn me(Extension(claims): Extension<Claims>) -> Result<Json<serde_json::Value>> {
    let user_id: i32 = claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Unauthorized".to_string()))?;

    Ok(Json(json!({
        "userId": user_id,
        "username": claims.username,
        "role": claims.role,
    })))
}

pub async fn logout() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, logout_cookie());

    (headers, Json(MessageResponse::new("Logged out successful")))
}

fn login_cookie(token: &str, production: bool) -> HeaderValue {
    let attributes = if production {
        "; Secure; SameSite=None"
    } else {
        "; SameSite=Lax"
    };

    let cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}{}",
        AUTH_COOKIE, token, COOKIE_MAX_AGE_SECONDS, attributes
    );

    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

fn logout_cookie() -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax",
        AUTH_COOKIE
    ))
    .unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_cookie_is_http_only_with_one_hour_expiry() {
        let value = login_cookie("abc.def", false);
        let cookie = value.to_str().unwrap();

        assert!(cookie.starts_with("access_token=abc.def"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn production_cookie_is_secure_cross_site() {
        let value = login_cookie("abc.def", true);
        let cookie = value.to_str().unwrap();

        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        let cookie = logout_cookie();
        assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
    }
}
