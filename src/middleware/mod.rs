use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::{AppState, error::AppError, models::UserRole, utils::jwt::Claims};

pub const AUTH_COOKIE: &str = "access_token";

/// Static API-key gate applied to every route under the API prefix.
pub async fn api_key_guard(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = req
        .headers()
        .get("api-access-key")
        .and_then(|header| header.to_str().ok());

    if api_key != Some(state.config.auth.api_access_key.as_str()) {
        return Err(AppError::Unauthorized("Invalid API access key".to_string()));
    }

    Ok(next.run(req).await)
}

pub async fn auth_middleware(mut req: Request, next: Next) -> Result<Response, AppError> {
    let claims = authenticate(req.headers())?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

pub async fn admin_middleware(mut req: Request, next: Next) -> Result<Response, AppError> {
    let claims = authorize_admin(req.headers())?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Verify the session token on a request. Handlers whose route shares a path
/// with a public one call this directly instead of going through the layers.
pub fn authenticate(headers: &HeaderMap) -> Result<Claims, AppError> {
    let token = extract_token(headers)?;
    crate::utils::jwt::verify_token(&token)
}

pub fn authorize_admin(headers: &HeaderMap) -> Result<Claims, AppError> {
    let claims = authenticate(headers)?;

    if claims.role != UserRole::Admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(claims)
}

/// The session token travels either as a bearer header or in the HTTP-only
/// login cookie.
fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    if let Some(auth_header) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
    {
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))?;
        return Ok(token.to_string());
    }

    token_from_cookies(headers)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
}

fn token_from_cookies(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(http::header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == AUTH_COOKIE).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=abc.def.ghi; lang=vi"),
        );

        assert_eq!(token_from_cookies(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn bearer_header_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_static("access_token=from-cookie"),
        );

        assert_eq!(extract_token(&headers).unwrap(), "from-header");
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let headers = HeaderMap::new();
        assert!(extract_token(&headers).is_err());
    }
}
