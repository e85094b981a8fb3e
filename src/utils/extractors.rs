use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::models::DEFAULT_LOCALE;

/// Requested content locale, taken from the `locale-language` header the
/// storefront sends. Anything missing or unreadable falls back to the default.
#[derive(Debug, Clone)]
pub struct Locale(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get("locale-language")
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_LOCALE)
            .to_string();

        Ok(Locale(locale))
    }
}
