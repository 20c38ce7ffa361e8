use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::state::AppState;

/// Outcome of the authorization gate for one request.
///
/// Never rejects: an unauthorized caller still gets the index-addressed view.
///
/// ```ignore
/// async fn my_handler(Authorized(authorized): Authorized, ...) { ... }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorized(pub bool);

impl FromRequestParts<AppState> for Authorized {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Authorized(is_authorized(
            &parts.headers,
            state.admin_token.as_deref(),
        )))
    }
}

/// `Authorization: Bearer <token>` matching the configured admin token.
/// Without a configured token nobody is authorized.
pub fn is_authorized(headers: &HeaderMap, admin_token: Option<&str>) -> bool {
    let Some(expected) = admin_token else {
        return false;
    };

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token.trim() == expected)
}
