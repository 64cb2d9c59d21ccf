//! Session-token authentication extractors.
//!
//! The token is read from the `user_session` cookie first, then from an
//! `Authorization: Bearer <token>` header.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use scrapedesk_core::actor::Actor;
use scrapedesk_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "user_session";

/// The caller behind the request, if any.
///
/// Job handlers take this instead of [`AuthUser`] so that a missing session
/// and a non-admin session go through the same refusal path. Only a store
/// failure rejects.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Option<Actor>);

impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(CurrentActor(None));
        };

        let actor = state.actors.resolve_actor(&token).await?;
        Ok(CurrentActor(actor))
    }
}

/// Authenticated user; rejects with 401 when there is no valid session.
///
/// ```ignore
/// async fn my_handler(AuthUser(actor): AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = actor.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Actor);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentActor(actor) = CurrentActor::from_request_parts(parts, state).await?;
        actor.map(AuthUser).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing or expired session".into(),
            ))
        })
    }
}

/// Extract the raw session token from the request headers.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    cookie_token(headers).or_else(|| bearer_token(headers))
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
