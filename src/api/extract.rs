use axum::{
    extract::{FromRequest, FromRequestParts, Path},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};

use crate::{
    store::{users, User},
    AppError, AppState,
};

/// A JSON body whose rejections answer with the usual error body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; an id that does not parse is reported as not found.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// The user behind an `Authorization: Bearer <access token>` header.
#[derive(Debug, Clone)]
pub struct ApiUser(pub User);

impl FromRequestParts<AppState> for ApiUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                tracing::warn!("missing Authorization header");
                AppError::Unauthenticated("authentication credentials were not provided")
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            tracing::warn!("malformed Authorization header");
            AppError::Unauthenticated("authentication credentials were not provided")
        })?;

        let user_id = state.identity.tokens.verify_access(token.trim())?;
        let user = users::by_id(&state.db_pool, user_id).await?.ok_or_else(|| {
            tracing::warn!("token for missing user {user_id}");
            AppError::Unauthenticated("token is invalid or expired")
        })?;

        Ok(ApiUser(user))
    }
}
