use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    store::{users, User},
    AppResult, AppState,
};

pub const USER_ID: &str = "user_id";
pub const RETURN_URL: &str = "return_url";
pub const FLASH: &str = "flash";

/// Queues a message for the next rendered page.
pub async fn flash(session: &Session, message: impl Into<String>) -> AppResult<()> {
    let mut flashes: Vec<String> = session.get(FLASH).await?.unwrap_or_default();
    flashes.push(message.into());
    session.insert(FLASH, flashes).await?;
    Ok(())
}

/// Drains the queued messages; each is shown once.
pub async fn take_flashes(session: &Session) -> AppResult<Vec<String>> {
    Ok(session.remove(FLASH).await?.unwrap_or_default())
}

/// Only same-site absolute paths are followed after login.
pub fn safe_return_url(url: &str) -> Option<&str> {
    (url.starts_with('/') && !url.starts_with("//") && !url.contains('\\')).then_some(url)
}

pub fn login_url(return_url: &str) -> String {
    match serde_urlencoded::to_string([(RETURN_URL, return_url)]) {
        Ok(query) => format!("/login?{query}"),
        Err(_) => "/login".to_owned(),
    }
}

async fn session_user(session: &Session, state: &AppState) -> AppResult<Option<User>> {
    let Some(user_id) = session.get::<Uuid>(USER_ID).await? else {
        return Ok(None);
    };

    let user = users::by_id(&state.db_pool, user_id).await?;
    if user.is_none() {
        tracing::warn!("session refers to missing user {user_id}");
        session.remove::<Uuid>(USER_ID).await?;
    }
    Ok(user)
}

async fn session_of(parts: &mut Parts, state: &AppState) -> Result<Session, Response> {
    Session::from_request_parts(parts, state)
        .await
        .map_err(IntoResponse::into_response)
}

/// The logged-in user of a page request. Anyone else is sent to the login
/// page, which brings them back here afterwards.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = session_of(parts, state).await?;

        match session_user(&session, state).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(Redirect::to(&login_url(parts.uri.path())).into_response()),
            Err(e) => Err(crate::res::PageError(e).into_response()),
        }
    }
}

/// The logged-in user, if any. For pages anyone may see.
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = session_of(parts, state).await?;

        session_user(&session, state)
            .await
            .map(MaybeUser)
            .map_err(|e| crate::res::PageError(e).into_response())
    }
}
