use axum::{debug_handler, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    identity::{Identity, Registration},
    AppError, AppResult, AppState,
};

use super::{
    extract::{ApiJson, ApiUser},
    types::{AccessResponse, AccountView, DetailResponse, LoginResponse, UserResponse},
};

#[derive(Deserialize)]
pub(crate) struct Credentials {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub(crate) struct RefreshBody {
    refresh: Option<String>,
}

impl RefreshBody {
    fn required(self) -> AppResult<String> {
        self.refresh
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| AppError::invalid("refresh", "This field is required."))
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn register(
    State(db_pool): State<SqlitePool>,
    State(identity): State<Identity>,
    ApiJson(registration): ApiJson<Registration>,
) -> AppResult<(StatusCode, Json<AccountView>)> {
    let user = identity.register(&db_pool, registration).await?;
    Ok((StatusCode::CREATED, Json(AccountView::from(&user))))
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    State(identity): State<Identity>,
    ApiJson(Credentials { username, password }): ApiJson<Credentials>,
) -> AppResult<Json<LoginResponse>> {
    let user = identity
        .authenticate(&db_pool, &username, &password)
        .await?
        .ok_or(AppError::Unauthenticated("invalid credentials"))?;

    let tokens = identity.tokens.issue_pair(&user)?;
    tracing::info!("issued tokens to @{}", user.username);
    Ok(Json(LoginResponse {
        user: AccountView::from(&user),
        tokens,
    }))
}

#[debug_handler(state = AppState)]
pub(crate) async fn logout(
    State(db_pool): State<SqlitePool>,
    State(identity): State<Identity>,
    ApiJson(body): ApiJson<RefreshBody>,
) -> AppResult<Json<DetailResponse>> {
    identity.tokens.invalidate(&db_pool, &body.required()?).await?;
    Ok(Json(DetailResponse {
        detail: "successfully logged out",
    }))
}

#[debug_handler(state = AppState)]
pub(crate) async fn protected(ApiUser(user): ApiUser) -> Json<UserResponse> {
    Json(UserResponse {
        user: AccountView::from(&user),
    })
}

#[debug_handler(state = AppState)]
pub(crate) async fn refresh(
    State(db_pool): State<SqlitePool>,
    State(identity): State<Identity>,
    ApiJson(body): ApiJson<RefreshBody>,
) -> AppResult<Json<AccessResponse>> {
    let access = identity.tokens.refresh(&db_pool, &body.required()?).await?;
    Ok(Json(AccessResponse { access }))
}
