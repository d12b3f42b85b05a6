use axum::{
    debug_handler,
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    sports::{Fixture, Sport},
    store::{
        messages::{self, RECENT_LIMIT},
        rooms, topics, users, Topic,
    },
    AppError, AppResult, AppState,
};

use super::{
    extract::ApiPath,
    types::{self, MessageView, ProfileView, RoomView},
};

#[derive(Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn user_profile(
    State(db_pool): State<SqlitePool>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> AppResult<Json<ProfileView>> {
    let user = users::by_id(&db_pool, user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    let hosted = rooms::hosted_by(&db_pool, user.id).await?;
    let written = messages::by_user(&db_pool, user.id).await?;

    Ok(Json(ProfileView {
        id: user.id,
        username: user.username,
        email: user.email,
        rooms: types::room_views(&db_pool, hosted).await?,
        messages: written.into_iter().map(types::message_view).collect(),
        topics: topics::all(&db_pool).await?,
    }))
}

#[debug_handler(state = AppState)]
pub(crate) async fn search_rooms(
    State(db_pool): State<SqlitePool>,
    Query(SearchQuery { q }): Query<SearchQuery>,
) -> AppResult<Json<Vec<RoomView>>> {
    let rooms = rooms::search(&db_pool, &q).await?;
    Ok(Json(types::room_views(&db_pool, rooms).await?))
}

#[debug_handler(state = AppState)]
pub(crate) async fn search_topics(
    State(db_pool): State<SqlitePool>,
    Query(SearchQuery { q }): Query<SearchQuery>,
) -> AppResult<Json<Vec<Topic>>> {
    Ok(Json(topics::matching(&db_pool, &q).await?))
}

#[debug_handler(state = AppState)]
pub(crate) async fn activity(
    State(db_pool): State<SqlitePool>,
    Query(SearchQuery { q }): Query<SearchQuery>,
) -> AppResult<Json<Vec<MessageView>>> {
    let recent = messages::recent(&db_pool, &q, RECENT_LIMIT).await?;
    Ok(Json(recent.into_iter().map(types::message_view).collect()))
}

#[debug_handler(state = AppState)]
pub(crate) async fn fixtures(ApiPath(sport): ApiPath<String>) -> AppResult<Json<&'static [Fixture]>> {
    let sport: Sport = sport.parse()?;
    Ok(Json(sport.fixtures()))
}
