use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    store::{
        messages,
        rooms::{self, RoomFields},
    },
    AppError, AppResult, AppState,
};

use super::{
    extract::{ApiJson, ApiPath, ApiUser},
    types::{self, MessageView, RoomDetail, RoomView},
};

#[derive(Deserialize)]
pub(crate) struct MessageBody {
    body: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn create_room(
    State(db_pool): State<SqlitePool>,
    ApiUser(user): ApiUser,
    ApiJson(fields): ApiJson<RoomFields>,
) -> AppResult<(StatusCode, Json<RoomView>)> {
    let room = rooms::create(&db_pool, &user, fields).await?;
    Ok((StatusCode::CREATED, Json(types::room_view(&db_pool, room).await?)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn room(State(db_pool): State<SqlitePool>, ApiPath(room_id): ApiPath<Uuid>) -> AppResult<Json<RoomDetail>> {
    let room = rooms::get(&db_pool, room_id).await?;
    let messages = messages::in_room(&db_pool, room_id).await?;
    Ok(Json(types::room_detail(&db_pool, room, messages).await?))
}

#[debug_handler(state = AppState)]
pub(crate) async fn post_message(
    State(db_pool): State<SqlitePool>,
    ApiUser(user): ApiUser,
    ApiPath(room_id): ApiPath<Uuid>,
    ApiJson(MessageBody { body }): ApiJson<MessageBody>,
) -> AppResult<(StatusCode, Json<MessageView>)> {
    // an absent room outranks an absent body
    rooms::get(&db_pool, room_id).await?;
    let body = body.ok_or_else(|| AppError::invalid("body", "This field is required."))?;

    let message = messages::post(&db_pool, &user, room_id, &body).await?;
    Ok((StatusCode::CREATED, Json(types::message_view(message))))
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_room(
    State(db_pool): State<SqlitePool>,
    ApiUser(user): ApiUser,
    ApiPath(room_id): ApiPath<Uuid>,
    ApiJson(fields): ApiJson<RoomFields>,
) -> AppResult<Json<RoomView>> {
    let room = rooms::update(&db_pool, &user, room_id, fields).await?;
    Ok(Json(types::room_view(&db_pool, room).await?))
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_room(
    State(db_pool): State<SqlitePool>,
    ApiUser(user): ApiUser,
    ApiPath(room_id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    rooms::delete(&db_pool, &user, room_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_message(
    State(db_pool): State<SqlitePool>,
    ApiUser(user): ApiUser,
    ApiPath(message_id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    messages::delete(&db_pool, &user, message_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
