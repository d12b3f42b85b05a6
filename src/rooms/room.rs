use axum::{
    debug_handler,
    extract::State,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    access, include_res,
    res::{self, escape, PagePath, PageResult},
    session::{self, CurrentUser},
    store::{messages, rooms},
    AppError, AppState,
};

use super::msg;

#[debug_handler(state = AppState)]
pub(crate) async fn room(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PagePath(room_id): PagePath<Uuid>,
) -> PageResult<Html<String>> {
    let room = rooms::get(&db_pool, room_id).await?;
    let comments = messages::in_room(&db_pool, room_id).await?;
    let participants = rooms::participants(&db_pool, room_id).await?;

    let messages: String = comments
        .iter()
        .map(|message| msg::msg_to_html(message, Some(&user)))
        .collect();
    let participant_items: String = participants
        .iter()
        .map(|participant| {
            include_res!(str, "/pages/participant_item.html")
                .replace("{id}", &participant.id.to_string())
                .replace("{username}", &escape(&participant.username))
        })
        .collect();
    let host_actions = if access::can_modify(user.id, room.host.id) {
        format!(r#"<a href="/edit_room/{room_id}">Edit</a> <a href="/delete_room/{room_id}">Delete</a>"#)
    } else {
        String::new()
    };

    let body = include_res!(str, "/pages/room.html")
        .replace("{id}", &room_id.to_string())
        .replace("{host_id}", &room.host.id.to_string())
        .replace("{host}", &escape(&room.host.username))
        .replace("{topic}", &escape(room.topic.as_deref().unwrap_or("No topic")))
        .replace("{created}", &res::timestamp(room.created))
        .replace("{host_actions}", &host_actions)
        .replace("{participant_count}", &participants.len().to_string())
        .replace("{participants}", &participant_items)
        .replace("{name}", &escape(&room.name))
        .replace("{description}", &escape(&room.description))
        .replace("{messages}", &messages);

    res::page(&session, Some(&user), &room.name, &body).await
}

#[derive(Deserialize)]
pub(crate) struct PostMessageForm {
    #[serde(default)]
    body: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn post_message(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PagePath(room_id): PagePath<Uuid>,
    Form(PostMessageForm { body }): Form<PostMessageForm>,
) -> PageResult<Redirect> {
    match messages::post(&db_pool, &user, room_id, &body).await {
        Ok(_) => {}
        Err(AppError::Validation(_)) => session::flash(&session, "Your message is empty.").await?,
        Err(e) => return Err(e.into()),
    }
    Ok(Redirect::to(&format!("/room/{room_id}")))
}
