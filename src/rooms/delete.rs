use axum::{
    debug_handler,
    extract::State,
    response::{Html, Redirect},
};
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    access, include_res,
    res::{self, escape, PagePath, PageResult},
    session::{self, CurrentUser},
    store::{messages, rooms, User},
    AppState,
};

async fn confirm_page(
    session: &Session,
    user: &User,
    object: &str,
    action: &str,
    cancel: &str,
) -> PageResult<Html<String>> {
    let body = include_res!(str, "/pages/delete.html")
        .replace("{action}", action)
        .replace("{cancel}", cancel)
        .replace("{object}", &escape(object));
    res::page(session, Some(user), "Delete", &body).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_room_page(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PagePath(room_id): PagePath<Uuid>,
) -> PageResult<Html<String>> {
    let room = rooms::get(&db_pool, room_id).await?;
    access::ensure_owner(user.id, room.host.id)?;

    let action = format!("/delete_room/{room_id}");
    let cancel = format!("/room/{room_id}");
    confirm_page(&session, &user, &room.name, &action, &cancel).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_room(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PagePath(room_id): PagePath<Uuid>,
) -> PageResult<Redirect> {
    rooms::delete(&db_pool, &user, room_id).await?;
    session::flash(&session, "Room deleted.").await?;
    Ok(Redirect::to("/"))
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_message_page(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PagePath(message_id): PagePath<Uuid>,
) -> PageResult<Html<String>> {
    let message = messages::get(&db_pool, message_id).await?;
    access::ensure_owner(user.id, message.user.id)?;

    let action = format!("/delete_message/{message_id}");
    let cancel = format!("/room/{}", message.room_id);
    confirm_page(&session, &user, &message.body, &action, &cancel).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_message(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    PagePath(message_id): PagePath<Uuid>,
) -> PageResult<Redirect> {
    let message = messages::delete(&db_pool, &user, message_id).await?;
    Ok(Redirect::to(&format!("/room/{}", message.room_id)))
}
