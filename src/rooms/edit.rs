use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    access,
    appresult::FieldErrors,
    res::{PagePath, PageResult},
    session::CurrentUser,
    store::rooms::{self, RoomFields},
    AppError, AppState,
};

use super::new::room_form;

#[debug_handler(state = AppState)]
pub(crate) async fn edit_room_page(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PagePath(room_id): PagePath<Uuid>,
) -> PageResult<Html<String>> {
    let room = rooms::get(&db_pool, room_id).await?;
    access::ensure_owner(user.id, room.host.id)?;

    let fields = RoomFields {
        name: room.name,
        description: room.description,
        topic: room.topic,
    };
    let action = format!("/edit_room/{room_id}");
    room_form(&db_pool, &session, &user, "Edit room", &action, &fields, &FieldErrors::new()).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn edit_room(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PagePath(room_id): PagePath<Uuid>,
    Form(fields): Form<RoomFields>,
) -> PageResult<Response> {
    match rooms::update(&db_pool, &user, room_id, fields.clone()).await {
        Ok(room) => Ok(Redirect::to(&format!("/room/{}", room.id)).into_response()),
        Err(AppError::Validation(errors)) => {
            let action = format!("/edit_room/{room_id}");
            Ok(room_form(&db_pool, &session, &user, "Edit room", &action, &fields, &errors)
                .await?
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
