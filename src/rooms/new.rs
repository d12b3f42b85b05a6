use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    appresult::FieldErrors,
    include_res,
    res::{self, escape, PageResult},
    session::{self, CurrentUser},
    store::{
        rooms::{self, RoomFields},
        topics, User,
    },
    AppError, AppState,
};

/// The create/edit form, filled with `fields`.
pub(super) async fn room_form(
    db_pool: &SqlitePool,
    session: &Session,
    user: &User,
    heading: &str,
    action: &str,
    fields: &RoomFields,
    errors: &FieldErrors,
) -> PageResult<Html<String>> {
    let topic_options: String = topics::all(db_pool)
        .await?
        .iter()
        .map(|topic| format!(r#"<option value="{}">"#, escape(&topic.name)))
        .collect();

    let body = include_res!(str, "/pages/room_form.html")
        .replace("{heading}", heading)
        .replace("{action}", action)
        .replace("{cancel}", "/")
        .replace("{errors}", &res::field_errors(errors))
        .replace("{topic_options}", &topic_options)
        .replace("{topic}", &escape(fields.topic.as_deref().unwrap_or_default()))
        .replace("{name}", &escape(&fields.name))
        .replace("{description}", &escape(&fields.description));

    res::page(session, Some(user), heading, &body).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_room_page(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    session: Session,
) -> PageResult<Html<String>> {
    room_form(
        &db_pool,
        &session,
        &user,
        "Create room",
        "/create_room",
        &RoomFields::default(),
        &FieldErrors::new(),
    )
    .await
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_room(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    session: Session,
    Form(fields): Form<RoomFields>,
) -> PageResult<Response> {
    match rooms::create(&db_pool, &user, fields.clone()).await {
        Ok(room) => {
            session::flash(&session, format!("Room \"{}\" is open.", room.name)).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(AppError::Validation(errors)) => Ok(room_form(
            &db_pool,
            &session,
            &user,
            "Create room",
            "/create_room",
            &fields,
            &errors,
        )
        .await?
        .into_response()),
        Err(e) => Err(e.into()),
    }
}
