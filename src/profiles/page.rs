use axum::{
    debug_handler,
    extract::State,
    response::Html,
};
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    index::topic_list,
    include_res,
    res::{self, escape, PagePath, PageResult},
    rooms::{msg, room_cards},
    session::MaybeUser,
    store::{messages, rooms, topics, users},
    AppError, AppState,
};

#[debug_handler(state = AppState)]
pub(crate) async fn profile(
    PagePath(profile_id): PagePath<Uuid>,
    State(db_pool): State<SqlitePool>,
    MaybeUser(viewer): MaybeUser,
    session: Session,
) -> PageResult<Html<String>> {
    let user = users::by_id(&db_pool, profile_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    let hosted = rooms::hosted_by(&db_pool, user.id).await?;
    let written = messages::by_user(&db_pool, user.id).await?;
    let topics = topics::all(&db_pool).await?;

    let edit = match &viewer {
        Some(viewer) if viewer.id == user.id => r#"<a href="/update_user">Edit profile</a>"#,
        _ => "",
    };

    let body = include_res!(str, "/pages/profile.html")
        .replace("{edit}", edit)
        .replace("{topics}", &topic_list(&topics))
        .replace("{rooms}", &room_cards(&db_pool, &hosted).await?)
        .replace("{messages}", &msg::activity_list(&written, viewer.as_ref()))
        .replace("{username}", &escape(&user.username));

    res::page(&session, viewer.as_ref(), &format!("@{}", user.username), &body).await
}
