use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    appresult::FieldErrors,
    identity::Identity,
    include_res,
    res::{self, escape, PageResult},
    session::CurrentUser,
    store::User,
    AppError, AppState,
};

#[derive(Deserialize)]
pub(crate) struct ProfileForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
}

async fn profile_form(
    session: &Session,
    user: &User,
    form: &ProfileForm,
    errors: &FieldErrors,
) -> PageResult<Html<String>> {
    let body = include_res!(str, "/pages/update_user.html")
        .replace("{errors}", &res::field_errors(errors))
        .replace("{user_id}", &user.id.to_string())
        .replace("{username}", &escape(&form.username))
        .replace("{email}", &escape(&form.email));
    res::page(session, Some(user), "Edit profile", &body).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_user_page(CurrentUser(user): CurrentUser, session: Session) -> PageResult<Html<String>> {
    let form = ProfileForm {
        username: user.username.clone(),
        email: user.email.clone(),
    };
    profile_form(&session, &user, &form, &FieldErrors::new()).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_user(
    State(db_pool): State<SqlitePool>,
    State(identity): State<Identity>,
    CurrentUser(user): CurrentUser,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> PageResult<Response> {
    match identity.update_profile(&db_pool, &user, &form.username, &form.email).await {
        Ok(updated) => Ok(Redirect::to(&format!("/user_profile/{}", updated.id)).into_response()),
        Err(AppError::Validation(errors)) => Ok(profile_form(&session, &user, &form, &errors).await?.into_response()),
        Err(e) => Err(e.into()),
    }
}
