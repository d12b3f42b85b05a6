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
    identity::{Identity, Registration},
    include_res,
    res::{self, escape, PageResult},
    session::{self, MaybeUser},
    AppError, AppState,
};

async fn register_form(session: &Session, registration: &Registration, errors: &FieldErrors) -> PageResult<Html<String>> {
    let body = include_res!(str, "/pages/register.html")
        .replace("{errors}", &res::field_errors(errors))
        .replace("{username}", &escape(&registration.username))
        .replace("{email}", &escape(&registration.email));
    res::page(session, None, "Sign up", &body).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn register_page(MaybeUser(user): MaybeUser, session: Session) -> PageResult<Response> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    Ok(register_form(&session, &Registration::default(), &FieldErrors::new())
        .await?
        .into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn register(
    State(db_pool): State<SqlitePool>,
    State(identity): State<Identity>,
    session: Session,
    Form(registration): Form<Registration>,
) -> PageResult<Response> {
    match identity.register(&db_pool, registration.clone()).await {
        Ok(user) => {
            session::flash(&session, format!("Welcome, {}! You can log in now.", user.username)).await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(AppError::Validation(errors)) => {
            session::flash(&session, "An error occurred during registration.").await?;
            Ok(register_form(&session, &registration, &errors).await?.into_response())
        }
        Err(e) => Err(e.into()),
    }
}
