use axum::{
    debug_handler,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    identity::Identity,
    include_res,
    res::{self, PageResult},
    session::{self, MaybeUser, RETURN_URL, USER_ID},
    AppState,
};

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) return_url: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn login_page(
    MaybeUser(user): MaybeUser,
    Query(LoginQuery { return_url }): Query<LoginQuery>,
    session: Session,
) -> PageResult<Response> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    if let Some(return_url) = return_url.as_deref().and_then(session::safe_return_url) {
        session.insert(RETURN_URL, return_url).await?;
    }

    Ok(res::page(&session, None, "Login", include_res!(str, "/pages/login.html"))
        .await?
        .into_response())
}

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    State(identity): State<Identity>,
    session: Session,
    Form(LoginForm { username, password }): Form<LoginForm>,
) -> PageResult<Redirect> {
    let Some(user) = identity.authenticate(&db_pool, &username, &password).await? else {
        session::flash(&session, "Username or password does not exist.").await?;
        return Ok(Redirect::to("/login"));
    };

    let return_url: Option<String> = session.remove(RETURN_URL).await?;

    session.cycle_id().await?;
    session.insert(USER_ID, user.id).await?;
    tracing::info!("welcome @{} ({})", user.username, user.id);

    let return_url = return_url.as_deref().and_then(session::safe_return_url).unwrap_or("/");
    Ok(Redirect::to(return_url))
}
