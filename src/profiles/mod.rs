mod page;
mod update;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user_profile/{id}", get(page::profile))
        .route("/update_user", get(update::update_user_page).post(update::update_user))
}
