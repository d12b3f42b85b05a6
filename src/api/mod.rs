//! The JSON surface, mounted under `/api` and authenticated with bearer
//! tokens.

mod auth;
mod browse;
pub mod extract;
mod rooms;
pub mod types;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/protected", get(auth::protected))
        .route("/token/refresh", post(auth::refresh))
        .route("/createroom", post(rooms::create_room))
        .route(
            "/room/{id}",
            get(rooms::room)
                .post(rooms::post_message)
                .put(rooms::update_room)
                .delete(rooms::delete_room),
        )
        .route("/message/{id}", delete(rooms::delete_message))
        .route("/user/{id}", get(browse::user_profile))
        .route("/rooms", get(browse::search_rooms))
        .route("/topics", get(browse::search_topics))
        .route("/activity", get(browse::activity))
        .route("/fixtures/{sport}", get(browse::fixtures))
}
