mod delete;
mod edit;
pub(crate) mod msg;
mod new;
mod room;

use axum::{routing::get, Router};
use sqlx::SqlitePool;

use crate::{
    include_res,
    res::{self, escape},
    store::{rooms, Room},
    AppResult, AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/room/{id}", get(room::room).post(room::post_message))
        .route("/create_room", get(new::new_room_page).post(new::new_room))
        .route("/edit_room/{id}", get(edit::edit_room_page).post(edit::edit_room))
        .route("/delete_room/{id}", get(delete::delete_room_page).post(delete::delete_room))
        .route("/delete_message/{id}", get(delete::delete_message_page).post(delete::delete_message))
}

/// Renders the cards for a room listing.
pub(crate) async fn room_cards(db_pool: &SqlitePool, rooms: &[Room]) -> AppResult<String> {
    if rooms.is_empty() {
        return Ok(r#"<p class="muted">No rooms here yet.</p>"#.to_owned());
    }

    let ids: Vec<_> = rooms.iter().map(|room| room.id).collect();
    let participants = rooms::participants_of(db_pool, &ids).await?;

    let mut cards = String::new();
    for room in rooms {
        let participant_count = participants.get(&room.id).map_or(0, Vec::len);
        cards += &include_res!(str, "/pages/room_item.html")
            .replace("{id}", &room.id.to_string())
            .replace("{host_id}", &room.host.id.to_string())
            .replace("{host}", &escape(&room.host.username))
            .replace("{created}", &res::timestamp(room.created))
            .replace("{participant_count}", &participant_count.to_string())
            .replace("{topic}", &escape(room.topic.as_deref().unwrap_or("No topic")))
            .replace("{name}", &escape(&room.name))
            .replace("{description}", &escape(&room.description));
    }
    Ok(cards)
}
