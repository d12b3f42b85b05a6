//! The browsing pages: room feeds, topics and recent activity.

use axum::{
    debug_handler,
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    include_res,
    res::{self, escape, PageResult},
    rooms::{msg, room_cards},
    session::MaybeUser,
    store::{
        messages::{self, RECENT_LIMIT},
        rooms, topics, Topic,
    },
    AppState,
};

/// How many topics the feed sidebar lists.
pub const FEED_TOPICS: usize = 5;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/politics", get(politics))
        .route("/entertainment", get(entertainment))
        .route("/topics", get(topic_page))
        .route("/activity", get(activity))
}

#[derive(Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    q: String,
}

pub(crate) fn topic_list(topics: &[Topic]) -> String {
    topics
        .iter()
        .map(|topic| {
            let query = serde_urlencoded::to_string([("q", topic.name.as_str())]).unwrap_or_default();
            include_res!(str, "/pages/topic_item.html")
                .replace("{query}", &escape(&query))
                .replace("{room_count}", &topic.room_count.to_string())
                .replace("{name}", &escape(&topic.name))
        })
        .collect()
}

async fn feed(
    db_pool: &SqlitePool,
    session: &Session,
    viewer: MaybeUser,
    heading: &str,
    q: &str,
) -> PageResult<Html<String>> {
    let MaybeUser(viewer) = viewer;

    let rooms = rooms::search(db_pool, q).await?;
    let mut topics = topics::all(db_pool).await?;
    topics.truncate(FEED_TOPICS);
    let recent = messages::recent(db_pool, q, RECENT_LIMIT).await?;

    let body = include_res!(str, "/pages/feed.html")
        .replace("{heading}", heading)
        .replace("{room_count}", &rooms.len().to_string())
        .replace("{topics}", &topic_list(&topics))
        .replace("{rooms}", &room_cards(db_pool, &rooms).await?)
        .replace("{activity}", &msg::activity_list(&recent, viewer.as_ref()))
        .replace("{q}", &escape(q));

    res::page(session, viewer.as_ref(), heading, &body).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn home(
    State(db_pool): State<SqlitePool>,
    viewer: MaybeUser,
    session: Session,
    Query(SearchQuery { q }): Query<SearchQuery>,
) -> PageResult<Html<String>> {
    feed(&db_pool, &session, viewer, "Study rooms", &q).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn politics(
    State(db_pool): State<SqlitePool>,
    viewer: MaybeUser,
    session: Session,
    Query(SearchQuery { q }): Query<SearchQuery>,
) -> PageResult<Html<String>> {
    feed(&db_pool, &session, viewer, "Politics", &q).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn entertainment(
    State(db_pool): State<SqlitePool>,
    viewer: MaybeUser,
    session: Session,
    Query(SearchQuery { q }): Query<SearchQuery>,
) -> PageResult<Html<String>> {
    feed(&db_pool, &session, viewer, "Entertainment", &q).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn topic_page(
    State(db_pool): State<SqlitePool>,
    MaybeUser(viewer): MaybeUser,
    session: Session,
    Query(SearchQuery { q }): Query<SearchQuery>,
) -> PageResult<Html<String>> {
    let topics = topics::matching(&db_pool, &q).await?;
    let body = include_res!(str, "/pages/topics.html")
        .replace("{topics}", &topic_list(&topics))
        .replace("{q}", &escape(&q));
    res::page(&session, viewer.as_ref(), "Topics", &body).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn activity(
    State(db_pool): State<SqlitePool>,
    MaybeUser(viewer): MaybeUser,
    session: Session,
    Query(SearchQuery { q }): Query<SearchQuery>,
) -> PageResult<Html<String>> {
    let recent = messages::recent(&db_pool, &q, RECENT_LIMIT).await?;
    let body = include_res!(str, "/pages/activity.html")
        .replace("{items}", &msg::activity_list(&recent, viewer.as_ref()))
        .replace("{q}", &escape(&q));
    res::page(&session, viewer.as_ref(), "Recent activity", &body).await
}
