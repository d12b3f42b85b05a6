use chrono::{DateTime, Utc};
use futures_util::{future, StreamExt, TryStreamExt};
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use super::{contains_ci, rooms, Message, User, UserRef};
use crate::{access, AppError, AppResult};

/// How many messages the activity feeds show.
pub const RECENT_LIMIT: usize = 3;

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    body: String,
    created: DateTime<Utc>,
    room_id: Uuid,
    room_name: String,
    user_id: Uuid,
    username: String,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.id,
            user: UserRef {
                id: row.user_id,
                username: row.username,
            },
            room_id: row.room_id,
            room_name: row.room_name,
            body: row.body,
            created: row.created,
        }
    }
}

/// Posts into a room and records the author as a participant.
pub async fn post(db_pool: &SqlitePool, author: &User, room_id: Uuid, body: &str) -> AppResult<Message> {
    let body = body.trim();
    if body.is_empty() {
        return Err(AppError::invalid("body", "This field is required."));
    }

    let mut tx = db_pool.begin().await?;
    rooms::get(&mut *tx, room_id).await?;

    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO messages (id, user_id, room_id, body, created) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(author.id)
        .bind(room_id)
        .bind(body)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
    rooms::add_participant(&mut tx, room_id, author.id).await?;

    let message = get(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(message)
}

pub async fn find(db: impl SqliteExecutor<'_>, id: Uuid) -> AppResult<Option<Message>> {
    let row: Option<MessageRow> = sqlx::query_as(
        r#"
        SELECT m.id, m.body, m.created, r.id AS room_id, r.name AS room_name,
               u.id AS user_id, u.username
        FROM messages m
        JOIN rooms r ON r.id = m.room_id
        JOIN users u ON u.id = m.user_id
        WHERE m.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row.map(Message::from))
}

pub async fn get(db: impl SqliteExecutor<'_>, id: Uuid) -> AppResult<Message> {
    find(db, id).await?.ok_or(AppError::NotFound("message"))
}

/// Author-only delete. Returns the deleted message.
pub async fn delete(db_pool: &SqlitePool, actor: &User, id: Uuid) -> AppResult<Message> {
    let mut tx = db_pool.begin().await?;

    let message = get(&mut *tx, id).await?;
    access::ensure_owner(actor.id, message.user.id)?;

    sqlx::query("DELETE FROM messages WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!("{} deleted message {id} in room {}", actor.username, message.room_id);
    Ok(message)
}

/// A room's conversation, oldest first.
pub async fn in_room(db_pool: &SqlitePool, room_id: Uuid) -> AppResult<Vec<Message>> {
    let rows: Vec<MessageRow> = sqlx::query_as(
        r#"
        SELECT m.id, m.body, m.created, r.id AS room_id, r.name AS room_name,
               u.id AS user_id, u.username
        FROM messages m
        JOIN rooms r ON r.id = m.room_id
        JOIN users u ON u.id = m.user_id
        WHERE m.room_id = ?
        ORDER BY m.created, m.rowid
        "#,
    )
    .bind(room_id)
    .fetch_all(db_pool)
    .await?;
    Ok(rows.into_iter().map(Message::from).collect())
}

/// Everything a user has written, newest first.
pub async fn by_user(db_pool: &SqlitePool, user_id: Uuid) -> AppResult<Vec<Message>> {
    let rows: Vec<MessageRow> = sqlx::query_as(
        r#"
        SELECT m.id, m.body, m.created, r.id AS room_id, r.name AS room_name,
               u.id AS user_id, u.username
        FROM messages m
        JOIN rooms r ON r.id = m.room_id
        JOIN users u ON u.id = m.user_id
        WHERE m.user_id = ?
        ORDER BY m.created DESC, m.rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await?;
    Ok(rows.into_iter().map(Message::from).collect())
}

/// The `limit` newest messages whose room name contains `query` (ignoring
/// case). Equal timestamps fall back to insertion order, later first.
pub async fn recent(db_pool: &SqlitePool, query: &str, limit: usize) -> AppResult<Vec<Message>> {
    let messages = sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT m.id, m.body, m.created, r.id AS room_id, r.name AS room_name,
               u.id AS user_id, u.username
        FROM messages m
        JOIN rooms r ON r.id = m.room_id
        JOIN users u ON u.id = m.user_id
        ORDER BY m.created DESC, m.rowid DESC
        "#,
    )
    // streamed newest first and filtered by `contains_ci`, stopping at `limit`
    .fetch(db_pool)
    .map_ok(Message::from)
    .try_filter(|message| future::ready(contains_ci(&message.room_name, query)))
    .take(limit)
    .try_collect::<Vec<_>>()
    .await?;

    Ok(messages)
}
