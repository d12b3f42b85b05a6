use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor, SqlitePool};
use uuid::Uuid;

use super::{contains_ci, topics, Room, User, UserRef};
use crate::{access, appresult::FieldErrors, AppError, AppResult};

pub const NAME_MAX_CHARS: usize = 200;

const SELECT_ROOMS: &str = r#"
    SELECT r.id, r.name, r.description, r.created, r.updated,
           h.id AS host_id, h.username AS host_username,
           t.name AS topic_name
    FROM rooms r
    JOIN users h ON h.id = r.host_id
    LEFT JOIN topics t ON t.id = r.topic_id
"#;

#[derive(sqlx::FromRow)]
struct RoomRow {
    id: Uuid,
    name: String,
    description: String,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    host_id: Uuid,
    host_username: String,
    topic_name: Option<String>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            id: row.id,
            host: UserRef {
                id: row.host_id,
                username: row.host_username,
            },
            topic: row.topic_name,
            name: row.name,
            description: row.description,
            created: row.created,
            updated: row.updated,
        }
    }
}

/// Editable room fields. `topic` is looked up by name, created on demand.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub topic: Option<String>,
}

impl RoomFields {
    fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "This field is required.");
        } else if name.chars().count() > NAME_MAX_CHARS {
            errors.add("name", format!("Ensure this field has no more than {NAME_MAX_CHARS} characters."));
        }
        errors.into_result()
    }
}

pub async fn create(db_pool: &SqlitePool, host: &User, fields: RoomFields) -> AppResult<Room> {
    fields.validate()?;

    let id = Uuid::now_v7();
    let now = Utc::now();
    let mut tx = db_pool.begin().await?;

    let topic_id = match &fields.topic {
        Some(topic) => topics::get_or_create(&mut tx, topic).await?,
        None => None,
    };

    sqlx::query(
        r#"
        INSERT INTO rooms (id, host_id, topic_id, name, description, created, updated)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(host.id)
    .bind(topic_id)
    .bind(fields.name.trim())
    .bind(fields.description.trim())
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let room = get(&mut *tx, id).await?;
    tx.commit().await?;

    tracing::info!("{} opened room {:?} ({id})", host.username, room.name);
    Ok(room)
}

pub async fn find(db: impl SqliteExecutor<'_>, id: Uuid) -> AppResult<Option<Room>> {
    let row: Option<RoomRow> = sqlx::query_as(&format!("{SELECT_ROOMS} WHERE r.id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row.map(Room::from))
}

pub async fn get(db: impl SqliteExecutor<'_>, id: Uuid) -> AppResult<Room> {
    find(db, id).await?.ok_or(AppError::NotFound("room"))
}

/// Host-only edit. Ownership is settled before the fields are looked at.
pub async fn update(db_pool: &SqlitePool, actor: &User, id: Uuid, fields: RoomFields) -> AppResult<Room> {
    let mut tx = db_pool.begin().await?;

    let room = get(&mut *tx, id).await?;
    access::ensure_owner(actor.id, room.host.id)?;
    fields.validate()?;

    let topic_id = match &fields.topic {
        Some(topic) => topics::get_or_create(&mut tx, topic).await?,
        None => None,
    };

    sqlx::query("UPDATE rooms SET name = ?, description = ?, topic_id = ?, updated = ? WHERE id = ?")
        .bind(fields.name.trim())
        .bind(fields.description.trim())
        .bind(topic_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let room = get(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(room)
}

/// Host-only delete; messages and participant rows go with the room.
pub async fn delete(db_pool: &SqlitePool, actor: &User, id: Uuid) -> AppResult<()> {
    let mut tx = db_pool.begin().await?;

    let room = get(&mut *tx, id).await?;
    access::ensure_owner(actor.id, room.host.id)?;

    sqlx::query("DELETE FROM rooms WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!("{} deleted room {:?} ({id})", actor.username, room.name);
    Ok(())
}

/// Idempotent: a second insert for the same pair is ignored.
pub async fn add_participant(conn: &mut SqliteConnection, room_id: Uuid, user_id: Uuid) -> AppResult<()> {
    sqlx::query("INSERT OR IGNORE INTO room_participants (room_id, user_id) VALUES (?, ?)")
        .bind(room_id)
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn participants(db_pool: &SqlitePool, room_id: Uuid) -> AppResult<Vec<UserRef>> {
    Ok(sqlx::query_as(
        r#"
        SELECT u.id, u.username
        FROM room_participants p
        JOIN users u ON u.id = p.user_id
        WHERE p.room_id = ?
        ORDER BY p.rowid
        "#,
    )
    .bind(room_id)
    .fetch_all(db_pool)
    .await?)
}

/// Participants of several rooms in one query, keyed by room. Rooms nobody
/// has posted in are absent from the map.
pub async fn participants_of(db_pool: &SqlitePool, room_ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<UserRef>>> {
    let mut by_room: HashMap<Uuid, Vec<UserRef>> = HashMap::new();
    if room_ids.is_empty() {
        return Ok(by_room);
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT p.room_id, u.id, u.username FROM room_participants p \
         JOIN users u ON u.id = p.user_id WHERE p.room_id IN (",
    );
    let mut ids = query.separated(", ");
    for id in room_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ORDER BY p.rowid");

    let rows: Vec<(Uuid, Uuid, String)> = query.build_query_as().fetch_all(db_pool).await?;
    for (room_id, id, username) in rows {
        by_room.entry(room_id).or_default().push(UserRef { id, username });
    }
    Ok(by_room)
}

/// Rooms whose name, description or topic name contains `query`, ignoring
/// case, in creation order. An empty query returns every room.
pub async fn search(db_pool: &SqlitePool, query: &str) -> AppResult<Vec<Room>> {
    // filtered by `contains_ci` rather than `LIKE`
    let rows: Vec<RoomRow> = sqlx::query_as(&format!("{SELECT_ROOMS} ORDER BY r.rowid"))
        .fetch_all(db_pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(Room::from)
        .filter(|room| {
            contains_ci(&room.name, query)
                || contains_ci(&room.description, query)
                || room.topic.as_deref().is_some_and(|topic| contains_ci(topic, query))
        })
        .collect())
}

pub async fn hosted_by(db_pool: &SqlitePool, user_id: Uuid) -> AppResult<Vec<Room>> {
    let rows: Vec<RoomRow> = sqlx::query_as(&format!("{SELECT_ROOMS} WHERE r.host_id = ? ORDER BY r.rowid"))
        .bind(user_id)
        .fetch_all(db_pool)
        .await?;
    Ok(rows.into_iter().map(Room::from).collect())
}
