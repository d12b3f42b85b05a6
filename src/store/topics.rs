use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::{contains_ci, Topic};
use crate::AppResult;

const SELECT_TOPICS: &str = r#"
    SELECT t.id, t.name,
           (SELECT COUNT(*) FROM rooms r WHERE r.topic_id = t.id) AS room_count
    FROM topics t
    ORDER BY t.rowid
"#;

/// Finds the topic named exactly `name` (the earliest one if several exist)
/// or creates it. A blank name means "no topic".
pub async fn get_or_create(conn: &mut SqliteConnection, name: &str) -> AppResult<Option<Uuid>> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }

    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM topics WHERE name = ? ORDER BY rowid LIMIT 1")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;
    if let Some((id,)) = existing {
        return Ok(Some(id));
    }

    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO topics (id, name, created) VALUES (?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

    tracing::debug!("created topic {name:?}");
    Ok(Some(id))
}

pub async fn all(db_pool: &SqlitePool) -> AppResult<Vec<Topic>> {
    Ok(sqlx::query_as(SELECT_TOPICS).fetch_all(db_pool).await?)
}

/// Topics whose name contains `query`, ignoring case.
pub async fn matching(db_pool: &SqlitePool, query: &str) -> AppResult<Vec<Topic>> {
    let mut topics = all(db_pool).await?;
    topics.retain(|topic| contains_ci(&topic.name, query));
    Ok(topics)
}
