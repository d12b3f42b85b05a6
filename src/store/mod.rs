//! Relational store for users, topics, rooms and messages.
//!
//! Every operation takes the pool (or an open transaction) plus the acting
//! user explicitly; nothing here reads request-bound state.

pub mod messages;
pub mod rooms;
pub mod topics;
pub mod users;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use uuid::Uuid;

/// Opens (creating if needed) the database at `url` and applies migrations.
pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&db_pool).await?;
    Ok(db_pool)
}

/// A private in-memory database. Held on a single connection that is never
/// recycled, since each SQLite memory connection is its own database.
pub async fn memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&db_pool).await?;
    Ok(db_pool)
}

/// Case-insensitive substring test. An empty needle matches everything.
///
/// Searches filter with this instead of SQL `LIKE`: SQLite's `LIKE` folds
/// ASCII case only, and `%` or `_` in user input would act as wildcards.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// The public face of a user: enough to link to them, nothing secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct UserRef {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created: DateTime<Utc>,
}

impl User {
    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Topic {
    pub id: Uuid,
    pub name: String,
    pub room_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: Uuid,
    pub host: UserRef,
    pub topic: Option<String>,
    pub name: String,
    pub description: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub user: UserRef,
    pub room_id: Uuid,
    pub room_name: String,
    pub body: String,
    pub created: DateTime<Utc>,
}
