use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use super::User;
use crate::AppResult;

pub async fn insert(
    db_pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, email, password_hash, created)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, username, email, password_hash, created
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(db_pool)
    .await?;

    Ok(user)
}

pub async fn by_id(db: impl SqliteExecutor<'_>, id: Uuid) -> AppResult<Option<User>> {
    Ok(
        sqlx::query_as("SELECT id, username, email, password_hash, created FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await?,
    )
}

pub async fn by_username(db_pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
    Ok(
        sqlx::query_as("SELECT id, username, email, password_hash, created FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(db_pool)
            .await?,
    )
}

/// Whether `username` belongs to anyone other than `except`.
pub async fn username_taken(
    db_pool: &SqlitePool,
    username: &str,
    except: Option<Uuid>,
) -> AppResult<bool> {
    let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(db_pool)
        .await?;

    Ok(matches!(found, Some((id,)) if Some(id) != except))
}

pub async fn update_profile(
    db_pool: &SqlitePool,
    id: Uuid,
    username: &str,
    email: &str,
) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET username = ?, email = ?
        WHERE id = ?
        RETURNING id, username, email, password_hash, created
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(id)
    .fetch_optional(db_pool)
    .await?;

    user.ok_or(crate::AppError::NotFound("user"))
}
