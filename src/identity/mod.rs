//! Accounts and credentials: registration, password checks, profile edits
//! and bearer tokens.

pub mod tokens;

use std::sync::Arc;

use serde::Deserialize;
use sqlx::SqlitePool;

pub use tokens::{TokenPair, Tokens};

use crate::{
    appresult::FieldErrors,
    store::{users, User},
    AppResult,
};

pub const USERNAME_MAX_CHARS: usize = 150;
pub const PASSWORD_MIN_CHARS: usize = 6;

#[derive(Clone)]
pub struct Identity {
    pub tokens: Arc<Tokens>,
    pub password_cost: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Usernames are stored lower-cased.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

fn check_username(errors: &mut FieldErrors, username: &str) {
    if username.is_empty() {
        errors.add("username", "This field is required.");
    } else if username.chars().count() > USERNAME_MAX_CHARS {
        errors.add("username", format!("Ensure this field has no more than {USERNAME_MAX_CHARS} characters."));
    } else if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if !email.is_empty() && !email.contains('@') {
        errors.add("email", "Enter a valid email address.");
    }
}

fn check_password(errors: &mut FieldErrors, username: &str, password: &str) {
    if password.chars().count() < PASSWORD_MIN_CHARS {
        errors.add(
            "password",
            format!("This password is too short. It must contain at least {PASSWORD_MIN_CHARS} characters."),
        );
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.add("password", "This password is entirely numeric.");
    }
    if !username.is_empty() && password.to_lowercase() == username {
        errors.add("password", "The password is too similar to the username.");
    }
}

impl Identity {
    pub fn new(tokens: Tokens, password_cost: u32) -> Self {
        Self {
            tokens: Arc::new(tokens),
            password_cost,
        }
    }

    pub async fn register(&self, db_pool: &SqlitePool, registration: Registration) -> AppResult<User> {
        let username = normalize_username(&registration.username);
        let email = registration.email.trim();

        let mut errors = FieldErrors::new();
        check_username(&mut errors, &username);
        check_email(&mut errors, email);
        check_password(&mut errors, &username, &registration.password);
        if registration.password != registration.confirm_password {
            errors.add("password", "Password fields didn't match.");
        }
        if errors.get("username").is_none() && users::username_taken(db_pool, &username, None).await? {
            errors.add("username", "A user with that username already exists.");
        }
        errors.into_result()?;

        let password_hash = bcrypt::hash(&registration.password, self.password_cost)?;
        let user = users::insert(db_pool, &username, email, &password_hash).await?;

        tracing::info!("registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// `None` for an unknown user or a wrong password alike.
    pub async fn authenticate(&self, db_pool: &SqlitePool, username: &str, password: &str) -> AppResult<Option<User>> {
        let username = normalize_username(username);
        let Some(user) = users::by_username(db_pool, &username).await? else {
            tracing::warn!("login attempt for unknown user {username:?}");
            return Ok(None);
        };

        if bcrypt::verify(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            tracing::warn!("wrong password for {username:?}");
            Ok(None)
        }
    }

    pub async fn update_profile(
        &self,
        db_pool: &SqlitePool,
        actor: &User,
        username: &str,
        email: &str,
    ) -> AppResult<User> {
        let username = normalize_username(username);
        let email = email.trim();

        let mut errors = FieldErrors::new();
        check_username(&mut errors, &username);
        check_email(&mut errors, email);
        if errors.get("username").is_none() && users::username_taken(db_pool, &username, Some(actor.id)).await? {
            errors.add("username", "A user with that username already exists.");
        }
        errors.into_result()?;

        users::update_profile(db_pool, actor.id, &username, email).await
    }
}
