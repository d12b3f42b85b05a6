use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    store::{users, User},
    AppError, AppResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub username: String,
    pub kind: TokenKind,
    /// Token id, the key under which refresh tokens are revoked
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signing keys and lifetimes for bearer tokens.
#[derive(Clone)]
pub struct Tokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl Tokens {
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
        }
    }

    fn issue(&self, user_id: Uuid, username: &str, kind: TokenKind) -> AppResult<String> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id,
            username: username.to_owned(),
            kind,
            jti: Uuid::now_v7(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn issue_pair(&self, user: &User) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access: self.issue(user.id, &user.username, TokenKind::Access)?,
            refresh: self.issue(user.id, &user.username, TokenKind::Refresh)?,
        })
    }

    /// Decodes `token`, checking signature, expiry and kind.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Option<Claims> {
        let claims = match decode::<Claims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::warn!("rejected token: {e}");
                return None;
            }
        };

        if claims.kind != kind {
            tracing::warn!("rejected {:?} token where {kind:?} was expected", claims.kind);
            return None;
        }
        Some(claims)
    }

    pub fn verify_access(&self, token: &str) -> AppResult<Uuid> {
        self.verify(token, TokenKind::Access)
            .map(|claims| claims.sub)
            .ok_or(AppError::Unauthenticated("token is invalid or expired"))
    }

    /// Trades a live refresh token for a new access token.
    pub async fn refresh(&self, db_pool: &SqlitePool, refresh: &str) -> AppResult<String> {
        let rejected = AppError::Unauthenticated("token is invalid or expired");

        let claims = self.verify(refresh, TokenKind::Refresh).ok_or(rejected)?;
        if is_revoked(db_pool, claims.jti).await? {
            tracing::warn!("refresh attempted with revoked token {}", claims.jti);
            return Err(AppError::Unauthenticated("token is invalid or expired"));
        }

        let user = users::by_id(db_pool, claims.sub)
            .await?
            .ok_or(AppError::Unauthenticated("token is invalid or expired"))?;
        self.issue(user.id, &user.username, TokenKind::Access)
    }

    /// Revokes a refresh token. Tokens that are invalid or already revoked
    /// fail with `InvalidToken`.
    pub async fn invalidate(&self, db_pool: &SqlitePool, refresh: &str) -> AppResult<()> {
        let claims = self.verify(refresh, TokenKind::Refresh).ok_or(AppError::InvalidToken)?;

        let revoked = sqlx::query("INSERT OR IGNORE INTO revoked_tokens (jti, revoked_at) VALUES (?, ?)")
            .bind(claims.jti.to_string())
            .bind(Utc::now())
            .execute(db_pool)
            .await?;

        if revoked.rows_affected() == 0 {
            return Err(AppError::InvalidToken);
        }
        tracing::info!("revoked refresh token for {}", claims.username);
        Ok(())
    }
}

async fn is_revoked(db_pool: &SqlitePool, jti: Uuid) -> AppResult<bool> {
    let found: Option<(String,)> = sqlx::query_as("SELECT jti FROM revoked_tokens WHERE jti = ?")
        .bind(jti.to_string())
        .fetch_optional(db_pool)
        .await?;
    Ok(found.is_some())
}
