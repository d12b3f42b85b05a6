use std::{fmt::Display, net::SocketAddr, str::FromStr};

use anyhow::{anyhow, Context};
use rand::{distr::Alphanumeric, Rng};

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub session_inactivity_mins: i64,
    pub secure_cookies: bool,
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://studybud.db".to_owned(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: random_secret(),
            access_token_ttl_secs: 5 * 60,
            refresh_token_ttl_secs: 24 * 60 * 60,
            session_inactivity_mins: 60,
            secure_cookies: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        let defaults = Config::default();

        let jwt_secret = match dotenv::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set, issued tokens will not survive a restart");
                defaults.jwt_secret
            }
        };

        let config = Config {
            database_url: dotenv::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: var_or("BIND_ADDR", defaults.bind_addr)?,
            jwt_secret,
            access_token_ttl_secs: var_or("ACCESS_TOKEN_TTL_SECS", defaults.access_token_ttl_secs)?,
            refresh_token_ttl_secs: var_or("REFRESH_TOKEN_TTL_SECS", defaults.refresh_token_ttl_secs)?,
            session_inactivity_mins: var_or("SESSION_INACTIVITY_MINS", defaults.session_inactivity_mins)?,
            secure_cookies: var_or("SECURE_COOKIES", defaults.secure_cookies)?,
            bcrypt_cost: var_or("BCRYPT_COST", defaults.bcrypt_cost)?,
        };

        if !(4..=31).contains(&config.bcrypt_cost) {
            return Err(anyhow!("BCRYPT_COST must be between 4 and 31"));
        }
        if config.access_token_ttl_secs <= 0 || config.refresh_token_ttl_secs <= 0 {
            return Err(anyhow!("token lifetimes must be positive"));
        }

        Ok(config)
    }
}

fn var_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match dotenv::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn random_secret() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.jwt_secret.len(), 48);
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.access_token_ttl_secs < config.refresh_token_ttl_secs);
    }

    #[test]
    fn random_secrets_differ() {
        assert_ne!(random_secret(), random_secret());
    }
}
