use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Per-field validation messages, keyed by the offending field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &String)> {
        self.0.iter().flat_map(|(field, messages)| messages.iter().map(move |m| (*field, m)))
    }

    /// `Ok(())` when nothing was reported, otherwise a validation error.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("access denied")]
    AccessDenied,

    #[error("invalid input")]
    Validation(FieldErrors),

    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("token is invalid or already revoked")]
    InvalidToken,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::InvalidToken => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client; internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "an error occurred".to_owned(),
            other => other.to_string(),
        }
    }

    /// Writes internal failures to the log before they are redacted.
    pub(crate) fn log(&self) {
        if let Self::Internal(err) = self {
            tracing::error!("request failed: {err:?}");
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let fields = match &self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        };
        let body = ErrorBody {
            error: self.public_message(),
            status: status.as_u16(),
            fields,
        };
        (status, Json(body)).into_response()
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Internal(anyhow::Error::from(err))
            }
        }
    };
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected request body: {rejection}");
        Self::invalid("non_field_errors", rejection.body_text())
    }
}

/// A path segment that does not parse cannot name an existing object.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => {
                tracing::debug!("unparseable path: {err}");
                Self::NotFound("resource")
            }
            other => Self::Internal(anyhow::anyhow!(other.body_text())),
        }
    }
}

apperr_impl!(sqlx::Error);
apperr_impl!(sqlx::migrate::MigrateError);
apperr_impl!(serde_json::Error);
apperr_impl!(tower_sessions::session::Error);
apperr_impl!(bcrypt::BcryptError);
apperr_impl!(jsonwebtoken::errors::Error);
apperr_impl!(uuid::Error);
