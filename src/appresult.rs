use axum::{http::StatusCode, response::{IntoResponse, Response}};

use crate::{identity::IdentityError, store::StoreError};

pub type AppResult<T> = Result<T, AppError>;

/// Everything a handler can fail with, already sorted by the status it maps to.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input. The message goes back to the client verbatim.
    BadRequest(String),
    NotFound,
    Internal(anyhow::Error),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::NotFound => StatusCode::NOT_FOUND.into_response(),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error",
                )
                    .into_response()
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            err => Self::Internal(anyhow::Error::from(err)),
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Sign(_) => Self::Internal(anyhow::Error::from(err)),
            err => Self::BadRequest(err.to_string()),
        }
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

apperr_impl!(anyhow::Error);
apperr_impl!(axum::http::header::InvalidHeaderValue);
