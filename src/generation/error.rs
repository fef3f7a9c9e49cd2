use super::Operation;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Rejected before anything leaves the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{operation} expects {expected} image(s), got {actual}")]
    WrongImageCount {
        operation: Operation,
        expected: usize,
        actual: usize,
    },

    /// Right total, wrong roles: try-on needs exactly one image per slot.
    #[error(
        "{operation} expects one personImage and one garmentImage, \
got {person} personImage, {garment} garmentImage, {other} image"
    )]
    WrongImageRoles {
        operation: Operation,
        person: usize,
        garment: usize,
        other: usize,
    },

    #[error("{0}")]
    MalformedRequest(String),
}

/// Failures reported by, or while talking to, the image provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    ContentRejected(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    NoImageReturned(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ValidationError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRequest(msg.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::WrongImageCount { .. } | Self::WrongImageRoles { .. } => "WrongImageCount",
            Self::MalformedRequest(_) => "MalformedRequest",
        }
    }
}

impl ProviderError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth(_) => "Auth",
            Self::ContentRejected(_) => "ContentRejected",
            Self::Unavailable(_) => "Unavailable",
            Self::NoImageReturned(_) => "NoImageReturned",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::ContentRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NoImageReturned(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl GenerationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.kind(),
            Self::Provider(e) => e.kind(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Provider(e) => e.status(),
        }
    }
}

impl IntoResponse for GenerationError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        GenerationError::from(self).into_response()
    }
}
