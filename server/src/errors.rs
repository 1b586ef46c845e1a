// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use aleteo_vault::errors::VaultError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Reasons [`safe_json`](crate::safe_json::safe_json) refuses an input.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SafeJsonError {
    #[error("bad input request: {0}")]
    BadInput(&'static str),
    #[error("input string is too long: {length} bytes exceeds limit of {limit}")]
    TooLarge { length: usize, limit: usize },
    #[error("request misses Content-Length header")]
    MissingLengthHeader,
    #[error("Content-Length header has invalid value: {0:?}")]
    InvalidLengthHeader(String),
    #[error("Content-Length {declared} exceeds allowed limit of {limit}")]
    LengthOverLimit { declared: usize, limit: usize },
    #[error("data consistency header {0:?} is missing")]
    MissingIntegrityHeader(String),
    #[error("cannot allocate a buffer for {declared} bytes")]
    BufferUnavailable { declared: usize },
    #[error("failure to obtain body reader")]
    StreamUnavailable,
    #[error("body size exceeds announced content length of {declared}")]
    OverLengthBody { declared: usize },
    #[error("failure to read body: {0}")]
    BodyRead(String),
    #[error("empty body")]
    EmptyBody,
    #[error("received {received} bytes but Content-Length announced {declared}")]
    LengthMismatch { declared: usize, received: usize },
    #[error("failure to verify data consistency")]
    IntegrityMismatch,
    #[error("invalid JSON: {0}")]
    Parse(String),
}

impl SafeJsonError {
    fn status(&self) -> StatusCode {
        match self {
            Self::TooLarge { .. }
            | Self::LengthOverLimit { .. }
            | Self::BufferUnavailable { .. }
            | Self::OverLengthBody { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            Self::MissingLengthHeader => StatusCode::LENGTH_REQUIRED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<serde_json::Error> for SafeJsonError {
    fn from(source: serde_json::Error) -> Self {
        SafeJsonError::Parse(source.to_string())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AppError {
    #[error("invalid request body: {0}")]
    InvalidBody(SafeJsonError),
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    InternalServerError,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidBody(err) => (err.status(), err.to_string()),
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            Self::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        };

        let body = Json(json!({"code": status.as_u16(), "message": message}));

        (status, body).into_response()
    }
}

impl From<SafeJsonError> for AppError {
    fn from(source: SafeJsonError) -> Self {
        tracing::warn!("[server] rejected request body: {}", source);
        AppError::InvalidBody(source)
    }
}

impl From<VaultError> for AppError {
    fn from(_source: VaultError) -> Self {
        tracing::error!("{:?}", _source);
        AppError::InternalServerError
    }
}
