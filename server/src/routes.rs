// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! HTTP route handlers.
//!
//! | Method | Path | Handler | Description |
//! |--------|------|---------|-------------|
//! | GET | `/health` | [`health`] | Health check endpoint |
//! | POST | `/webhook/{token}` | [`webhook`] | Telegram update intake |

use std::sync::Arc;

use aws_lc_rs::constant_time::verify_slices_are_equal;
use axum::Json;
use axum::extract::{Path, Request, State};
use axum::response::IntoResponse;
use serde_json::{Value, json};

use crate::application::AppState;
use crate::errors::AppError;
use crate::safe_json::safe_json_request;

/// Health check endpoint.
///
/// # Response
///
/// ```json
/// {"status": "ok"}
/// ```
pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Accepts a Telegram update.
///
/// The path token must equal the bot's stored `webhookHash`; anything else is
/// answered as if the route did not exist. The body is ingested with
/// [`safe_json_request`] under the configured size limit and integrity check.
///
/// # Errors
///
/// - [`AppError::NotFound`] - token mismatch, or no webhook hash configured
/// - [`AppError::InvalidBody`] - the body was refused
/// - [`AppError::InternalServerError`] - the bot parameter could not be read
#[tracing::instrument(skip(state, token, request))]
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    request: Request,
) -> Result<Json<Value>, AppError> {
    let bot = state.secrets.bot().await?;

    if bot.webhook_hash.is_empty()
        || verify_slices_are_equal(token.as_bytes(), bot.webhook_hash.as_bytes()).is_err()
    {
        tracing::warn!("[server] webhook called with an unknown token");
        return Err(AppError::NotFound);
    }

    let update = safe_json_request(request, &state.body_options).await?;

    match update.get("update_id").and_then(Value::as_i64) {
        Some(update_id) => tracing::info!("[server] accepted update {}", update_id),
        None => tracing::warn!("[server] accepted update without update_id"),
    }

    Ok(Json(json!({"ok": true})))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    // Integration tests using TestServer are in tests/http_integration.rs

    #[tokio::test]
    async fn test_health_returns_ok() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json.as_object().unwrap().len(), 1);
    }
}
