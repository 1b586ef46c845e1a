// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Bounded, integrity-checked JSON ingestion.
//!
//! [`safe_json`] decodes JSON either from a string or from a request body
//! without trusting the sender. For requests:
//!
//! 1. `Content-Length` must be present, numeric, positive and within
//!    [`SafeJsonOptions::max_size_bytes`]
//! 2. When a [`HashCheck`] is configured, its digest header must be present
//! 3. The body is read into a buffer sized once from the declared length; a
//!    length that cannot be allocated is refused before reading, and a body
//!    that grows past it is abandoned immediately and its stream dropped
//! 4. The received byte count must equal the declared length exactly
//! 5. The digest of the received bytes must match the header, ignoring case
//!
//! Every failure is returned as a [`SafeJsonError`]; nothing panics and
//! nothing is retried.
//!
//! # Wire Example
//!
//! ```text
//! POST /webhook/<token> HTTP/1.1
//! Content-Length: 17
//! X-Amz-Content-SHA256: <hex sha256 of the 17 body bytes>
//!
//! {"update_id": 42}
//! ```

use std::fmt;

use aleteo_vault::utils::sha256_hex;
use axum::body::{BodyDataStream, HttpBody};
use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::http::header::CONTENT_LENGTH;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::Value;

use crate::constants::HASH_HEADER_NAME;
use crate::errors::SafeJsonError;

/// Computes the hex digest a request's integrity header is compared against.
pub type Hasher = fn(&[u8]) -> String;

pub type SafeJsonResult = Result<Value, SafeJsonError>;

#[derive(Clone)]
pub enum HashCheck {
    Disabled,
    Header { header: String, hasher: Hasher },
}

impl HashCheck {
    /// SHA-256 check against `header`.
    pub fn header(header: impl Into<String>) -> Self {
        Self::Header {
            header: header.into(),
            hasher: sha256_hex,
        }
    }
}

impl Default for HashCheck {
    fn default() -> Self {
        Self::header(HASH_HEADER_NAME)
    }
}

impl fmt::Debug for HashCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Header { header, .. } => f.debug_struct("Header").field("header", header).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SafeJsonOptions {
    pub max_size_bytes: usize,
    pub hash_check: HashCheck,
}

impl SafeJsonOptions {
    /// Options with the default SHA-256 integrity check.
    pub fn new(max_size_bytes: usize) -> Self {
        Self {
            max_size_bytes,
            hash_check: HashCheck::default(),
        }
    }

    pub fn with_hash_check(mut self, hash_check: HashCheck) -> Self {
        self.hash_check = hash_check;
        self
    }

    pub fn without_hash_check(self) -> Self {
        self.with_hash_check(HashCheck::Disabled)
    }

    fn validate(&self) -> Result<(), SafeJsonError> {
        if self.max_size_bytes < 1 {
            return Err(SafeJsonError::BadInput("max_size_bytes must be positive"));
        }
        if let HashCheck::Header { header, .. } = &self.hash_check
            && HeaderName::from_bytes(header.as_bytes()).is_err()
        {
            return Err(SafeJsonError::BadInput("invalid integrity header name"));
        }
        Ok(())
    }
}

/// A request whose headers can be inspected and whose body can be streamed.
///
/// Dropping the stream returned by [`into_body_stream`] cancels the body.
///
/// [`into_body_stream`]: RequestLike::into_body_stream
pub trait RequestLike {
    type Error: fmt::Display;
    type Body: Stream<Item = Result<Bytes, Self::Error>>;

    /// Case-insensitive header lookup returning the raw value bytes.
    fn header(&self, name: &str) -> Option<&[u8]>;

    /// `None` when the request has no body to read.
    fn into_body_stream(self) -> Option<Self::Body>;
}

impl RequestLike for Request {
    type Error = axum::Error;
    type Body = BodyDataStream;

    fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers().get(name).map(HeaderValue::as_bytes)
    }

    fn into_body_stream(self) -> Option<Self::Body> {
        let body = self.into_body();
        if body.is_end_stream() {
            return None;
        }
        Some(body.into_data_stream())
    }
}

pub enum JsonInput<R> {
    Text(String),
    Request(R),
}

pub async fn safe_json<R: RequestLike>(input: JsonInput<R>, options: &SafeJsonOptions) -> SafeJsonResult {
    match input {
        JsonInput::Text(text) => safe_json_str(&text, options),
        JsonInput::Request(request) => safe_json_request(request, options).await,
    }
}

/// Parses `text` if it fits in `max_size_bytes`. No integrity check applies.
pub fn safe_json_str(text: &str, options: &SafeJsonOptions) -> SafeJsonResult {
    options.validate()?;

    if text.is_empty() {
        return Err(SafeJsonError::BadInput("empty input"));
    }

    if text.len() > options.max_size_bytes {
        return Err(SafeJsonError::TooLarge {
            length: text.len(),
            limit: options.max_size_bytes,
        });
    }

    Ok(serde_json::from_str(text)?)
}

#[tracing::instrument(skip_all)]
pub async fn safe_json_request<R: RequestLike>(request: R, options: &SafeJsonOptions) -> SafeJsonResult {
    options.validate()?;

    let declared = request
        .header(CONTENT_LENGTH.as_str())
        .map(String::from_utf8_lossy)
        .ok_or(SafeJsonError::MissingLengthHeader)?;

    let expected_size = declared
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|size| *size >= 1)
        .ok_or_else(|| SafeJsonError::InvalidLengthHeader(declared.to_string()))?;

    if expected_size > options.max_size_bytes {
        return Err(SafeJsonError::LengthOverLimit {
            declared: expected_size,
            limit: options.max_size_bytes,
        });
    }

    let integrity = match &options.hash_check {
        HashCheck::Disabled => None,
        HashCheck::Header { header, hasher } => {
            let digest = request
                .header(header)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| SafeJsonError::MissingIntegrityHeader(header.clone()))?;
            Some((String::from_utf8_lossy(digest).trim().to_string(), *hasher))
        }
    };

    let stream = request
        .into_body_stream()
        .ok_or(SafeJsonError::StreamUnavailable)?;

    let data = read_body(stream, expected_size).await?;

    if let Some((expected, hasher)) = integrity
        && !hasher(&data).eq_ignore_ascii_case(&expected)
    {
        return Err(SafeJsonError::IntegrityMismatch);
    }

    Ok(serde_json::from_slice(&data)?)
}

/// Reads exactly `expected_size` bytes, never buffering more.
async fn read_body<S, E>(stream: S, expected_size: usize) -> Result<Vec<u8>, SafeJsonError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: fmt::Display,
{
    let mut data = Vec::new();
    if data.try_reserve_exact(expected_size).is_err() {
        tracing::warn!("[server] cannot allocate {} bytes for body", expected_size);
        return Err(SafeJsonError::BufferUnavailable {
            declared: expected_size,
        });
    }

    let mut stream = Box::pin(stream);

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|err| SafeJsonError::BodyRead(err.to_string()))?;

        if data.len() + chunk.len() > expected_size {
            drop(stream);
            tracing::warn!(
                "[server] body exceeds announced length of {} bytes, stream cancelled",
                expected_size
            );
            return Err(SafeJsonError::OverLengthBody {
                declared: expected_size,
            });
        }

        data.extend_from_slice(&chunk);
    }

    if data.is_empty() {
        return Err(SafeJsonError::EmptyBody);
    }

    if data.len() != expected_size {
        return Err(SafeJsonError::LengthMismatch {
            declared: expected_size,
            received: data.len(),
        });
    }

    Ok(data)
}
