// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # Aleteo Server
//!
//! HTTP front for the Aleteo Telegram Mini App back end.
//!
//! ```text
//! Telegram -> CloudFront -> HTTP API (this crate) -> safe_json
//!                                 |
//!                                 +-> Secrets -> Vault -> SSM Parameter Store
//!                                                     +-> Secrets Manager (key generation)
//! ```
//!
//! ## Modules
//!
//! - [`application`]: Axum router and server setup
//! - [`configuration`]: CLI argument parsing with clap
//! - [`constants`]: defaults for the listener and body ingestion
//! - [`errors`]: [`SafeJsonError`](errors::SafeJsonError) and
//!   [`AppError`](errors::AppError) with HTTP response mapping
//! - [`routes`]: HTTP route handlers (health, webhook)
//! - [`safe_json`]: bounded, integrity-checked JSON body ingestion
//!
//! ## Usage
//!
//! ```bash
//! aleteo-server --host 0.0.0.0 --port 7000 --region eu-west-1
//! ```
//!
//! ## Security Considerations
//!
//! - Request bodies need an exact `Content-Length` within the configured limit
//!   and, unless disabled, a matching `X-Amz-Content-SHA256` digest
//! - Bot credentials and cookie keys are redacted from `Debug` output and
//!   zeroized on drop
//! - Webhook tokens are compared in constant time

pub mod application;
pub mod configuration;
pub mod constants;
pub mod errors;
pub mod routes;
pub mod safe_json;
