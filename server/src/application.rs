// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use crate::configuration::ServerOptions;
use crate::constants::WEBHOOK_PATH;
use crate::routes;
use crate::safe_json::SafeJsonOptions;
use aleteo_vault::secrets::Secrets;
use axum::Router;
use axum::routing::{get, post};
use axum::serve::Serve;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub options: ServerOptions,
    pub body_options: SafeJsonOptions,
    pub secrets: Arc<Secrets>,
}

pub struct Application {
    port: u16,
    server: Serve<TcpListener, Router, Router>,
}

impl Application {
    pub async fn build(options: ServerOptions, secrets: Arc<Secrets>) -> Result<Self, std::io::Error> {
        let address = format!("{}:{}", options.host, options.port);
        let listener = TcpListener::bind(address).await?;
        let server = run(listener, options.clone(), secrets)?;
        let port = server.local_addr()?.port();

        tracing::info!("[server] listening at http://{}:{}", options.host, port);

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn create_router(options: ServerOptions, secrets: Arc<Secrets>) -> Router {
    let body_options = options.safe_json_options();
    let state = Arc::new(AppState {
        options,
        body_options,
        secrets,
    });

    Router::new()
        .route("/health", get(routes::health))
        .route(WEBHOOK_PATH, post(routes::webhook))
        .with_state(state)
}

#[tracing::instrument(skip(listener, secrets))]
pub fn run(
    listener: TcpListener,
    options: ServerOptions,
    secrets: Arc<Secrets>,
) -> Result<Serve<TcpListener, Router, Router>, std::io::Error> {
    let app = create_router(options, secrets);
    Ok(axum::serve(listener, app))
}
