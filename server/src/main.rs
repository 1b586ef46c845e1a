// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::sync::Arc;

use aleteo_server::application::Application;
use aleteo_server::configuration::ServerOptions;
use aleteo_vault::generator::{LocalGenerator, SecretsManagerGenerator};
use aleteo_vault::secrets::Secrets;
use aleteo_vault::ssm::SsmParameterStore;
use aleteo_vault::store::MemoryParameterStore;
use aws_config::{BehaviorVersion, Region};
use clap::Parser;
use tracing_subscriber::EnvFilter;

// Avoid musl's default allocator due to terrible performance
#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        // this needs to be set to remove duplicated information in the log.
        .with_current_span(false)
        // this needs to be set to false, otherwise ANSI color codes will
        // show up in a confusing manner in CloudWatch logs.
        .with_ansi(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        // remove the name of the function from every log entry
        .with_target(false)
        .init();

    // get configuration options from environment variables
    let options = ServerOptions::parse();

    tracing::info!("[server] {:?}", &options);

    let secrets = Arc::new(build_secrets(&options).await);

    // rotates the cookie signing keys if they are due
    let keys = secrets.cookie_keys().await;
    if keys.is_empty() {
        tracing::warn!("[server] no cookie signing keys available");
    } else {
        tracing::info!("[server] {} cookie signing keys available", keys.len());
    }

    let application = Application::build(options, secrets).await?;

    application.run_until_stopped().await?;

    Ok(())
}

async fn build_secrets(options: &ServerOptions) -> Secrets {
    let settings = options.secrets_settings();

    if options.local_store {
        tracing::warn!("[server] using in-memory parameter store");
        let store = MemoryParameterStore::new()
            .with_parameter(settings.bot_param.clone(), "{}")
            .with_parameter(settings.cookies_param.clone(), "{}");
        return Secrets::new(Arc::new(store), Arc::new(LocalGenerator::default()), &settings);
    }

    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(options.region.clone()))
        .load()
        .await;

    Secrets::new(
        Arc::new(SsmParameterStore::new(&config)),
        Arc::new(SecretsManagerGenerator::new(&config)),
        &settings,
    )
}
