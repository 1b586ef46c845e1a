// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::time::Duration;

use aleteo_vault::constants::{BOT_PARAM_NAME, COOKIE_KEYS_TTL, COOKIES_PARAM_NAME, PARAMS_CACHE_TTL};
use aleteo_vault::secrets::SecretsSettings;
use clap::{ArgAction, Parser};

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REGION, HASH_HEADER_NAME, MAX_PAYLOAD_SIZE};
use crate::safe_json::{HashCheck, SafeJsonOptions};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct ServerOptions {
    #[arg(long, default_value = "127.0.0.1", env("ALETEO_HTTP_HOST"))]
    pub host: String,
    #[arg(long, default_value = "7000", env("ALETEO_HTTP_PORT"))]
    pub port: u16,
    #[arg(long, default_value = "eu-west-1", env("ALETEO_AWS_REGION"))]
    pub region: String,
    #[arg(long, default_value = "/aleteo/bot", env("ALETEO_BOT_PARAM"))]
    pub bot_param: String,
    #[arg(long, default_value = "/aleteo/cookies", env("ALETEO_COOKIES_PARAM"))]
    pub cookies_param: String,
    /// Bot parameter cache lifetime in seconds, 0 caches forever
    #[arg(long, default_value = "300", env("ALETEO_PARAMS_CACHE_TTL"))]
    pub params_cache_ttl: u64,
    /// Cookie signing key rotation interval in seconds
    #[arg(long, default_value = "43200", env("ALETEO_COOKIE_KEYS_TTL"))]
    pub cookie_keys_ttl: u64,
    /// Largest accepted request body in bytes
    #[arg(long, default_value = "1048576", env("ALETEO_MAX_PAYLOAD_SIZE"))]
    pub max_payload_size: usize,
    #[arg(long, default_value = "X-Amz-Content-SHA256", env("ALETEO_HASH_HEADER"))]
    pub hash_header: String,
    #[arg(long, default_value = "false", env("ALETEO_SKIP_HASH_CHECK"), action = ArgAction::SetTrue)]
    pub skip_hash_check: bool,
    /// Keep parameters in memory instead of SSM, for local runs
    #[arg(long, default_value = "false", env("ALETEO_LOCAL_STORE"), action = ArgAction::SetTrue)]
    pub local_store: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        ServerOptions {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            region: DEFAULT_REGION.to_string(),
            bot_param: BOT_PARAM_NAME.to_string(),
            cookies_param: COOKIES_PARAM_NAME.to_string(),
            params_cache_ttl: PARAMS_CACHE_TTL.as_secs(),
            cookie_keys_ttl: COOKIE_KEYS_TTL.as_secs(),
            max_payload_size: MAX_PAYLOAD_SIZE,
            hash_header: HASH_HEADER_NAME.to_string(),
            skip_hash_check: false,
            local_store: true,
        }
    }
}

impl ServerOptions {
    pub fn secrets_settings(&self) -> SecretsSettings {
        SecretsSettings {
            bot_param: self.bot_param.clone(),
            cookies_param: self.cookies_param.clone(),
            params_cache_ttl: Duration::from_secs(self.params_cache_ttl),
            cookie_keys_ttl: Duration::from_secs(self.cookie_keys_ttl),
        }
    }

    pub fn safe_json_options(&self) -> SafeJsonOptions {
        let hash_check = if self.skip_hash_check {
            HashCheck::Disabled
        } else {
            HashCheck::header(self.hash_header.clone())
        };

        SafeJsonOptions::new(self.max_payload_size).with_hash_check(hash_check)
    }
}
