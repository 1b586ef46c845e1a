// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Named accessors for the application's secrets.
//!
//! [`Secrets`] holds one [`Vault`] for the Telegram bot credentials and one for
//! the cookie signing keys, both sharing a single [`ParameterStore`].
//!
//! # Cookie key rotation
//!
//! [`Secrets::cookie_keys`] always reads the keys from the store. When no key
//! is present, or the last rotation is unknown or older than the configured
//! interval, a new key is generated and prepended, at most two previous keys
//! are kept, and the list is committed with the current time.
//!
//! Rotation fails open: any error on this path is logged and reported as an
//! empty key list.

use std::sync::Arc;
use std::time::Duration;

use crate::constants::{
    BOT_PARAM_NAME, COOKIE_KEYS_TTL, COOKIES_PARAM_NAME, MAX_COOKIE_KEYS, PARAMS_CACHE_TTL,
};
use crate::errors::VaultError;
use crate::generator::{PasswordGenerator, generate};
use crate::models::{BotParam, BotParamPatch, CookieParam};
use crate::store::ParameterStore;
use crate::vault::{Vault, VaultOptions};

#[derive(Debug, Clone)]
pub struct SecretsSettings {
    pub bot_param: String,
    pub cookies_param: String,
    pub params_cache_ttl: Duration,
    pub cookie_keys_ttl: Duration,
}

impl Default for SecretsSettings {
    fn default() -> Self {
        Self {
            bot_param: BOT_PARAM_NAME.to_string(),
            cookies_param: COOKIES_PARAM_NAME.to_string(),
            params_cache_ttl: PARAMS_CACHE_TTL,
            cookie_keys_ttl: COOKIE_KEYS_TTL,
        }
    }
}

pub struct Secrets {
    bot: Vault<BotParam>,
    cookies: Vault<CookieParam>,
    generator: Arc<dyn PasswordGenerator>,
    cookie_keys_ttl: Duration,
}

impl Secrets {
    pub fn new(
        store: Arc<dyn ParameterStore>,
        generator: Arc<dyn PasswordGenerator>,
        settings: &SecretsSettings,
    ) -> Self {
        let bot = Vault::new(
            store.clone(),
            VaultOptions::new(settings.bot_param.clone()).ttl(settings.params_cache_ttl),
        );
        let cookies = Vault::new(store, VaultOptions::new(settings.cookies_param.clone()));

        Self {
            bot,
            cookies,
            generator,
            cookie_keys_ttl: settings.cookie_keys_ttl,
        }
    }

    pub async fn bot(&self) -> Result<BotParam, VaultError> {
        self.bot.get(false).await
    }

    pub async fn set_bot(&self, patch: &BotParamPatch) -> Result<BotParam, VaultError> {
        self.bot.set(patch, false).await
    }

    /// Current cookie signing keys, newest first. Empty on any failure.
    #[tracing::instrument(skip(self))]
    pub async fn cookie_keys(&self) -> Vec<String> {
        let now = chrono::Utc::now().timestamp_millis();

        match self.rotate_cookie_keys(now).await {
            Ok(keys) => keys,
            Err(err) => {
                tracing::error!("[vault] failure to read cookie keys: {}", err);
                Vec::new()
            }
        }
    }

    async fn rotate_cookie_keys(&self, now: i64) -> Result<Vec<String>, VaultError> {
        let current = self.cookies.get(true).await?;

        let mut keys: Vec<String> = current
            .keys
            .iter()
            .filter(|key| !key.is_empty())
            .cloned()
            .collect();

        if keys.is_empty() || self.is_stale(current.ts, now) {
            tracing::info!("[vault] rotating cookie keys");

            let fresh = generate(self.generator.as_ref()).await;
            keys.truncate(MAX_COOKIE_KEYS - 1);
            keys.insert(0, fresh);

            let update = CookieParam {
                ts: now,
                keys: keys.clone(),
            };
            self.cookies.set(&update, false).await?;
        }

        Ok(keys)
    }

    /// An unset timestamp is always stale.
    fn is_stale(&self, ts: i64, now: i64) -> bool {
        if ts == 0 {
            return true;
        }
        let interval = i64::try_from(self.cookie_keys_ttl.as_millis()).unwrap_or(i64::MAX);
        now.saturating_sub(ts) >= interval
    }
}
