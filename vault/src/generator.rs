// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Random password generation.
//!
//! [`generate`] asks a [`PasswordGenerator`] for a high-entropy password and
//! never fails: if the collaborator errors or answers with nothing, a random
//! v4 UUID without separators is used instead.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use uuid::Uuid;

use crate::constants::{LOCAL_PASSWORD_LENGTH, PASSWORD_EXCLUDED_CHARACTERS};
use crate::errors::VaultError;
use crate::utils::random_value;

#[async_trait]
pub trait PasswordGenerator: Send + Sync {
    async fn random_password(&self) -> Result<String, VaultError>;
}

/// Returns a fresh password, falling back to a random identifier.
#[tracing::instrument(skip(generator))]
pub async fn generate(generator: &dyn PasswordGenerator) -> String {
    match generator.random_password().await {
        Ok(password) if !password.is_empty() => password,
        Ok(_) => {
            tracing::warn!("[vault] password generator returned an empty value, using fallback");
            fallback_password()
        }
        Err(err) => {
            tracing::warn!("[vault] password generation failed, using fallback: {}", err);
            fallback_password()
        }
    }
}

pub fn fallback_password() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Secrets Manager `GetRandomPassword`, without punctuation.
#[derive(Debug, Clone)]
pub struct SecretsManagerGenerator {
    client: Client,
}

impl SecretsManagerGenerator {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl PasswordGenerator for SecretsManagerGenerator {
    async fn random_password(&self) -> Result<String, VaultError> {
        let output = self
            .client
            .get_random_password()
            .exclude_punctuation(true)
            .exclude_characters(PASSWORD_EXCLUDED_CHARACTERS)
            .send()
            .await
            .map_err(|err| VaultError::Generator(DisplayErrorContext(&err).to_string()))?;

        output
            .random_password()
            .map(str::to_string)
            .ok_or_else(|| VaultError::Generator("no password in response".to_string()))
    }
}

/// Generates passwords in-process from the system random source.
#[derive(Debug, Clone)]
pub struct LocalGenerator {
    length: usize,
}

impl LocalGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for LocalGenerator {
    fn default() -> Self {
        Self::new(LOCAL_PASSWORD_LENGTH)
    }
}

#[async_trait]
impl PasswordGenerator for LocalGenerator {
    async fn random_password(&self) -> Result<String, VaultError> {
        random_value(self.length)
            .map_err(|_| VaultError::Generator("system random source unavailable".to_string()))
    }
}
