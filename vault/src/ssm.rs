// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! AWS Systems Manager Parameter Store integration.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::types::ParameterType;

use crate::errors::VaultError;
use crate::store::ParameterStore;

/// [`ParameterStore`] backed by SSM `GetParameter` / `PutParameter`.
///
/// A missing parameter (`ParameterNotFound`) is reported as `Ok(None)` so the
/// vault can apply its ignore-missing policy; every other SDK failure becomes
/// [`VaultError::RemoteFetch`] or [`VaultError::RemoteWrite`].
#[derive(Debug, Clone)]
pub struct SsmParameterStore {
    client: Client,
}

impl SsmParameterStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    #[tracing::instrument(skip(self))]
    async fn get_parameter(&self, name: &str, decrypt: bool) -> Result<Option<String>, VaultError> {
        let result = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(decrypt)
            .send()
            .await;

        match result {
            Ok(output) => Ok(output
                .parameter()
                .and_then(|parameter| parameter.value())
                .map(str::to_string)),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_not_found()) =>
            {
                tracing::debug!("[vault] parameter {} not found", name);
                Ok(None)
            }
            Err(err) => Err(VaultError::RemoteFetch {
                id: name.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            }),
        }
    }

    #[tracing::instrument(skip(self, value))]
    async fn put_parameter(
        &self,
        name: &str,
        value: &str,
        secure: bool,
        overwrite: bool,
    ) -> Result<(), VaultError> {
        let parameter_type = if secure {
            ParameterType::SecureString
        } else {
            ParameterType::String
        };

        self.client
            .put_parameter()
            .name(name)
            .value(value)
            .r#type(parameter_type)
            .overwrite(overwrite)
            .send()
            .await
            .map_err(|err| VaultError::RemoteWrite {
                id: name.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

        tracing::debug!("[vault] committed parameter {}", name);

        Ok(())
    }
}
