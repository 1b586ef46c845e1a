// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Remote parameter store abstraction.
//!
//! [`ParameterStore`] is the narrow interface a [`Vault`](crate::vault::Vault)
//! uses to reach the encrypted key-value service. The production
//! implementation is [`SsmParameterStore`](crate::ssm::SsmParameterStore);
//! [`MemoryParameterStore`] keeps everything in-process for tests and local
//! runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::VaultError;

#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Fetches the value of `name`, or `None` when the parameter does not exist.
    async fn get_parameter(&self, name: &str, decrypt: bool) -> Result<Option<String>, VaultError>;

    /// Stores `value` under `name`.
    async fn put_parameter(
        &self,
        name: &str,
        value: &str,
        secure: bool,
        overwrite: bool,
    ) -> Result<(), VaultError>;
}

/// In-process [`ParameterStore`].
///
/// Counts fetches and writes, and can be told to fail either operation.
/// `decrypt` and `secure` are accepted and ignored.
#[derive(Debug, Default)]
pub struct MemoryParameterStore {
    parameters: RwLock<HashMap<String, String>>,
    fetches: AtomicUsize,
    puts: AtomicUsize,
    fail_fetches: AtomicBool,
    fail_puts: AtomicBool,
}

impl MemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.get_mut().insert(name.into(), value.into());
        self
    }

    pub async fn value(&self, name: &str) -> Option<String> {
        self.parameters.read().await.get(name).cloned()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ParameterStore for MemoryParameterStore {
    async fn get_parameter(&self, name: &str, _decrypt: bool) -> Result<Option<String>, VaultError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(VaultError::RemoteFetch {
                id: name.to_string(),
                message: "fetch failure injected".to_string(),
            });
        }

        Ok(self.value(name).await)
    }

    async fn put_parameter(
        &self,
        name: &str,
        value: &str,
        _secure: bool,
        overwrite: bool,
    ) -> Result<(), VaultError> {
        self.puts.fetch_add(1, Ordering::SeqCst);

        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(VaultError::RemoteWrite {
                id: name.to_string(),
                message: "put failure injected".to_string(),
            });
        }

        let mut parameters = self.parameters.write().await;
        if !overwrite && parameters.contains_key(name) {
            return Err(VaultError::RemoteWrite {
                id: name.to_string(),
                message: "parameter already exists".to_string(),
            });
        }
        parameters.insert(name.to_string(), value.to_string());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_parameter_is_none() {
        let store = MemoryParameterStore::new();
        assert_eq!(store.get_parameter("/missing", true).await, Ok(None));
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryParameterStore::new();
        store.put_parameter("/p", "{}", true, true).await.unwrap();

        assert_eq!(
            store.get_parameter("/p", true).await.unwrap().as_deref(),
            Some("{}")
        );
        assert_eq!(store.put_count(), 1);
    }

    #[tokio::test]
    async fn test_put_without_overwrite_rejects_existing() {
        let store = MemoryParameterStore::new().with_parameter("/p", "{}");
        let result = store.put_parameter("/p", "{\"a\":1}", true, false).await;

        assert!(matches!(result, Err(VaultError::RemoteWrite { .. })));
        assert_eq!(store.value("/p").await.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryParameterStore::new().with_parameter("/p", "{}");
        store.fail_fetches(true);
        store.fail_puts(true);

        assert!(matches!(
            store.get_parameter("/p", true).await,
            Err(VaultError::RemoteFetch { .. })
        ));
        assert!(matches!(
            store.put_parameter("/p", "{}", true, true).await,
            Err(VaultError::RemoteWrite { .. })
        ));

        store.fail_fetches(false);
        assert!(store.get_parameter("/p", true).await.is_ok());
    }
}
