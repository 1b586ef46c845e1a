// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Read-through / write-through cache over one remote parameter.
//!
//! A [`Vault`] owns a [`TtlCache`] and shares a [`ParameterStore`] handle. The
//! parameter value is a JSON object; every value handed out is the shallow
//! merge of the configured defaults with whatever the store holds, so keys
//! missing remotely are always filled in.
//!
//! # Consistency
//!
//! [`Vault::set`] is a read-modify-write with no concurrency token. Two
//! concurrent writers both succeed and the last one to reach the store wins,
//! both remotely and in the cache. The cache lock is never held across a
//! remote call.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::cache::TtlCache;
use crate::errors::VaultError;
use crate::store::ParameterStore;

/// Construction options for a [`Vault`].
#[derive(Debug, Clone)]
pub struct VaultOptions<T> {
    pub id: String,
    /// Zero disables cache expiry.
    pub ttl: Duration,
    pub defaults: T,
    /// Fall back to `defaults` instead of failing when the parameter is
    /// missing or cannot be loaded.
    pub ignore_missing: bool,
}

impl<T: Default> VaultOptions<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ttl: Duration::ZERO,
            defaults: T::default(),
            ignore_missing: false,
        }
    }
}

impl<T> VaultOptions<T> {
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn defaults(mut self, defaults: T) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn ignore_missing(mut self, ignore_missing: bool) -> Self {
        self.ignore_missing = ignore_missing;
        self
    }
}

pub struct Vault<T> {
    id: String,
    defaults: T,
    ignore_missing: bool,
    cache: RwLock<TtlCache<T>>,
    store: Arc<dyn ParameterStore>,
}

impl<T> Vault<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    pub fn new(store: Arc<dyn ParameterStore>, options: VaultOptions<T>) -> Self {
        Self {
            id: options.id,
            defaults: options.defaults,
            ignore_missing: options.ignore_missing,
            cache: RwLock::new(TtlCache::new(options.ttl)),
            store,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn defaults(&self) -> &T {
        &self.defaults
    }

    /// Returns the cached value, loading it from the store on a miss or when
    /// `force_fetch` is set.
    #[tracing::instrument(skip(self), fields(id = %self.id))]
    pub async fn get(&self, force_fetch: bool) -> Result<T, VaultError> {
        if !force_fetch {
            let mut cache = self.cache.write().await;
            if let Some(data) = cache.get() {
                return Ok(data.clone());
            }
        }

        let data = self.load().await?;

        Ok(self.cache.write().await.set(data).clone())
    }

    /// Merges `patch` onto the current value, commits the result and caches it.
    ///
    /// `patch` must serialize to a JSON object; its top-level keys replace the
    /// current ones.
    #[tracing::instrument(skip(self, patch), fields(id = %self.id))]
    pub async fn set<P>(&self, patch: &P, force_fetch: bool) -> Result<T, VaultError>
    where
        P: Serialize + ?Sized + Sync,
    {
        let current = self.get(force_fetch).await?;

        let mut merged = self.to_object(&current)?;
        merged.extend(self.to_object(patch)?);
        let payload: T = serde_json::from_value(Value::Object(merged))
            .map_err(|err| VaultError::serialization(&self.id, err))?;

        let committed = self.commit(payload).await?;

        Ok(self.cache.write().await.set(committed).clone())
    }

    /// Resets the remote parameter to the defaults.
    #[tracing::instrument(skip(self), fields(id = %self.id))]
    pub async fn erase(&self) -> Result<T, VaultError> {
        let committed = self.commit(self.defaults.clone()).await?;

        Ok(self.cache.write().await.set(committed).clone())
    }

    async fn load(&self) -> Result<T, VaultError> {
        match self.fetch().await {
            Ok(Some(data)) => Ok(data),
            Ok(None) if self.ignore_missing => {
                tracing::info!(
                    "[vault] parameter {} value is empty, using default values",
                    self.id
                );
                Ok(self.defaults.clone())
            }
            Ok(None) => {
                let err = VaultError::MissingParameter(self.id.clone());
                tracing::error!("[vault] failure to load parameter: {}", err);
                Err(err)
            }
            Err(err) if self.ignore_missing => {
                tracing::error!(
                    "[vault] failure to load parameter {}, using default values: {}",
                    self.id,
                    err
                );
                Ok(self.defaults.clone())
            }
            Err(err) => {
                tracing::error!("[vault] failure to load parameter {}: {}", self.id, err);
                Err(err)
            }
        }
    }

    /// `Ok(None)` when the store has no value, or an empty one.
    async fn fetch(&self) -> Result<Option<T>, VaultError> {
        let raw = self.store.get_parameter(&self.id, true).await?;
        let Some(raw) = raw.filter(|value| !value.is_empty()) else {
            return Ok(None);
        };

        let remote = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(remote)) => remote,
            Ok(_) => {
                return Err(VaultError::serialization(
                    &self.id,
                    "value is not a JSON object",
                ));
            }
            Err(err) => return Err(VaultError::serialization(&self.id, err)),
        };

        let mut merged = self.to_object(&self.defaults)?;
        merged.extend(remote);

        serde_json::from_value(Value::Object(merged))
            .map(Some)
            .map_err(|err| VaultError::serialization(&self.id, err))
    }

    async fn commit(&self, payload: T) -> Result<T, VaultError> {
        let value = serde_json::to_string(&payload)
            .map_err(|err| VaultError::serialization(&self.id, err))?;

        if let Err(err) = self.store.put_parameter(&self.id, &value, true, true).await {
            tracing::error!(
                "[vault] failure to commit parameter {} to parameter store: {}",
                self.id,
                err
            );
            return Err(err);
        }

        Ok(payload)
    }

    fn to_object<S: Serialize + ?Sized>(&self, value: &S) -> Result<Map<String, Value>, VaultError> {
        match serde_json::to_value(value) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(VaultError::serialization(
                &self.id,
                "value does not serialize to a JSON object",
            )),
            Err(err) => Err(VaultError::serialization(&self.id, err)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryParameterStore;
    use serde::Deserialize;
    use serde_json::json;

    const ID: &str = "/test/param";

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Settings {
        name: String,
        level: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    }

    fn defaults() -> Settings {
        Settings {
            name: "default".to_string(),
            level: 1,
            note: None,
        }
    }

    fn vault(store: &Arc<MemoryParameterStore>, ignore_missing: bool) -> Vault<Settings> {
        Vault::new(
            store.clone(),
            VaultOptions::new(ID)
                .ttl(Duration::from_secs(60))
                .defaults(defaults())
                .ignore_missing(ignore_missing),
        )
    }

    #[tokio::test]
    async fn test_get_missing_with_ignore_returns_defaults() {
        let store = Arc::new(MemoryParameterStore::new());
        let vault = vault(&store, true);

        assert_eq!(vault.get(false).await.unwrap(), defaults());
    }

    #[tokio::test]
    async fn test_get_missing_without_ignore_fails() {
        let store = Arc::new(MemoryParameterStore::new());
        let vault = vault(&store, false);

        assert_eq!(
            vault.get(false).await,
            Err(VaultError::MissingParameter(ID.to_string()))
        );
    }

    #[tokio::test]
    async fn test_get_empty_value_is_treated_as_missing() {
        let store = Arc::new(MemoryParameterStore::new().with_parameter(ID, ""));

        assert_eq!(vault(&store, true).get(false).await.unwrap(), defaults());
        assert!(matches!(
            vault(&store, false).get(false).await,
            Err(VaultError::MissingParameter(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_failure_follows_ignore_policy() {
        let store = Arc::new(MemoryParameterStore::new().with_parameter(ID, "{}"));
        store.fail_fetches(true);

        assert_eq!(vault(&store, true).get(false).await.unwrap(), defaults());
        assert!(matches!(
            vault(&store, false).get(false).await,
            Err(VaultError::RemoteFetch { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_value_follows_ignore_policy() {
        let store = Arc::new(MemoryParameterStore::new().with_parameter(ID, "[1, 2]"));

        assert_eq!(vault(&store, true).get(false).await.unwrap(), defaults());
        assert!(matches!(
            vault(&store, false).get(false).await,
            Err(VaultError::Serialization { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_fills_missing_keys_from_defaults() {
        let store = Arc::new(
            MemoryParameterStore::new().with_parameter(ID, json!({"level": 9}).to_string()),
        );

        let value = vault(&store, false).get(false).await.unwrap();
        assert_eq!(
            value,
            Settings {
                name: "default".to_string(),
                level: 9,
                note: None,
            }
        );
    }

    #[tokio::test]
    async fn test_get_is_served_from_cache() {
        let store = Arc::new(MemoryParameterStore::new().with_parameter(ID, "{}"));
        let vault = vault(&store, false);

        vault.get(false).await.unwrap();
        vault.get(false).await.unwrap();
        assert_eq!(store.fetch_count(), 1);

        vault.get(true).await.unwrap();
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_refetches_after_ttl() {
        let store = Arc::new(MemoryParameterStore::new().with_parameter(ID, "{}"));
        let vault = vault(&store, false);

        vault.get(false).await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        vault.get(false).await.unwrap();

        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_set_merges_defaults_previous_and_patch() {
        let store = Arc::new(
            MemoryParameterStore::new()
                .with_parameter(ID, json!({"name": "remote", "level": 4}).to_string()),
        );
        let vault = vault(&store, false);

        let value = vault.set(&json!({"note": "hello"}), false).await.unwrap();
        let expected = Settings {
            name: "remote".to_string(),
            level: 4,
            note: Some("hello".to_string()),
        };
        assert_eq!(value, expected);

        // the committed value is what a subsequent get returns, without a fetch
        let fetches = store.fetch_count();
        assert_eq!(vault.get(false).await.unwrap(), expected);
        assert_eq!(store.fetch_count(), fetches);

        let stored: Value = serde_json::from_str(&store.value(ID).await.unwrap()).unwrap();
        assert_eq!(stored, json!({"name": "remote", "level": 4, "note": "hello"}));
    }

    #[tokio::test]
    async fn test_set_patch_overrides_existing_keys() {
        let store = Arc::new(MemoryParameterStore::new().with_parameter(ID, "{}"));
        let vault = vault(&store, false);

        vault.set(&json!({"level": 2}), false).await.unwrap();
        let value = vault.set(&json!({"level": 3}), false).await.unwrap();

        assert_eq!(value.level, 3);
        assert_eq!(value.name, "default");
    }

    #[tokio::test]
    async fn test_set_rejects_non_object_patch() {
        let store = Arc::new(MemoryParameterStore::new().with_parameter(ID, "{}"));
        let vault = vault(&store, false);

        assert!(matches!(
            vault.set(&json!("scalar"), false).await,
            Err(VaultError::Serialization { .. })
        ));
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn test_set_rejects_patch_with_wrong_types() {
        let store = Arc::new(MemoryParameterStore::new().with_parameter(ID, "{}"));
        let vault = vault(&store, false);

        assert!(matches!(
            vault.set(&json!({"level": "high"}), false).await,
            Err(VaultError::Serialization { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_propagates_write_failure() {
        let store = Arc::new(MemoryParameterStore::new().with_parameter(ID, "{}"));
        let vault = vault(&store, true);
        vault.get(false).await.unwrap();
        store.fail_puts(true);

        assert!(matches!(
            vault.set(&json!({"level": 5}), false).await,
            Err(VaultError::RemoteWrite { .. })
        ));
        // the cache keeps the last committed value
        assert_eq!(vault.get(false).await.unwrap().level, 1);
    }

    #[tokio::test]
    async fn test_erase_commits_defaults() {
        let store = Arc::new(
            MemoryParameterStore::new().with_parameter(ID, json!({"level": 8}).to_string()),
        );
        let vault = vault(&store, false);
        assert_eq!(vault.get(false).await.unwrap().level, 8);

        assert_eq!(vault.erase().await.unwrap(), defaults());
        assert_eq!(vault.get(false).await.unwrap(), defaults());

        let stored: Value = serde_json::from_str(&store.value(ID).await.unwrap()).unwrap();
        assert_eq!(stored, json!({"name": "default", "level": 1}));
    }

    #[test]
    fn test_options_builder() {
        let options: VaultOptions<Settings> = VaultOptions::new(ID)
            .ttl(Duration::from_secs(5))
            .ignore_missing(true);

        assert_eq!(options.id, ID);
        assert_eq!(options.ttl, Duration::from_secs(5));
        assert_eq!(options.defaults, Settings::default());
        assert!(options.ignore_missing);
    }
}
