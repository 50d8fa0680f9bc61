//! Typed helpers over the JSON value interface.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{KvStore, StoreError};

/// Get and deserialize the value at `key`. Returns `None` when absent.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Serialize and upsert `value` at `key`.
pub async fn put_json<T: Serialize>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    store.put(key, serde_json::to_value(value)?).await
}
