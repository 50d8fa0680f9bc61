//! Data-access trait for key-value backends.

use async_trait::async_trait;
use serde_json::Value;

use crate::StoreError;

/// Opaque key-value capability.
///
/// Implementations provide point reads, point upserts, and ordered prefix
/// scans over JSON values — nothing more. There are no multi-key
/// transactions; callers that need atomic read-modify-write sequences must
/// serialize them externally (see [`KeyLocks`](crate::KeyLocks)).
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Look up a value by exact key. Returns `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Insert or overwrite the value at `key`.
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// All `(key, value)` pairs whose key starts with `prefix`, in
    /// ascending key order.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StoreError>;
}
