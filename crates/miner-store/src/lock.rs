//! Per-key mutual exclusion for read-modify-write sequences.
//!
//! The store exposes no transactions and no compare-and-swap, so two
//! concurrent mutations of the same record would race: both read the same
//! base value, compute next states independently, and the second write
//! clobbers the first. [`KeyLocks`] closes that window by serializing
//! mutations per key.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of async mutexes, one per key, created lazily.
///
/// Locks are never removed; the ledger's key population is small and
/// long-lived (one lock per active user).
#[derive(Debug, Default)]
pub struct KeyLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock();
        map.entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Acquire the lock for `key`, waiting if another task holds it.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        self.entry(key).lock_owned().await
    }

    /// Acquire the locks for two keys in lexicographic order.
    ///
    /// Ordered acquisition makes dual-key operations deadlock-free
    /// regardless of argument order. When both keys are equal a single
    /// guard is returned.
    pub async fn acquire_pair(
        &self,
        a: &str,
        b: &str,
    ) -> (OwnedMutexGuard<()>, Option<OwnedMutexGuard<()>>) {
        if a == b {
            return (self.acquire(a).await, None);
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let g1 = self.acquire(first).await;
        let g2 = self.acquire(second).await;
        (g1, Some(g2))
    }

    /// Number of keys with a registered lock.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if no locks have been registered.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
