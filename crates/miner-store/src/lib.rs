//! Key-value store capability for the miner ledger.
//!
//! The ledger consumes durable storage as an opaque capability: point get,
//! point put (upsert), and prefix scan over JSON values. No transactions and
//! no compare-and-swap — serialization of read-modify-write sequences is the
//! caller's job, via [`KeyLocks`].
//!
//! # Example
//!
//! ```
//! use miner_store::{KvStore, MemoryStore, keys};
//!
//! # async fn example() -> Result<(), miner_store::StoreError> {
//! let store = MemoryStore::new();
//! store.put(&keys::user("u1"), serde_json::json!({"balance": 0})).await?;
//! assert!(store.get(&keys::user("u1")).await?.is_some());
//! # Ok(())
//! # }
//! ```

mod error;
mod json;
mod lock;
mod memory;
mod traits;

pub mod keys;

pub use error::StoreError;
pub use json::{get_json, put_json};
pub use lock::KeyLocks;
pub use memory::MemoryStore;
pub use traits::KvStore;
