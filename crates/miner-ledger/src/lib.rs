//! The per-user accrual ledger.
//!
//! Users accrue a monotonically increasing balance at a per-user rate, boost
//! it by watching ads, grow it through referrals, and eventually withdraw
//! once eligibility conditions are met. The [`Ledger`] facade owns the only
//! real invariants in the system: balance is never fabricated or lost,
//! one-time bonuses are never double-paid, and withdrawals never exceed
//! balance — all enforced under a per-user lock discipline because the
//! underlying store offers no transactions.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chrono::Utc;
//! use miner_ledger::{Ledger, LedgerParams};
//! use miner_store::MemoryStore;
//!
//! # async fn example() -> Result<(), miner_ledger::LedgerError> {
//! let ledger = Ledger::new(Arc::new(MemoryStore::new()), LedgerParams::default());
//! let user = ledger
//!     .create_account("u1", "u1@example.com", "Miner One", Utc::now())
//!     .await?;
//! assert!(user.referral_code.starts_with("MINE-"));
//! # Ok(())
//! # }
//! ```

mod accrual;
mod auth;
mod boost;
mod error;
mod ledger;
mod params;
mod record;
mod referral;
mod withdrawal;

#[cfg(test)]
mod tests;

pub use accrual::settle;
pub use auth::Capability;
pub use boost::{apply_ad_boost, apply_deposit_boost};
pub use error::LedgerError;
pub use ledger::{AdWatch, DepositOutcome, Ledger, MiningStatus};
pub use params::LedgerParams;
pub use record::{
    referral_code_for, DepositRecord, UserRecord, WithdrawalRecord, WithdrawalStatus,
};
pub use referral::BonusOutcome;
pub use withdrawal::WithdrawalReceipt;
