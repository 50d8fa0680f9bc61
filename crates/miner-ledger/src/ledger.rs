//! The ledger facade and its record-update discipline.
//!
//! Every read-modify-write on a user record runs under that user's lock
//! from [`KeyLocks`]; operations touching two users take both locks in
//! lexicographic order (see `referral.rs`). The store itself is an opaque
//! get/put/scan capability with no transactions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use miner_core::Amount;
use miner_store::{get_json, keys, put_json, KeyLocks, KvStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::accrual::settle;
use crate::boost::{apply_ad_boost, apply_deposit_boost};
use crate::record::DepositRecord;
use crate::{LedgerError, LedgerParams, UserRecord};

/// The per-user accrual ledger.
///
/// Cheap to share behind an `Arc`; all interior state is the store handle
/// and the lock registry.
pub struct Ledger {
    pub(crate) store: Arc<dyn KvStore>,
    pub(crate) locks: KeyLocks,
    pub(crate) params: LedgerParams,
}

/// Caught-up mining state returned by [`Ledger::settle_and_report`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningStatus {
    pub balance: Amount,
    pub total_mined: Amount,
    pub current_mining_rate: miner_core::Rate,
    pub base_mining_rate: miner_core::Rate,
    pub ads_watched_today: u32,
    pub deposit_boost_cap: u32,
    pub seconds_to_reset: i64,
}

/// Result of a successful ad watch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdWatch {
    pub current_mining_rate: miner_core::Rate,
    pub ads_watched_today: u32,
    pub balance: Amount,
}

/// Result of a successful deposit-boost request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositOutcome {
    pub deposit_boost_cap: u32,
    pub ads_added: u32,
}

impl Ledger {
    /// Create a ledger over the given store.
    pub fn new(store: Arc<dyn KvStore>, params: LedgerParams) -> Self {
        Self {
            store,
            locks: KeyLocks::new(),
            params,
        }
    }

    /// The economic parameters in force.
    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    pub(crate) async fn load_user(&self, id: &str) -> Result<UserRecord, LedgerError> {
        get_json::<UserRecord>(self.store.as_ref(), &keys::user(id))
            .await?
            .ok_or(LedgerError::NotFound)
    }

    pub(crate) async fn save_user(&self, record: &UserRecord) -> Result<(), LedgerError> {
        put_json(self.store.as_ref(), &keys::user(&record.id), record).await?;
        Ok(())
    }

    /// Create an account for an externally-issued identity.
    ///
    /// Idempotent: if the record already exists it is returned unchanged.
    /// The referral-code index entry is written once per user and never
    /// mutated.
    pub async fn create_account(
        &self,
        id: &str,
        email: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<UserRecord, LedgerError> {
        validate_user_id(id)?;
        if email.trim().is_empty() || !email.contains('@') {
            return Err(LedgerError::Validation("invalid email address".into()));
        }
        if name.trim().is_empty() {
            return Err(LedgerError::Validation("name must not be empty".into()));
        }

        let _guard = self.locks.acquire(&keys::user(id)).await;

        if let Some(existing) =
            get_json::<UserRecord>(self.store.as_ref(), &keys::user(id)).await?
        {
            debug!(user = %id, "account already exists");
            return Ok(existing);
        }

        let record = UserRecord::new(id, email.trim(), name.trim(), now, &self.params);

        // Deterministic derivation makes collisions practically unreachable;
        // refuse creation rather than silently stealing another user's code.
        let code_key = keys::referral_code(&record.referral_code);
        match get_json::<String>(self.store.as_ref(), &code_key).await? {
            Some(owner) if owner != id => {
                return Err(LedgerError::Validation("referral code collision".into()));
            }
            _ => {}
        }
        put_json(self.store.as_ref(), &code_key, &record.id).await?;
        self.save_user(&record).await?;

        info!(user = %id, referral_code = %record.referral_code, "account created");
        Ok(record)
    }

    /// Read a user record without settling it.
    pub async fn get_profile(&self, id: &str) -> Result<UserRecord, LedgerError> {
        self.load_user(id).await
    }

    /// Settle accrual, persist the caught-up record, and report mining state.
    pub async fn settle_and_report(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<MiningStatus, LedgerError> {
        let _guard = self.locks.acquire(&keys::user(id)).await;

        let mut record = self.load_user(id).await?;
        settle(&mut record, now, &self.params);
        self.save_user(&record).await?;

        Ok(MiningStatus {
            balance: record.balance,
            total_mined: record.total_mined,
            current_mining_rate: record.current_mining_rate,
            base_mining_rate: record.base_mining_rate,
            ads_watched_today: record.ads_watched_today,
            deposit_boost_cap: record.deposit_boost_cap,
            seconds_to_reset: record.seconds_to_reset(now, &self.params),
        })
    }

    /// Apply one ad-watch boost.
    pub async fn watch_ad(&self, id: &str, now: DateTime<Utc>) -> Result<AdWatch, LedgerError> {
        let _guard = self.locks.acquire(&keys::user(id)).await;

        let mut record = self.load_user(id).await?;
        settle(&mut record, now, &self.params);
        apply_ad_boost(&mut record, now, &self.params)?;
        self.save_user(&record).await?;

        debug!(
            user = %id,
            ads = record.ads_watched_today,
            rate = %record.current_mining_rate,
            "ad boost applied"
        );
        Ok(AdWatch {
            current_mining_rate: record.current_mining_rate,
            ads_watched_today: record.ads_watched_today,
            balance: record.balance,
        })
    }

    /// Record a deposit request and raise the daily ad ceiling.
    ///
    /// Capacity increase only — deposits do not mint currency in this
    /// ledger. Settlement of the actual payment is an external manual step.
    pub async fn deposit_boost(
        &self,
        id: &str,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<DepositOutcome, LedgerError> {
        let _guard = self.locks.acquire(&keys::user(id)).await;

        let mut record = self.load_user(id).await?;
        settle(&mut record, now, &self.params);
        let ads_added = apply_deposit_boost(&mut record, amount, &self.params)?;
        self.save_user(&record).await?;

        let audit = DepositRecord {
            user_id: id.to_string(),
            amount,
            requested_at: now,
        };
        put_json(
            self.store.as_ref(),
            &keys::deposit(id, now.timestamp_millis()),
            &audit,
        )
        .await?;

        info!(user = %id, amount = %amount, ads_added, "deposit boost recorded");
        Ok(DepositOutcome {
            deposit_boost_cap: record.deposit_boost_cap,
            ads_added,
        })
    }
}

/// User ids come from the external identity provider but must stay safe to
/// embed in `:`-separated store keys.
fn validate_user_id(id: &str) -> Result<(), LedgerError> {
    if id.is_empty() || id.len() > 64 {
        return Err(LedgerError::Validation(
            "user id must be 1..=64 characters".into(),
        ));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(LedgerError::Validation(
            "user id may only contain alphanumerics, '-' and '_'".into(),
        ));
    }
    Ok(())
}
