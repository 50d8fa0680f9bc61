//! Persisted record types.

use chrono::{DateTime, Utc};
use miner_core::{defaults, Amount, Rate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha224};

use crate::LedgerParams;

/// The user record — keyed by `user:<id>`.
///
/// Mutated by every accrual-touching operation, never deleted. All currency
/// fields are micro-unit fixed point; `current_mining_rate >= base_mining_rate`
/// always holds, the difference being the sum of still-active boosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Withdrawable balance. Monotonic except for withdrawal debits.
    pub balance: Amount,
    /// Lifetime gross accrual, independent of withdrawals.
    pub total_mined: Amount,
    pub base_mining_rate: Rate,
    pub current_mining_rate: Rate,
    /// Count in `[0, deposit_boost_cap]`, reset at rollover.
    pub ads_watched_today: u32,
    /// Daily ad ceiling; raised by deposits, never lowered.
    pub deposit_boost_cap: u32,
    /// Start of the current 24-hour accrual window.
    pub last_reset_time: DateTime<Utc>,
    /// Last point at which accrual was settled into `balance`.
    pub mining_start_time: DateTime<Utc>,
    #[serde(default)]
    pub last_ad_watch_time: Option<DateTime<Utc>>,
    /// Derived deterministically from the id at creation; immutable.
    pub referral_code: String,
    /// One-time link to the referrer; never the user's own id.
    #[serde(default)]
    pub referred_by: Option<String>,
    /// Referees who have triggered the referrer bonus condition.
    #[serde(default)]
    pub referral_count: u32,
    /// Fixed at creation to `created_at + eligibility window`; immutable.
    pub withdraw_eligible_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Build a fresh record for a new account.
    pub fn new(
        id: &str,
        email: &str,
        name: &str,
        now: DateTime<Utc>,
        params: &LedgerParams,
    ) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            balance: Amount::ZERO,
            total_mined: Amount::ZERO,
            base_mining_rate: params.base_mining_rate,
            current_mining_rate: params.base_mining_rate,
            ads_watched_today: 0,
            deposit_boost_cap: params.default_deposit_boost_cap,
            last_reset_time: now,
            mining_start_time: now,
            last_ad_watch_time: None,
            referral_code: referral_code_for(id),
            referred_by: None,
            referral_count: 0,
            withdraw_eligible_at: now + params.withdraw_eligibility,
            created_at: now,
        }
    }

    /// Whether the eligibility window has passed.
    pub fn can_withdraw(&self, now: DateTime<Utc>) -> bool {
        now >= self.withdraw_eligible_at
    }

    /// Seconds until the next daily rollover, clamped to zero.
    pub fn seconds_to_reset(&self, now: DateTime<Utc>, params: &LedgerParams) -> i64 {
        let next = self.last_reset_time + params.reset_window;
        (next - now).num_seconds().max(0)
    }
}

/// Derive the referral code for a user id.
///
/// Deterministic: SHA-224 of the id, truncated to
/// [`REFERRAL_CODE_LEN`](defaults::REFERRAL_CODE_LEN) uppercase hex chars
/// behind a fixed prefix.
pub fn referral_code_for(id: &str) -> String {
    let mut hasher = Sha224::new();
    hasher.update(id.as_bytes());
    let digest = hasher.finalize();
    let hex = hex::encode(digest);
    format!(
        "{}{}",
        defaults::REFERRAL_CODE_PREFIX,
        hex[..defaults::REFERRAL_CODE_LEN].to_ascii_uppercase()
    )
}

/// Lifecycle of a withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    Pending,
    Completed,
}

/// A withdrawal request — keyed by `withdrawal:<user>:<millis>`.
///
/// Created with `Pending` status and the balance already debited; the only
/// later mutation is the terminal `Pending → Completed` transition performed
/// by an administrator once the payout settles externally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    /// Public id, `<user>:<millis>` — doubles as the store key suffix.
    pub id: String,
    pub user_id: String,
    pub amount: Amount,
    pub payout_destination: String,
    pub payee_name: String,
    pub status: WithdrawalStatus,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// A deposit request audit record — keyed by `deposit:<user>:<millis>`.
///
/// Deposits raise the daily ad cap only; they never mint currency. Actual
/// payment settlement happens outside this system, so the record is purely
/// an audit trail for the manual step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRecord {
    pub user_id: String,
    pub amount: Amount,
    pub requested_at: DateTime<Utc>,
}

#[cfg(test)]
mod record_tests {
    use super::*;

    #[test]
    fn referral_code_is_deterministic_and_formatted() {
        let a = referral_code_for("alice");
        let b = referral_code_for("alice");
        assert_eq!(a, b);
        assert!(a.starts_with("MINE-"));
        assert_eq!(a.len(), "MINE-".len() + 8);
        assert_ne!(a, referral_code_for("bob"));
    }

    #[test]
    fn new_record_fixes_eligibility_window() {
        let params = LedgerParams::default();
        let now = Utc::now();
        let record = UserRecord::new("u1", "u@e.com", "U", now, &params);
        assert_eq!(record.withdraw_eligible_at, now + chrono::Duration::days(7));
        assert!(!record.can_withdraw(now));
        assert!(record.can_withdraw(now + chrono::Duration::days(7)));
    }
}
