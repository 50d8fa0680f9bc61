//! The referral ledger.
//!
//! Two operations: the one-time referee→referrer linkage (with its link-time
//! rate boosts), and the idempotent one-time referrer payout guarded by a
//! persisted bonus marker. Both touch two user records, so both take the
//! pair of user locks in lexicographic order — the two single-key writes are
//! not atomic together, but each is applied at most once.

use chrono::{DateTime, Utc};
use miner_store::{get_json, keys, put_json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::accrual::settle;
use crate::{Ledger, LedgerError};

/// Result of a referrer-bonus check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BonusOutcome {
    pub granted: bool,
}

impl Ledger {
    /// Link `referee_id` to the owner of `code`, one time only.
    ///
    /// If the referee is already at the ad threshold when the link happens,
    /// the referee gets a temporary rate bonus and the referrer gets a fixed
    /// rate boost plus a referral count increment. That dual condition is
    /// evaluated once, at link time — never retroactively.
    pub async fn apply_referral_code(
        &self,
        referee_id: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let code = code.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(LedgerError::Validation("referral code is required".into()));
        }

        // One-time linkage wins over code validity: an already-linked
        // referee gets AlreadyReferred no matter what code it sends.
        // Re-checked under the lock below.
        if self.load_user(referee_id).await?.referred_by.is_some() {
            return Err(LedgerError::AlreadyReferred);
        }

        let referrer_id = get_json::<String>(self.store.as_ref(), &keys::referral_code(&code))
            .await?
            .ok_or(LedgerError::InvalidCode)?;
        if referrer_id == referee_id {
            return Err(LedgerError::SelfReferral);
        }

        let _guards = self
            .locks
            .acquire_pair(&keys::user(referee_id), &keys::user(&referrer_id))
            .await;

        let mut referee = self.load_user(referee_id).await?;
        if referee.referred_by.is_some() {
            return Err(LedgerError::AlreadyReferred);
        }
        // Index entry pointing at a missing record means the code is dead.
        let mut referrer = match get_json::<crate::UserRecord>(
            self.store.as_ref(),
            &keys::user(&referrer_id),
        )
        .await?
        {
            Some(record) => record,
            None => return Err(LedgerError::InvalidCode),
        };

        settle(&mut referee, now, &self.params);
        settle(&mut referrer, now, &self.params);

        referee.referred_by = Some(referrer_id.clone());

        let at_threshold = referee.ads_watched_today >= self.params.referral_ad_threshold;
        if at_threshold {
            referee.current_mining_rate += self.params.referee_bonus_rate;
            referrer.current_mining_rate += self.params.referrer_link_bonus();
            referrer.referral_count += 1;
        }

        // The link is the operation's promise; write it first. A failure
        // after this point leaves the referrer without the boost, which a
        // repeated call cannot double-apply.
        self.save_user(&referee).await?;
        if at_threshold {
            self.save_user(&referrer).await?;
        }

        info!(
            referee = %referee_id,
            referrer = %referrer_id,
            boosted = at_threshold,
            "referral code applied"
        );
        Ok(())
    }

    /// Grant the one-time referrer payout if all conditions hold.
    ///
    /// Idempotent via the persisted bonus marker for the
    /// `(referrer, referee)` pair: once true it is never reset, and the
    /// check runs under both user locks so concurrent calls cannot both
    /// observe it absent. The marker is written immediately after the
    /// credit; a store failure between the two writes leaves the credit
    /// without its marker, the tightest window the store allows.
    pub async fn check_and_grant_mining_bonus(
        &self,
        referee_id: &str,
        now: DateTime<Utc>,
    ) -> Result<BonusOutcome, LedgerError> {
        // Peek to learn the referrer id; re-read under the locks below.
        let peek = self.load_user(referee_id).await?;
        let Some(referrer_id) = peek.referred_by else {
            return Ok(BonusOutcome { granted: false });
        };

        let _guards = self
            .locks
            .acquire_pair(&keys::user(referee_id), &keys::user(&referrer_id))
            .await;

        let mut referee = self.load_user(referee_id).await?;
        settle(&mut referee, now, &self.params);
        self.save_user(&referee).await?;

        let qualifies = referee.referred_by.as_deref() == Some(referrer_id.as_str())
            && referee.ads_watched_today >= self.params.referral_ad_threshold
            && !referee.total_mined.is_zero();
        if !qualifies {
            return Ok(BonusOutcome { granted: false });
        }

        let marker_key = keys::referral_bonus(&referrer_id, referee_id);
        if get_json::<bool>(self.store.as_ref(), &marker_key)
            .await?
            .unwrap_or(false)
        {
            return Ok(BonusOutcome { granted: false });
        }

        let mut referrer = match get_json::<crate::UserRecord>(
            self.store.as_ref(),
            &keys::user(&referrer_id),
        )
        .await?
        {
            Some(record) => record,
            None => {
                warn!(referee = %referee_id, referrer = %referrer_id, "referrer record missing");
                return Ok(BonusOutcome { granted: false });
            }
        };

        settle(&mut referrer, now, &self.params);
        referrer.balance += self.params.referral_bonus;
        self.save_user(&referrer).await?;
        put_json(self.store.as_ref(), &marker_key, &true).await?;

        info!(
            referee = %referee_id,
            referrer = %referrer_id,
            bonus = %self.params.referral_bonus,
            "referrer bonus granted"
        );
        Ok(BonusOutcome { granted: true })
    }
}
