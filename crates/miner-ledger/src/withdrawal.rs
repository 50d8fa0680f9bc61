//! The withdrawal ledger.
//!
//! A withdrawal request debits the balance immediately and records a
//! `Pending` request; the actual payout is an external manual step, after
//! which an administrator marks the request settled. `Pending → Completed`
//! is terminal — there is no reversal path.

use chrono::{DateTime, Utc};
use miner_core::Amount;
use miner_store::{get_json, keys, put_json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::accrual::settle;
use crate::record::{WithdrawalRecord, WithdrawalStatus};
use crate::{Capability, Ledger, LedgerError};

/// Result of a successful withdrawal request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    pub id: String,
    pub balance: Amount,
}

impl Ledger {
    /// Request a withdrawal, debiting the settled balance immediately.
    ///
    /// The debit and the request record are written back-to-back under the
    /// user's lock; if the record write fails, the debit is compensated
    /// before the error propagates, so neither is observable without the
    /// other.
    pub async fn request_withdrawal(
        &self,
        user_id: &str,
        amount: Amount,
        payout_destination: &str,
        payee_name: &str,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalReceipt, LedgerError> {
        let payout_destination = payout_destination.trim();
        let payee_name = payee_name.trim();
        if payout_destination.is_empty() {
            return Err(LedgerError::Validation(
                "payout destination is required".into(),
            ));
        }
        if payee_name.is_empty() {
            return Err(LedgerError::Validation("payee name is required".into()));
        }
        if amount.is_zero() {
            return Err(LedgerError::Validation(
                "withdrawal amount must be positive".into(),
            ));
        }

        let _guard = self.locks.acquire(&keys::user(user_id)).await;

        let mut record = self.load_user(user_id).await?;
        settle(&mut record, now, &self.params);

        if now < record.withdraw_eligible_at {
            let remaining_secs = (record.withdraw_eligible_at - now).num_seconds();
            let days_remaining = (remaining_secs + 86_399) / 86_400;
            return Err(LedgerError::NotYetEligible { days_remaining });
        }
        if amount < self.params.minimum_withdrawal {
            return Err(LedgerError::BelowMinimum {
                minimum: self.params.minimum_withdrawal,
            });
        }
        let Some(new_balance) = record.balance.checked_sub(amount) else {
            return Err(LedgerError::InsufficientBalance);
        };

        // Same-millisecond requests for one user are possible under the
        // lock only across calls; nudge the timestamp until the key is free.
        let mut millis = now.timestamp_millis();
        while self.store.get(&keys::withdrawal(user_id, millis)).await?.is_some() {
            millis += 1;
        }

        let withdrawal = WithdrawalRecord {
            id: format!("{user_id}:{millis}"),
            user_id: user_id.to_string(),
            amount,
            payout_destination: payout_destination.to_string(),
            payee_name: payee_name.to_string(),
            status: WithdrawalStatus::Pending,
            requested_at: now,
            processed_at: None,
        };

        let prior_balance = record.balance;
        record.balance = new_balance;
        self.save_user(&record).await?;

        if let Err(e) = put_json(
            self.store.as_ref(),
            &keys::withdrawal(user_id, millis),
            &withdrawal,
        )
        .await
        {
            // Compensate the debit so no orphaned debit survives.
            record.balance = prior_balance;
            self.save_user(&record).await?;
            return Err(e.into());
        }

        info!(user = %user_id, id = %withdrawal.id, amount = %amount, "withdrawal requested");
        Ok(WithdrawalReceipt {
            id: withdrawal.id,
            balance: new_balance,
        })
    }

    /// The caller's own withdrawal records, oldest first.
    pub async fn list_withdrawals(
        &self,
        user_id: &str,
    ) -> Result<Vec<WithdrawalRecord>, LedgerError> {
        // Existence check keeps NotFound distinct from "no withdrawals yet".
        self.load_user(user_id).await?;
        self.collect_withdrawals(&keys::withdrawal_prefix(user_id))
            .await
    }

    /// All withdrawal records across users, oldest first. Admin only.
    pub async fn admin_list_all(
        &self,
        capability: Capability,
    ) -> Result<Vec<WithdrawalRecord>, LedgerError> {
        if !capability.is_admin() {
            return Err(LedgerError::Forbidden);
        }
        self.collect_withdrawals(keys::WITHDRAWAL_PREFIX).await
    }

    /// Mark a pending withdrawal settled. Admin only; terminal transition.
    ///
    /// Settling an already-completed withdrawal is a no-op: the original
    /// `processed_at` stamp is preserved.
    pub async fn admin_settle_withdrawal(
        &self,
        capability: Capability,
        withdrawal_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        if !capability.is_admin() {
            return Err(LedgerError::Forbidden);
        }

        let key = keys::withdrawal_by_id(withdrawal_id);
        let _guard = self.locks.acquire(&key).await;

        let mut record = get_json::<WithdrawalRecord>(self.store.as_ref(), &key)
            .await?
            .ok_or(LedgerError::NotFound)?;

        if record.status == WithdrawalStatus::Completed {
            return Ok(());
        }
        record.status = WithdrawalStatus::Completed;
        record.processed_at = Some(now);
        put_json(self.store.as_ref(), &key, &record).await?;

        info!(id = %withdrawal_id, "withdrawal settled");
        Ok(())
    }

    async fn collect_withdrawals(
        &self,
        prefix: &str,
    ) -> Result<Vec<WithdrawalRecord>, LedgerError> {
        let pairs = self.store.scan_prefix(prefix).await?;
        let mut records = Vec::with_capacity(pairs.len());
        for (_, value) in pairs {
            records.push(
                serde_json::from_value::<WithdrawalRecord>(value)
                    .map_err(miner_store::StoreError::from)?,
            );
        }
        // Keys sort lexicographically; millisecond suffixes need a numeric
        // order.
        records.sort_by_key(|r| r.requested_at);
        Ok(records)
    }
}
