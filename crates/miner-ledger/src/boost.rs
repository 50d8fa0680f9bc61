//! The boost manager.
//!
//! Boosts are additive rate increases that live until the next daily
//! rollover — there are no per-boost expiry timers. Deposits raise the
//! daily ad ceiling only; they never credit balance.

use chrono::{DateTime, Utc};
use miner_core::Amount;

use crate::{LedgerError, LedgerParams, UserRecord};

/// Apply one ad-watch boost to an already-settled record.
///
/// Fails with [`LedgerError::DailyLimitReached`] once the daily ceiling is
/// hit; that condition is terminal for the current window, not retryable.
pub fn apply_ad_boost(
    record: &mut UserRecord,
    now: DateTime<Utc>,
    params: &LedgerParams,
) -> Result<(), LedgerError> {
    if record.ads_watched_today >= record.deposit_boost_cap {
        return Err(LedgerError::DailyLimitReached);
    }
    record.current_mining_rate += params.ad_boost_increment;
    record.ads_watched_today += 1;
    record.last_ad_watch_time = Some(now);
    Ok(())
}

/// Raise the daily ad ceiling for a deposit of `amount`.
///
/// The cap grows by `floor(amount / deposit_unit) * ads_per_unit` and is
/// never lowered. Returns the number of ads added.
pub fn apply_deposit_boost(
    record: &mut UserRecord,
    amount: Amount,
    params: &LedgerParams,
) -> Result<u32, LedgerError> {
    if amount < params.minimum_deposit {
        return Err(LedgerError::BelowMinimum {
            minimum: params.minimum_deposit,
        });
    }
    let units = amount.micros() / params.deposit_unit.micros();
    let added = u32::try_from(units.saturating_mul(u64::from(params.ads_per_unit)))
        .unwrap_or(u32::MAX);
    record.deposit_boost_cap = record.deposit_boost_cap.saturating_add(added);
    Ok(added)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use miner_core::Rate;

    use super::*;

    fn setup() -> (UserRecord, LedgerParams, DateTime<Utc>) {
        let params = LedgerParams::default();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let record = UserRecord::new("u1", "u1@example.com", "U1", now, &params);
        (record, params, now)
    }

    #[test]
    fn n_boosts_raise_rate_by_n_increments() {
        let (mut record, params, now) = setup();
        let base = record.base_mining_rate;

        for n in 1..=5u64 {
            apply_ad_boost(&mut record, now, &params).unwrap();
            let expected = Rate::per_second(
                base.micros_per_second() + n * params.ad_boost_increment.micros_per_second(),
            );
            assert_eq!(record.current_mining_rate, expected);
            assert_eq!(record.ads_watched_today, n as u32);
        }
        assert_eq!(record.last_ad_watch_time, Some(now));
    }

    #[test]
    fn boost_fails_at_the_cap() {
        let (mut record, params, now) = setup();
        record.deposit_boost_cap = 2;

        apply_ad_boost(&mut record, now, &params).unwrap();
        apply_ad_boost(&mut record, now, &params).unwrap();
        let err = apply_ad_boost(&mut record, now, &params).unwrap_err();
        assert!(matches!(err, LedgerError::DailyLimitReached));
        assert_eq!(record.ads_watched_today, 2);
    }

    #[test]
    fn deposit_raises_cap_without_minting() {
        let (mut record, params, _) = setup();
        let cap_before = record.deposit_boost_cap;

        // 25 units at a 10-unit deposit unit => 2 full units => 20 ads.
        let added = apply_deposit_boost(&mut record, Amount::from_units(25), &params).unwrap();
        assert_eq!(added, 20);
        assert_eq!(record.deposit_boost_cap, cap_before + 20);
        assert!(record.balance.is_zero());
    }

    #[test]
    fn deposit_below_minimum_is_rejected() {
        let (mut record, params, _) = setup();
        let err = apply_deposit_boost(&mut record, Amount::from_units(5), &params).unwrap_err();
        assert!(matches!(err, LedgerError::BelowMinimum { .. }));
        assert_eq!(record.deposit_boost_cap, params.default_deposit_boost_cap);
    }
}
