//! The accrual engine.
//!
//! Balance is a function of elapsed time and the current rate. Nothing runs
//! on a timer: rollover is computed lazily the next time a record is
//! touched, so an account idle for days still resets correctly.

use chrono::{DateTime, Utc};

use crate::{LedgerParams, UserRecord};

/// Settle elapsed-time earnings into the record and apply a daily rollover
/// if the 24-hour window has passed.
///
/// Pure given `(record, now)` and idempotent when `now` does not advance.
/// Earnings are settled at the pre-rollover (possibly boosted) rate before
/// the rollover resets it, so boosted time is never retroactively repriced.
///
/// A record with a future `mining_start_time` is a store error condition,
/// not a negative-earnings condition: elapsed time clamps to zero and the
/// start point is repaired to `now`.
pub fn settle(record: &mut UserRecord, now: DateTime<Utc>, params: &LedgerParams) {
    // Millisecond resolution: callers settle at arbitrary cadence, and a
    // whole-second floor would drop the fraction of every settle.
    let elapsed_ms = (now - record.mining_start_time).num_milliseconds().max(0) as u64;
    if elapsed_ms > 0 {
        let earned = record.current_mining_rate.for_millis(elapsed_ms);
        record.balance += earned;
        record.total_mined += earned;
    }
    record.mining_start_time = now;

    if now - record.last_reset_time >= params.reset_window {
        record.current_mining_rate = record.base_mining_rate;
        record.ads_watched_today = 0;
        record.last_reset_time = now;
    }
}
