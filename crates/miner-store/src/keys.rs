//! Conceptual key space of the ledger.
//!
//! All keys are flat strings with `:`-separated segments. User ids are
//! opaque but may not contain `:` (enforced at account creation), so the
//! segment boundaries stay unambiguous.

/// Prefix under which every withdrawal record lives.
pub const WITHDRAWAL_PREFIX: &str = "withdrawal:";

/// `user:<id>` — the user record.
pub fn user(id: &str) -> String {
    format!("user:{id}")
}

/// `referral-code:<CODE>` — maps a referral code to its owning user id.
pub fn referral_code(code: &str) -> String {
    format!("referral-code:{code}")
}

/// `referral-bonus:<referrer>:<referee>` — one-time bonus marker.
pub fn referral_bonus(referrer_id: &str, referee_id: &str) -> String {
    format!("referral-bonus:{referrer_id}:{referee_id}")
}

/// `withdrawal:<user>:<millis>` — a withdrawal request record.
///
/// The `<user>:<millis>` suffix doubles as the withdrawal id, so
/// [`withdrawal_by_id`] can reconstruct the key from an id alone.
pub fn withdrawal(user_id: &str, requested_millis: i64) -> String {
    format!("{WITHDRAWAL_PREFIX}{user_id}:{requested_millis}")
}

/// Key for a withdrawal given its public id (`<user>:<millis>`).
pub fn withdrawal_by_id(withdrawal_id: &str) -> String {
    format!("{WITHDRAWAL_PREFIX}{withdrawal_id}")
}

/// Scan prefix covering one user's withdrawal records.
pub fn withdrawal_prefix(user_id: &str) -> String {
    format!("{WITHDRAWAL_PREFIX}{user_id}:")
}

/// `deposit:<user>:<millis>` — a deposit request audit record.
pub fn deposit(user_id: &str, requested_millis: i64) -> String {
    format!("deposit:{user_id}:{requested_millis}")
}
