//! Ledger error taxonomy.

use miner_core::{
    ERROR_BUSINESS_RULE, ERROR_FORBIDDEN, ERROR_NOT_FOUND, ERROR_STORE, ERROR_UNAUTHORIZED,
    ERROR_VALIDATION,
};
use miner_core::Amount;
use miner_store::StoreError;

/// Typed result of every core operation.
///
/// Business-rule violations carry a human-readable reason that is surfaced
/// verbatim to the end user. The core never retries; `Store` failures are a
/// caller concern.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Missing entity.
    #[error("not found")]
    NotFound,

    /// No or invalid caller identity.
    #[error("missing or invalid caller identity")]
    Unauthorized,

    /// Authenticated but lacking privilege.
    #[error("this operation requires the admin capability")]
    Forbidden,

    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// Ad ceiling hit for the current window; terminal until rollover.
    #[error("daily ad limit reached, more ads unlock at the next reset")]
    DailyLimitReached,

    /// Withdrawal requested before the eligibility window opened.
    #[error("withdrawals unlock in {days_remaining} day(s)")]
    NotYetEligible { days_remaining: i64 },

    /// Amount under the operation's minimum.
    #[error("amount is below the minimum of {minimum}")]
    BelowMinimum { minimum: Amount },

    /// Withdrawal amount exceeds the settled balance.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// Referral code resolves to the caller's own account.
    #[error("you cannot use your own referral code")]
    SelfReferral,

    /// The account already has a referrer linked.
    #[error("a referral code has already been applied to this account")]
    AlreadyReferred,

    /// Referral code does not exist.
    #[error("invalid referral code")]
    InvalidCode,

    /// Underlying key-value operation failed.
    #[error("store: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Get the error type string for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            LedgerError::NotFound => ERROR_NOT_FOUND,
            LedgerError::Unauthorized => ERROR_UNAUTHORIZED,
            LedgerError::Forbidden => ERROR_FORBIDDEN,
            LedgerError::Validation(_) => ERROR_VALIDATION,
            LedgerError::DailyLimitReached
            | LedgerError::NotYetEligible { .. }
            | LedgerError::BelowMinimum { .. }
            | LedgerError::InsufficientBalance
            | LedgerError::SelfReferral
            | LedgerError::AlreadyReferred
            | LedgerError::InvalidCode => ERROR_BUSINESS_RULE,
            LedgerError::Store(_) => ERROR_STORE,
        }
    }

    /// Whether this is a business-rule violation (user-visible, verbatim).
    pub fn is_business_rule(&self) -> bool {
        self.error_type() == ERROR_BUSINESS_RULE
    }
}
