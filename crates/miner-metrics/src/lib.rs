//! Metrics collection and Prometheus exporter for the miner ledger.
//!
//! Provides operation counters for the ledger's request surface plus
//! rejection counters labelled by error type.

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Initialize Prometheus metrics exporter.
///
/// Starts an HTTP server on the given address to expose metrics.
/// Returns an error message if binding fails.
pub fn init_prometheus(listen: &str) -> Result<(), String> {
    let addr: SocketAddr = listen
        .parse()
        .map_err(|e| format!("invalid metrics listen address: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("failed to install prometheus exporter: {}", e))?;

    Ok(())
}

// ============================================================================
// Metric Names
// ============================================================================

/// Total accounts created.
pub const ACCOUNTS_CREATED_TOTAL: &str = "miner_accounts_created_total";
/// Total settle-and-report operations.
pub const SETTLES_TOTAL: &str = "miner_settles_total";
/// Total successful ad boosts.
pub const AD_BOOSTS_TOTAL: &str = "miner_ad_boosts_total";
/// Total successful deposit boosts.
pub const DEPOSIT_BOOSTS_TOTAL: &str = "miner_deposit_boosts_total";
/// Total referral links created.
pub const REFERRALS_LINKED_TOTAL: &str = "miner_referrals_linked_total";
/// Total one-time referrer bonuses granted.
pub const REFERRAL_BONUSES_TOTAL: &str = "miner_referral_bonuses_total";
/// Total withdrawal requests accepted.
pub const WITHDRAWALS_REQUESTED_TOTAL: &str = "miner_withdrawals_requested_total";
/// Total withdrawals settled by an administrator.
pub const WITHDRAWALS_SETTLED_TOTAL: &str = "miner_withdrawals_settled_total";
/// Total rejected operations, by error type.
pub const REJECTIONS_TOTAL: &str = "miner_rejections_total";

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record an account creation.
#[inline]
pub fn record_account_created() {
    counter!(ACCOUNTS_CREATED_TOTAL).increment(1);
}

/// Record a settle-and-report.
#[inline]
pub fn record_settle() {
    counter!(SETTLES_TOTAL).increment(1);
}

/// Record a successful ad boost.
#[inline]
pub fn record_ad_boost() {
    counter!(AD_BOOSTS_TOTAL).increment(1);
}

/// Record a successful deposit boost.
#[inline]
pub fn record_deposit_boost() {
    counter!(DEPOSIT_BOOSTS_TOTAL).increment(1);
}

/// Record a referral link.
#[inline]
pub fn record_referral_linked() {
    counter!(REFERRALS_LINKED_TOTAL).increment(1);
}

/// Record a granted referrer bonus.
#[inline]
pub fn record_referral_bonus() {
    counter!(REFERRAL_BONUSES_TOTAL).increment(1);
}

/// Record an accepted withdrawal request.
#[inline]
pub fn record_withdrawal_requested() {
    counter!(WITHDRAWALS_REQUESTED_TOTAL).increment(1);
}

/// Record an admin-settled withdrawal.
#[inline]
pub fn record_withdrawal_settled() {
    counter!(WITHDRAWALS_SETTLED_TOTAL).increment(1);
}

/// Record a rejected operation by error type.
#[inline]
pub fn record_rejection(error_type: &'static str) {
    counter!(REJECTIONS_TOTAL, "type" => error_type).increment(1);
}

// ============================================================================
// Error Type Constants (re-exported from miner-core)
// ============================================================================

pub use miner_core::{
    ERROR_BUSINESS_RULE, ERROR_FORBIDDEN, ERROR_NOT_FOUND, ERROR_STORE, ERROR_UNAUTHORIZED,
    ERROR_VALIDATION,
};
