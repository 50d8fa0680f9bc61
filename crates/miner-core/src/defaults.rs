//! Default configuration values.
//!
//! Centralized default constants for use across all crates. Amount-valued
//! constants are expressed in micro-units (1 currency unit = 1_000_000
//! micros); rate-valued constants in micro-units per second.

// ============================================================================
// Accrual Defaults
// ============================================================================

/// Base mining rate in micro-units per second.
pub const DEFAULT_BASE_MINING_RATE: u64 = 20;
/// Length of the daily accrual window in seconds (24 hours).
pub const RESET_WINDOW_SECS: i64 = 24 * 60 * 60;

// ============================================================================
// Boost Defaults
// ============================================================================

/// Rate increase per watched ad, micro-units per second.
pub const DEFAULT_AD_BOOST_INCREMENT: u64 = 10;
/// Default daily ad-watch ceiling for a fresh account.
pub const DEFAULT_DEPOSIT_BOOST_CAP: u32 = 50;
/// Minimum accepted deposit, micro-units (10 units).
pub const DEFAULT_MINIMUM_DEPOSIT: u64 = 10_000_000;
/// Deposit unit used for cap increases, micro-units (10 units).
pub const DEFAULT_DEPOSIT_UNIT: u64 = 10_000_000;
/// Extra daily ads granted per deposit unit.
pub const DEFAULT_ADS_PER_UNIT: u32 = 10;

// ============================================================================
// Referral Defaults
// ============================================================================

/// Temporary referee rate bonus at link time, micro-units per second.
pub const DEFAULT_REFEREE_BONUS_RATE: u64 = 30;
/// One-time referrer credit, micro-units (0.05 units).
pub const DEFAULT_REFERRAL_BONUS: u64 = 50_000;
/// Ads the referee must have watched for referral bonuses to fire.
pub const DEFAULT_REFERRAL_AD_THRESHOLD: u32 = 3;

// ============================================================================
// Withdrawal Defaults
// ============================================================================

/// Minimum withdrawal amount, micro-units (100 units).
pub const DEFAULT_MINIMUM_WITHDRAWAL: u64 = 100_000_000;
/// Days after account creation before the first withdrawal is permitted.
pub const DEFAULT_WITHDRAW_ELIGIBILITY_DAYS: i64 = 7;

// ============================================================================
// Server Defaults
// ============================================================================

/// Default API listen address.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

// ============================================================================
// Referral Code Format
// ============================================================================

/// Hex characters kept from the id digest when deriving a referral code.
pub const REFERRAL_CODE_LEN: usize = 8;
/// Prefix prepended to every referral code.
pub const REFERRAL_CODE_PREFIX: &str = "MINE-";
