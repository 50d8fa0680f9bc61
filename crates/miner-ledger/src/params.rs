//! Tunable economic parameters of the ledger.

use chrono::Duration;
use miner_core::{defaults, Amount, Rate};

/// Economic parameters, defaulting to the values in [`miner_core::defaults`].
///
/// Deployments override these through configuration; tests shrink windows
/// and rates to convenient values.
#[derive(Debug, Clone)]
pub struct LedgerParams {
    /// Rate every account starts (and resets) at.
    pub base_mining_rate: Rate,
    /// Rate increase per watched ad, until the next rollover.
    pub ad_boost_increment: Rate,
    /// Temporary referee rate bonus granted at link time.
    pub referee_bonus_rate: Rate,
    /// One-time referrer balance credit.
    pub referral_bonus: Amount,
    /// Ads the referee must have watched for referral bonuses to fire.
    pub referral_ad_threshold: u32,
    /// Daily ad ceiling for a fresh account.
    pub default_deposit_boost_cap: u32,
    /// Minimum accepted deposit.
    pub minimum_deposit: Amount,
    /// Deposit unit for cap increases.
    pub deposit_unit: Amount,
    /// Extra daily ads granted per deposit unit.
    pub ads_per_unit: u32,
    /// Minimum withdrawal amount.
    pub minimum_withdrawal: Amount,
    /// Delay after account creation before the first withdrawal.
    pub withdraw_eligibility: Duration,
    /// Length of the daily accrual window.
    pub reset_window: Duration,
}

impl LedgerParams {
    /// Rate increase granted to the referrer when a referee links at the
    /// ad threshold: twice the per-ad increment.
    pub fn referrer_link_bonus(&self) -> Rate {
        Rate::per_second(self.ad_boost_increment.micros_per_second().saturating_mul(2))
    }
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            base_mining_rate: Rate::per_second(defaults::DEFAULT_BASE_MINING_RATE),
            ad_boost_increment: Rate::per_second(defaults::DEFAULT_AD_BOOST_INCREMENT),
            referee_bonus_rate: Rate::per_second(defaults::DEFAULT_REFEREE_BONUS_RATE),
            referral_bonus: Amount::from_micros(defaults::DEFAULT_REFERRAL_BONUS),
            referral_ad_threshold: defaults::DEFAULT_REFERRAL_AD_THRESHOLD,
            default_deposit_boost_cap: defaults::DEFAULT_DEPOSIT_BOOST_CAP,
            minimum_deposit: Amount::from_micros(defaults::DEFAULT_MINIMUM_DEPOSIT),
            deposit_unit: Amount::from_micros(defaults::DEFAULT_DEPOSIT_UNIT),
            ads_per_unit: defaults::DEFAULT_ADS_PER_UNIT,
            minimum_withdrawal: Amount::from_micros(defaults::DEFAULT_MINIMUM_WITHDRAWAL),
            withdraw_eligibility: Duration::days(defaults::DEFAULT_WITHDRAW_ELIGIBILITY_DAYS),
            reset_window: Duration::seconds(defaults::RESET_WINDOW_SECS),
        }
    }
}
