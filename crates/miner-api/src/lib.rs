//! HTTP request-handler boundary for the miner ledger.
//!
//! This module exposes the router and app state for use by integration
//! tests and potential embedding scenarios. Authentication itself is
//! delegated to an external identity provider; the handlers only consume
//! the opaque caller id and capability it injects.

pub mod cli;

mod error;
mod identity;
mod routes;
mod state;

pub use cli::ServerArgs;
pub use error::ApiError;
pub use identity::{Identity, CALLER_ID_HEADER, CAPABILITY_HEADER};
pub use routes::router;
pub use state::AppState;

use miner_config::LedgerConfig;
use miner_core::{Amount, Rate};
use miner_ledger::LedgerParams;

/// Translate the wire-level ledger configuration into ledger parameters.
pub fn ledger_params(config: &LedgerConfig) -> LedgerParams {
    LedgerParams {
        base_mining_rate: Rate::per_second(config.base_mining_rate),
        ad_boost_increment: Rate::per_second(config.ad_boost_increment),
        referee_bonus_rate: Rate::per_second(config.referee_bonus_rate),
        referral_bonus: Amount::from_micros(config.referral_bonus),
        referral_ad_threshold: config.referral_ad_threshold,
        default_deposit_boost_cap: config.default_deposit_boost_cap,
        minimum_deposit: Amount::from_micros(config.minimum_deposit),
        deposit_unit: Amount::from_micros(config.deposit_unit),
        ads_per_unit: config.ads_per_unit,
        minimum_withdrawal: Amount::from_micros(config.minimum_withdrawal),
        withdraw_eligibility: chrono::Duration::days(config.withdraw_eligibility_days),
        reset_window: chrono::Duration::seconds(config.reset_window_secs),
    }
}
