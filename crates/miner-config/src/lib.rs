//! Configuration loading and CLI definitions.

use std::{fs, path::Path};

use clap::Parser;
use miner_core::defaults;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// API listen address, e.g. `127.0.0.1:8080`.
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

/// Economic parameters of the ledger. Amounts are micro-units
/// (1 unit = 1_000_000 micros); rates are micro-units per second.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_base_mining_rate")]
    pub base_mining_rate: u64,
    #[serde(default = "default_ad_boost_increment")]
    pub ad_boost_increment: u64,
    #[serde(default = "default_referee_bonus_rate")]
    pub referee_bonus_rate: u64,
    #[serde(default = "default_referral_bonus")]
    pub referral_bonus: u64,
    #[serde(default = "default_referral_ad_threshold")]
    pub referral_ad_threshold: u32,
    #[serde(default = "default_deposit_boost_cap")]
    pub default_deposit_boost_cap: u32,
    #[serde(default = "default_minimum_deposit")]
    pub minimum_deposit: u64,
    #[serde(default = "default_deposit_unit")]
    pub deposit_unit: u64,
    #[serde(default = "default_ads_per_unit")]
    pub ads_per_unit: u32,
    #[serde(default = "default_minimum_withdrawal")]
    pub minimum_withdrawal: u64,
    #[serde(default = "default_withdraw_eligibility_days")]
    pub withdraw_eligibility_days: i64,
    #[serde(default = "default_reset_window_secs")]
    pub reset_window_secs: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_mining_rate: default_base_mining_rate(),
            ad_boost_increment: default_ad_boost_increment(),
            referee_bonus_rate: default_referee_bonus_rate(),
            referral_bonus: default_referral_bonus(),
            referral_ad_threshold: default_referral_ad_threshold(),
            default_deposit_boost_cap: default_deposit_boost_cap(),
            minimum_deposit: default_minimum_deposit(),
            deposit_unit: default_deposit_unit(),
            ads_per_unit: default_ads_per_unit(),
            minimum_withdrawal: default_minimum_withdrawal(),
            withdraw_eligibility_days: default_withdraw_eligibility_days(),
            reset_window_secs: default_reset_window_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetricsConfig {
    /// Prometheus exporter listen address (`None` disables metrics).
    pub listen: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Base log level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Output format (json, compact, pretty).
    pub format: Option<String>,
    /// Output target (stdout, stderr).
    pub output: Option<String>,
}

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override API listen address, e.g. 0.0.0.0:8080
    #[arg(long)]
    pub listen: Option<String>,
    /// Override metrics listen address
    #[arg(long)]
    pub metrics_listen: Option<String>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
    /// Override log format (json/compact/pretty)
    #[arg(long)]
    pub log_format: Option<String>,
    /// Override base mining rate (micro-units per second)
    #[arg(long)]
    pub base_mining_rate: Option<u64>,
    /// Override per-ad rate increment (micro-units per second)
    #[arg(long)]
    pub ad_boost_increment: Option<u64>,
    /// Override minimum withdrawal (micro-units)
    #[arg(long)]
    pub minimum_withdrawal: Option<u64>,
    /// Override withdrawal eligibility delay (days)
    #[arg(long)]
    pub withdraw_eligibility_days: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported config format")]
    UnsupportedFormat,
    #[error("validation: {0}")]
    Validation(String),
}

/// Load a config file, dispatching on the extension (json/yaml/toml).
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    match path.extension().and_then(|s| s.to_str()).unwrap_or("") {
        "json" => Ok(serde_json::from_str(&data)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(&data)?),
        "toml" => Ok(toml::from_str(&data)?),
        _ => Err(ConfigError::UnsupportedFormat),
    }
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.listen {
        config.server.listen = v.clone();
    }
    if let Some(v) = &overrides.metrics_listen {
        config.metrics.listen = Some(v.clone());
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
    if let Some(v) = &overrides.log_format {
        config.logging.format = Some(v.clone());
    }
    if let Some(v) = overrides.base_mining_rate {
        config.ledger.base_mining_rate = v;
    }
    if let Some(v) = overrides.ad_boost_increment {
        config.ledger.ad_boost_increment = v;
    }
    if let Some(v) = overrides.minimum_withdrawal {
        config.ledger.minimum_withdrawal = v;
    }
    if let Some(v) = overrides.withdraw_eligibility_days {
        config.ledger.withdraw_eligibility_days = v;
    }
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.listen.trim().is_empty() {
        return Err(ConfigError::Validation("server.listen is empty".into()));
    }
    if config.ledger.base_mining_rate == 0 {
        return Err(ConfigError::Validation(
            "ledger.base_mining_rate must be > 0".into(),
        ));
    }
    if config.ledger.reset_window_secs <= 0 {
        return Err(ConfigError::Validation(
            "ledger.reset_window_secs must be > 0".into(),
        ));
    }
    if config.ledger.withdraw_eligibility_days < 0 {
        return Err(ConfigError::Validation(
            "ledger.withdraw_eligibility_days must be >= 0".into(),
        ));
    }
    if config.ledger.deposit_unit == 0 {
        return Err(ConfigError::Validation(
            "ledger.deposit_unit must be > 0".into(),
        ));
    }
    if config.ledger.minimum_withdrawal == 0 {
        return Err(ConfigError::Validation(
            "ledger.minimum_withdrawal must be > 0".into(),
        ));
    }
    if config.ledger.default_deposit_boost_cap == 0 {
        return Err(ConfigError::Validation(
            "ledger.default_deposit_boost_cap must be > 0".into(),
        ));
    }
    Ok(())
}

// ============================================================================
// Default Value Functions (for serde)
// ============================================================================

/// Generate default value functions that forward to miner_core::defaults.
macro_rules! default_fns {
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

default_fns! {
    default_base_mining_rate         => DEFAULT_BASE_MINING_RATE: u64,
    default_ad_boost_increment       => DEFAULT_AD_BOOST_INCREMENT: u64,
    default_referee_bonus_rate       => DEFAULT_REFEREE_BONUS_RATE: u64,
    default_referral_bonus           => DEFAULT_REFERRAL_BONUS: u64,
    default_referral_ad_threshold    => DEFAULT_REFERRAL_AD_THRESHOLD: u32,
    default_deposit_boost_cap        => DEFAULT_DEPOSIT_BOOST_CAP: u32,
    default_minimum_deposit          => DEFAULT_MINIMUM_DEPOSIT: u64,
    default_deposit_unit             => DEFAULT_DEPOSIT_UNIT: u64,
    default_ads_per_unit             => DEFAULT_ADS_PER_UNIT: u32,
    default_minimum_withdrawal       => DEFAULT_MINIMUM_WITHDRAWAL: u64,
    default_withdraw_eligibility_days => DEFAULT_WITHDRAW_ELIGIBILITY_DAYS: i64,
    default_reset_window_secs        => RESET_WINDOW_SECS: i64,
}

fn default_listen() -> String {
    defaults::DEFAULT_LISTEN.to_string()
}
