//! # Config
//!
//! Defines and implements configuration options for the flight router core.

use anyhow::Result;
use config::{ConfigError, Environment};
use dotenv::dotenv;
use serde::Deserialize;

use crate::revalidate::scoring::MatchingWeights;

/// Struct holding configuration options for the flight graph cache, the
/// reachability prune, the weekly-periodicity expander, and the offer
/// revalidator (spec §6 "Configuration (enumerated)").
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Cache TTL, in seconds, before a read triggers a background refresh.
    pub cache_ttl_seconds: u64,

    /// Reachability pruning hop limit `K` (default 2).
    pub prune_hop_limit: usize,

    /// Start of the base week the cached dataset represents, in epoch minutes.
    pub base_week_start_minutes: f64,

    /// End of the base week the cached dataset represents, in epoch minutes.
    pub base_week_end_minutes: f64,

    /// Max concurrent outbound requests the revalidator will issue.
    pub revalidator_max_concurrent: usize,

    /// Per-request timeout for the live offer API, in milliseconds.
    pub revalidator_request_timeout_ms: u64,

    /// Max retry attempts on HTTP 429 before giving up.
    pub revalidator_max_retries: u32,

    /// Exponential backoff multiplier applied after each 429.
    pub revalidator_backoff_multiplier: f64,

    /// Max % price delta for a `Confirmed` verdict.
    pub confirmed_threshold_pct: f64,

    /// Max % price delta for a `PriceChanged` verdict (beyond this, `Unavailable`).
    pub price_changed_threshold_pct: f64,

    /// Minimum confidence (0-100) required to accept a matched offer.
    pub min_confidence: f64,

    /// If true, hand the algorithm a defensive copy of the pruned flight
    /// table instead of relying on the read-only/shared-slice guarantee.
    pub defensive_copy: bool,

    /// Path to the log4rs YAML configuration file.
    pub log_config: String,
}

impl Default for Config {
    fn default() -> Self {
        log::warn!("(default) Creating Config object with default values.");
        Self::new()
    }
}

impl Config {
    /// Default values for Config.
    pub fn new() -> Self {
        Config {
            cache_ttl_seconds: 300,
            prune_hop_limit: 2,
            // Base week 2026-07-13 (Mon) 00:00 .. 2026-07-19 (Sun) 23:59, in
            // minutes since the crate's fixed epoch (see `crate::schema::EPOCH_REFERENCE`).
            base_week_start_minutes: 0.0,
            base_week_end_minutes: 7.0 * 24.0 * 60.0 - 1.0,
            revalidator_max_concurrent: 3,
            revalidator_request_timeout_ms: 10_000,
            revalidator_max_retries: 5,
            revalidator_backoff_multiplier: 2.0,
            confirmed_threshold_pct: 5.0,
            price_changed_threshold_pct: 25.0,
            min_confidence: 30.0,
            defensive_copy: false,
            log_config: String::from("log4rs.yaml"),
        }
    }

    /// The offer-matching scoring weights. Not sourced from environment
    /// variables (too many knobs for that to be ergonomic); override by
    /// constructing a [`MatchingWeights`] directly if defaults don't fit.
    pub fn matching_weights(&self) -> MatchingWeights {
        MatchingWeights::default()
    }

    /// Create a new `Config` object using environment variables, falling
    /// back to [`Config::new`]'s defaults for anything unset.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let default_config = Config::default();

        config::Config::builder()
            .set_default("cache_ttl_seconds", default_config.cache_ttl_seconds)?
            .set_default("prune_hop_limit", default_config.prune_hop_limit as i64)?
            .set_default(
                "base_week_start_minutes",
                default_config.base_week_start_minutes,
            )?
            .set_default(
                "base_week_end_minutes",
                default_config.base_week_end_minutes,
            )?
            .set_default(
                "revalidator_max_concurrent",
                default_config.revalidator_max_concurrent as i64,
            )?
            .set_default(
                "revalidator_request_timeout_ms",
                default_config.revalidator_request_timeout_ms,
            )?
            .set_default(
                "revalidator_max_retries",
                default_config.revalidator_max_retries as i64,
            )?
            .set_default(
                "revalidator_backoff_multiplier",
                default_config.revalidator_backoff_multiplier,
            )?
            .set_default(
                "confirmed_threshold_pct",
                default_config.confirmed_threshold_pct,
            )?
            .set_default(
                "price_changed_threshold_pct",
                default_config.price_changed_threshold_pct,
            )?
            .set_default("min_confidence", default_config.min_confidence)?
            .set_default("defensive_copy", default_config.defensive_copy)?
            .set_default("log_config", default_config.log_config)?
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}
