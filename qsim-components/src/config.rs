//! Configuration of a multi-teller queue
//!
//! A [`QueueConfig`] can be written out literally, assembled with
//! [`QueueConfig::builder`], or loaded from JSON. Every path ends in
//! [`Validate::validate`], so an accepted configuration always describes a
//! runnable simulation: the horizon and the retry backoff both convert to a
//! non-zero clock value inside the [`SimTime`](qsim_core::SimTime) range.

use crate::builder::{require, validate_non_zero, validate_positive, validate_sim_time, Validate};
use qsim_core::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Re-check attempts a waiting customer gets when none is configured.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Delay between a failed assignment check and the next one, in time units.
pub const DEFAULT_RETRY_BACKOFF: f64 = 0.1;
pub const DEFAULT_SEED: u64 = 42;

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_backoff() -> f64 {
    DEFAULT_RETRY_BACKOFF
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Parameters of one simulation run.
///
/// Times and rates share one unit: `simulation_time = 10` with
/// `arrival_rate = 0.5` expects about five arrivals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Number of parallel service stations
    pub num_tellers: usize,
    /// Virtual-time horizon
    pub simulation_time: f64,
    /// Mean arrivals per unit time
    pub arrival_rate: f64,
    /// Mean service completions per unit time per busy teller
    pub service_rate: f64,
    /// Counted re-check attempts before a waiting customer gives up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed delay between availability checks of a waiting customer
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff: f64,
    /// Seed of the arrival and service processes
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl QueueConfig {
    /// Configuration with default retry budget, backoff and seed.
    pub fn new(num_tellers: usize, simulation_time: f64, arrival_rate: f64, service_rate: f64) -> Self {
        Self {
            num_tellers,
            simulation_time,
            arrival_rate,
            service_rate,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            seed: DEFAULT_SEED,
        }
    }

    pub fn builder() -> QueueConfigBuilder {
        QueueConfigBuilder::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, retry_backoff: f64) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Offered load per teller, `arrival_rate / (num_tellers * service_rate)`.
    pub fn utilization(&self) -> f64 {
        self.arrival_rate / (self.num_tellers as f64 * self.service_rate)
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Malformed JSON, unknown fields, out-of-range values (e.g. a negative
    /// `max_retries`) and failed validation all map to
    /// [`SimError::InvalidConfiguration`].
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let config: QueueConfig = serde_json::from_str(json)
            .map_err(|e| SimError::invalid_config("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SimError::invalid_config("config", format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }
}

impl Validate for QueueConfig {
    fn validate(&self) -> SimResult<()> {
        validate_non_zero("num_tellers", self.num_tellers)?;
        validate_sim_time("simulation_time", self.simulation_time)?;
        validate_positive("arrival_rate", self.arrival_rate)?;
        validate_positive("service_rate", self.service_rate)?;
        validate_sim_time("retry_backoff", self.retry_backoff)?;
        Ok(())
    }
}

/// Fluent builder for [`QueueConfig`].
///
/// ```
/// use qsim_components::QueueConfig;
///
/// let config = QueueConfig::builder()
///     .num_tellers(2)
///     .simulation_time(10.0)
///     .arrival_rate(0.5)
///     .service_rate(0.5)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_retries, 3);
/// ```
#[derive(Debug, Default, Clone)]
pub struct QueueConfigBuilder {
    num_tellers: Option<usize>,
    simulation_time: Option<f64>,
    arrival_rate: Option<f64>,
    service_rate: Option<f64>,
    max_retries: Option<u32>,
    retry_backoff: Option<f64>,
    seed: Option<u64>,
}

impl QueueConfigBuilder {
    pub fn num_tellers(mut self, num_tellers: usize) -> Self {
        self.num_tellers = Some(num_tellers);
        self
    }

    pub fn simulation_time(mut self, simulation_time: f64) -> Self {
        self.simulation_time = Some(simulation_time);
        self
    }

    pub fn arrival_rate(mut self, arrival_rate: f64) -> Self {
        self.arrival_rate = Some(arrival_rate);
        self
    }

    pub fn service_rate(mut self, service_rate: f64) -> Self {
        self.service_rate = Some(service_rate);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn retry_backoff(mut self, retry_backoff: f64) -> Self {
        self.retry_backoff = Some(retry_backoff);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Assemble and validate the configuration.
    pub fn build(self) -> SimResult<QueueConfig> {
        let config = QueueConfig {
            num_tellers: require("num_tellers", self.num_tellers)?,
            simulation_time: require("simulation_time", self.simulation_time)?,
            arrival_rate: require("arrival_rate", self.arrival_rate)?,
            service_rate: require("service_rate", self.service_rate)?,
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_backoff: self.retry_backoff.unwrap_or(DEFAULT_RETRY_BACKOFF),
            seed: self.seed.unwrap_or(DEFAULT_SEED),
        };
        config.validate()?;
        Ok(config)
    }
}
