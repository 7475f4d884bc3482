//! Distribution traits and implementations for arrival patterns and service times
//!
//! This module provides the random processes that drive a queueing model:
//! inter-arrival gaps for the arrival stream and service durations for the
//! tellers. All random implementations are seeded explicitly; there is no
//! hidden process-wide random state.

use crate::error::{SimError, SimResult};
use crate::randomness::{derive_seed, STREAM_ARRIVALS, STREAM_SERVICE};
use crate::SimTime;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Exp;

/// Trait for generating arrival patterns
///
/// This trait abstracts over different arrival patterns (Poisson, constant, ...).
pub trait ArrivalPattern: Send {
    /// Get the time until the next arrival
    fn next_arrival_time(&mut self) -> SimResult<SimTime>;
}

/// Trait for sampling service times from a distribution
pub trait ServiceTimeDistribution: Send {
    /// Sample the duration of a single service
    fn sample(&mut self) -> SimResult<SimTime>;
}

fn validate_rate(field: &'static str, rate: f64) -> SimResult<Exp<f64>> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(SimError::invalid_config(
            field,
            format!("rate must be positive and finite, got {rate}"),
        ));
    }
    Exp::new(rate).map_err(|e| SimError::invalid_config(field, e.to_string()))
}

/// Draw one exponential sample and turn it into a delay.
fn sample_delay(site: &'static str, rng: &mut ChaCha8Rng, exp: Exp<f64>) -> SimResult<SimTime> {
    let secs: f64 = rng.sample(exp);
    if !secs.is_finite() || secs < 0.0 {
        return Err(SimError::SamplingFailure { site, value: secs });
    }
    SimTime::try_from_secs_f64(secs).map_err(|_| SimError::SamplingFailure { site, value: secs })
}

// =============================================================================
// Arrival Pattern Implementations
// =============================================================================

/// Constant arrival pattern
///
/// Generates arrivals with a fixed inter-arrival time.
#[derive(Debug, Clone)]
pub struct ConstantArrivalPattern {
    inter_arrival_time: SimTime,
}

impl ConstantArrivalPattern {
    pub fn new(inter_arrival_time: SimTime) -> Self {
        Self { inter_arrival_time }
    }
}

impl ArrivalPattern for ConstantArrivalPattern {
    fn next_arrival_time(&mut self) -> SimResult<SimTime> {
        Ok(self.inter_arrival_time)
    }
}

/// Poisson arrival pattern
///
/// Generates arrivals according to a Poisson process with exponentially
/// distributed inter-arrival times (mean `1 / rate`).
pub struct PoissonArrivals {
    /// Rate parameter (lambda) - average arrivals per unit time
    rate: f64,
    rng: ChaCha8Rng,
    exp_dist: Exp<f64>,
}

impl PoissonArrivals {
    /// Create a new Poisson arrival pattern
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if `rate` is not positive and finite.
    pub fn new(rate: f64, seed: u64) -> SimResult<Self> {
        Ok(Self {
            rate,
            rng: ChaCha8Rng::seed_from_u64(seed),
            exp_dist: validate_rate("arrival_rate", rate)?,
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl ArrivalPattern for PoissonArrivals {
    fn next_arrival_time(&mut self) -> SimResult<SimTime> {
        sample_delay("inter-arrival", &mut self.rng, self.exp_dist)
    }
}

// =============================================================================
// Service Time Distribution Implementations
// =============================================================================

/// Constant service time distribution
#[derive(Debug, Clone)]
pub struct ConstantServiceTime {
    duration: SimTime,
}

impl ConstantServiceTime {
    pub fn new(duration: SimTime) -> Self {
        Self { duration }
    }
}

impl ServiceTimeDistribution for ConstantServiceTime {
    fn sample(&mut self) -> SimResult<SimTime> {
        Ok(self.duration)
    }
}

/// Exponential service time distribution
///
/// Samples service times with mean `1 / rate`, the classic M/M/k server.
pub struct ExponentialServiceTime {
    /// Rate parameter (mu) - average services per unit time
    rate: f64,
    rng: ChaCha8Rng,
    exp_dist: Exp<f64>,
}

impl ExponentialServiceTime {
    /// Create a new exponential service time distribution
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if `rate` is not positive and finite.
    pub fn new(rate: f64, seed: u64) -> SimResult<Self> {
        Ok(Self {
            rate,
            rng: ChaCha8Rng::seed_from_u64(seed),
            exp_dist: validate_rate("service_rate", rate)?,
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Mean service time (1/rate) in time units
    pub fn mean_service_time(&self) -> f64 {
        1.0 / self.rate
    }
}

impl ServiceTimeDistribution for ExponentialServiceTime {
    fn sample(&mut self) -> SimResult<SimTime> {
        sample_delay("service-time", &mut self.rng, self.exp_dist)
    }
}

// =============================================================================
// Random Process Generator
// =============================================================================

/// The pair of random processes feeding a queueing model.
///
/// Arrivals and services draw from independent streams derived from one seed,
/// so the same seed and rates reproduce the same sample sequences.
pub struct RandomProcessGenerator {
    arrivals: Box<dyn ArrivalPattern>,
    service: Box<dyn ServiceTimeDistribution>,
}

impl RandomProcessGenerator {
    /// Exponential inter-arrival and service times.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if either rate is not
    /// positive and finite. Nothing is sampled before construction succeeds.
    pub fn exponential(arrival_rate: f64, service_rate: f64, seed: u64) -> SimResult<Self> {
        let arrivals = PoissonArrivals::new(arrival_rate, derive_seed(seed, STREAM_ARRIVALS, 0))?;
        let service =
            ExponentialServiceTime::new(service_rate, derive_seed(seed, STREAM_SERVICE, 0))?;
        Ok(Self::from_parts(Box::new(arrivals), Box::new(service)))
    }

    /// Build a generator from arbitrary processes, e.g. constant ones for
    /// hand-checked scenarios.
    pub fn from_parts(
        arrivals: Box<dyn ArrivalPattern>,
        service: Box<dyn ServiceTimeDistribution>,
    ) -> Self {
        Self { arrivals, service }
    }

    pub fn next_interarrival_time(&mut self) -> SimResult<SimTime> {
        self.arrivals.next_arrival_time()
    }

    pub fn next_service_time(&mut self) -> SimResult<SimTime> {
        self.service.sample()
    }
}
