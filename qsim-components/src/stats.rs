//! Run statistics owned by the queue model
//!
//! Counters only ever grow. Waits (arrival to service start) are kept both as
//! an exact running sum and in an HDR histogram with microsecond resolution
//! for percentiles.

use hdrhistogram::Histogram;
use qsim_core::{SimError, SimResult};
use std::time::Duration;

const WAIT_SIGNIFICANT_DIGITS: u8 = 3;

#[derive(Debug, Clone)]
pub struct SimulationStats {
    pub total_customers_served: u64,
    pub total_retries: u64,
    pub total_abandoned: u64,
    /// Arrival events processed, i.e. customers generated
    pub customers_arrived: u64,
    /// Largest retry count any single customer reached
    pub max_customer_retries: u32,
    wait_total: Duration,
    wait_histogram: Histogram<u64>,
}

impl SimulationStats {
    pub fn new() -> SimResult<Self> {
        let wait_histogram = Histogram::new(WAIT_SIGNIFICANT_DIGITS)
            .map_err(|e| SimError::illegal_state(format!("wait histogram: {e:?}")))?;
        Ok(Self {
            total_customers_served: 0,
            total_retries: 0,
            total_abandoned: 0,
            customers_arrived: 0,
            max_customer_retries: 0,
            wait_total: Duration::ZERO,
            wait_histogram,
        })
    }

    /// Record the time a customer spent waiting before service started.
    pub fn record_wait(&mut self, wait: Duration) -> SimResult<()> {
        let micros = u64::try_from(wait.as_micros()).unwrap_or(u64::MAX);
        self.wait_histogram
            .record(micros)
            .map_err(|e| SimError::illegal_state(format!("wait histogram: {e:?}")))?;
        self.wait_total += wait;
        Ok(())
    }

    pub fn record_retry(&mut self, customer_retries: u32) {
        self.total_retries += 1;
        self.max_customer_retries = self.max_customer_retries.max(customer_retries);
    }

    /// Customers that started service
    pub fn services_started(&self) -> u64 {
        self.wait_histogram.len()
    }

    /// Exact mean wait in time units, 0 if nobody started service.
    pub fn mean_wait(&self) -> f64 {
        match self.services_started() {
            0 => 0.0,
            n => self.wait_total.as_secs_f64() / n as f64,
        }
    }

    /// Wait at quantile `q` (0..=1) in time units, 0 if nobody started service.
    pub fn wait_quantile(&self, q: f64) -> f64 {
        if self.services_started() == 0 {
            return 0.0;
        }
        self.wait_histogram.value_at_quantile(q) as f64 / 1_000_000.0
    }

    pub fn max_wait(&self) -> f64 {
        if self.services_started() == 0 {
            return 0.0;
        }
        self.wait_histogram.max() as f64 / 1_000_000.0
    }
}
