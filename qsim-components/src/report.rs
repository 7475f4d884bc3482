//! Post-run statistics

use crate::config::QueueConfig;
use crate::model::QueueModel;
use qsim_core::{SimError, SimResult, SimTime, Simulation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything a finished run measured. Times are in simulation time units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub num_tellers: usize,
    pub simulation_time: f64,
    pub total_customers_served: u64,
    pub total_retries: u64,
    pub total_abandoned: u64,
    pub customers_arrived: u64,
    /// Customers still waiting when the horizon was reached
    pub waiting_at_cutoff: u64,
    /// Customers still being served when the horizon was reached
    pub in_service_at_cutoff: u64,
    pub max_customer_retries: u32,
    pub events_processed: u64,
    /// Time of the last processed event
    pub final_time: f64,
    pub mean_wait: f64,
    pub p50_wait: f64,
    pub p99_wait: f64,
    pub max_wait: f64,
    /// Fraction of teller capacity spent serving over the whole horizon
    pub utilization: f64,
}

impl SimulationReport {
    pub(crate) fn collect(
        config: &QueueConfig,
        horizon: SimTime,
        simulation: &Simulation<QueueModel>,
    ) -> Self {
        let model = simulation.component();
        let stats = model.stats();
        let lifecycle = model.lifecycle();
        let capacity = config.num_tellers as f64 * horizon.as_secs_f64();

        Self {
            seed: config.seed,
            num_tellers: config.num_tellers,
            simulation_time: config.simulation_time,
            total_customers_served: stats.total_customers_served,
            total_retries: stats.total_retries,
            total_abandoned: stats.total_abandoned,
            customers_arrived: stats.customers_arrived,
            waiting_at_cutoff: lifecycle.waiting_count() as u64,
            in_service_at_cutoff: lifecycle.in_service_count() as u64,
            max_customer_retries: stats.max_customer_retries,
            events_processed: simulation.events_processed(),
            final_time: simulation.time().as_secs_f64(),
            mean_wait: stats.mean_wait(),
            p50_wait: stats.wait_quantile(0.5),
            p99_wait: stats.wait_quantile(0.99),
            max_wait: stats.max_wait(),
            utilization: model.busy_time(horizon).as_secs_f64() / capacity,
        }
    }

    /// Customers that reached a terminal state
    pub fn departed(&self) -> u64 {
        self.total_customers_served + self.total_abandoned
    }

    /// Fraction of arrivals that gave up, 0 with no arrivals.
    pub fn abandonment_rate(&self) -> f64 {
        if self.customers_arrived == 0 {
            0.0
        } else {
            self.total_abandoned as f64 / self.customers_arrived as f64
        }
    }

    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SimError::illegal_state(format!("report serialization failed: {e}")))
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} tellers over {} time units (seed {})",
            self.num_tellers, self.simulation_time, self.seed
        )?;
        writeln!(f, "  arrived:     {}", self.customers_arrived)?;
        writeln!(f, "  served:      {}", self.total_customers_served)?;
        writeln!(f, "  retries:     {}", self.total_retries)?;
        writeln!(f, "  abandoned:   {}", self.total_abandoned)?;
        writeln!(
            f,
            "  at cutoff:   {} waiting, {} in service",
            self.waiting_at_cutoff, self.in_service_at_cutoff
        )?;
        writeln!(
            f,
            "  wait:        mean {:.3}, p50 {:.3}, p99 {:.3}",
            self.mean_wait, self.p50_wait, self.p99_wait
        )?;
        write!(f, "  utilization: {:.1}%", self.utilization * 100.0)
    }
}
