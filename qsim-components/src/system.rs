//! Simulation orchestrator
//!
//! [`QueueingSystem`] owns one [`Simulation`] of a [`QueueModel`] and runs it
//! exactly once, from time zero until the configured horizon has been crossed.
//!
//! # Example
//!
//! ```
//! use qsim_components::{QueueConfig, QueueingSystem};
//!
//! let mut system = QueueingSystem::new(QueueConfig::new(2, 10.0, 0.5, 0.5)).unwrap();
//! let report = system.run_simulation().unwrap();
//!
//! assert!(report.total_customers_served <= report.customers_arrived);
//! assert_eq!(system.total_customers_served(), Some(report.total_customers_served));
//! // A system runs once
//! assert!(system.run_simulation().is_err());
//! ```

use crate::builder::{validate_sim_time, Validate};
use crate::config::QueueConfig;
use crate::model::{QueueEvent, QueueModel};
use crate::report::SimulationReport;
use qsim_core::{
    simulation_span, Executor, RandomProcessGenerator, SimError, SimResult, SimTime, Simulation,
    SimulationMetrics,
};
use std::fmt;
use tracing::{error, info};

/// Lifecycle of a [`QueueingSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPhase {
    /// Constructed, not yet run
    Ready,
    Finished,
    /// The run aborted; no statistics are available
    Failed,
}

impl fmt::Display for SystemPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemPhase::Ready => write!(f, "ready"),
            SystemPhase::Finished => write!(f, "finished"),
            SystemPhase::Failed => write!(f, "failed"),
        }
    }
}

pub struct QueueingSystem {
    config: QueueConfig,
    horizon: SimTime,
    simulation: Simulation<QueueModel>,
    phase: SystemPhase,
    report: Option<SimulationReport>,
}

impl QueueingSystem {
    /// Validate `config` and set up exponential arrival and service processes
    /// seeded from `config.seed`.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidConfiguration`] for any invalid field; nothing is
    /// scheduled in that case.
    pub fn new(config: QueueConfig) -> SimResult<Self> {
        config.validate()?;
        let generator =
            RandomProcessGenerator::exponential(config.arrival_rate, config.service_rate, config.seed)?;
        Self::with_generator(config, generator)
    }

    /// Like [`QueueingSystem::new`] but with caller-supplied processes; the
    /// rates in `config` are still validated but not sampled.
    pub fn with_generator(config: QueueConfig, generator: RandomProcessGenerator) -> SimResult<Self> {
        config.validate()?;
        let horizon = validate_sim_time("simulation_time", config.simulation_time)?;
        let model = QueueModel::new(&config, generator)?;
        Ok(Self {
            config,
            horizon,
            simulation: Simulation::new(model),
            phase: SystemPhase::Ready,
            report: None,
        })
    }

    /// Keep every metric update with its timestamp, see
    /// [`SimulationMetrics::with_timeline`].
    pub fn with_metrics_timeline(mut self) -> Self {
        self.simulation.component_mut().enable_metrics_timeline();
        self
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn phase(&self) -> SystemPhase {
        self.phase
    }

    pub fn horizon(&self) -> SimTime {
        self.horizon
    }

    /// Run until the next event would lie past the horizon.
    ///
    /// # Errors
    ///
    /// [`SimError::IllegalState`] if the system already ran. Any error raised
    /// during the run is returned after moving the system to
    /// [`SystemPhase::Failed`].
    pub fn run_simulation(&mut self) -> SimResult<SimulationReport> {
        let span = simulation_span("queueing");
        let _guard = span.enter();

        if self.phase != SystemPhase::Ready {
            return Err(SimError::illegal_state(format!(
                "simulation already {}, create a new system to run again",
                self.phase
            )));
        }

        info!(
            tellers = self.config.num_tellers,
            horizon = %self.horizon,
            seed = self.config.seed,
            arrival_rate = self.config.arrival_rate,
            service_rate = self.config.service_rate,
            max_retries = self.config.max_retries,
            "Starting queueing simulation"
        );

        match self.run_to_horizon() {
            Ok(report) => {
                info!(
                    served = report.total_customers_served,
                    retries = report.total_retries,
                    abandoned = report.total_abandoned,
                    arrived = report.customers_arrived,
                    "Queueing simulation finished"
                );
                self.phase = SystemPhase::Finished;
                self.report = Some(report.clone());
                Ok(report)
            }
            Err(e) => {
                error!(error = %e, time = %self.simulation.time(), "Queueing simulation failed");
                self.phase = SystemPhase::Failed;
                Err(e)
            }
        }
    }

    fn run_to_horizon(&mut self) -> SimResult<SimulationReport> {
        let first_arrival = self.simulation.component_mut().first_arrival_delay()?;
        self.simulation.schedule(first_arrival, QueueEvent::Arrival)?;
        self.simulation.execute(Executor::timed(self.horizon))?;
        Ok(SimulationReport::collect(&self.config, self.horizon, &self.simulation))
    }

    /// Report of a finished run.
    pub fn report(&self) -> Option<&SimulationReport> {
        self.report.as_ref()
    }

    pub fn total_customers_served(&self) -> Option<u64> {
        self.report.as_ref().map(|r| r.total_customers_served)
    }

    pub fn total_retries(&self) -> Option<u64> {
        self.report.as_ref().map(|r| r.total_retries)
    }

    pub fn total_abandoned(&self) -> Option<u64> {
        self.report.as_ref().map(|r| r.total_abandoned)
    }

    /// Counter totals and gauges recorded so far.
    pub fn metrics(&self) -> &SimulationMetrics {
        self.simulation.component().metrics()
    }

    pub fn model(&self) -> &QueueModel {
        self.simulation.component()
    }
}
