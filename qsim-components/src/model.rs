//! The queue model dispatched by the simulation engine
//!
//! [`QueueModel`] is the single [`Component`] of a queueing run. It owns the
//! teller pool, the customer lifecycle, the random processes and the run
//! statistics, and routes each popped [`QueueEvent`] to the lifecycle.

use crate::builder::validate_sim_time;
use crate::config::QueueConfig;
use crate::customer::{CustomerId, CustomerLifecycle};
use crate::retry_policy::FixedBackoffPolicy;
use crate::server::{ServerId, ServerPool};
use crate::stats::SimulationStats;
use qsim_core::{
    Component, RandomProcessGenerator, Scheduler, SimResult, SimTime, SimulationMetrics,
};
use std::time::Duration;
use tracing::trace;

/// Label attached to every metric the model records.
pub const METRICS_COMPONENT: &str = "tellers";
pub(crate) const METRIC_BUSY_TELLERS: &str = "busy_tellers";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueEvent {
    /// A new customer enters the system
    Arrival,
    ServiceCompletion {
        customer: CustomerId,
        server: ServerId,
    },
    /// Scheduled availability re-check of a waiting customer
    RetryAttempt { customer: CustomerId },
}

/// Mutable view of the model handed to the lifecycle for one event.
pub struct Dispatch<'a> {
    now: SimTime,
    pub(crate) scheduler: &'a mut Scheduler<QueueEvent>,
    pub(crate) servers: &'a mut ServerPool,
    pub(crate) generator: &'a mut RandomProcessGenerator,
    pub(crate) stats: &'a mut SimulationStats,
    pub(crate) metrics: &'a mut SimulationMetrics,
}

impl Dispatch<'_> {
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub(crate) fn count(&mut self, name: &str) {
        self.metrics.increment_counter(name, METRICS_COMPONENT, self.now);
    }

    pub(crate) fn record_busy_tellers(&mut self) {
        let busy = self.servers.busy_count() as f64;
        self.metrics
            .record_gauge(METRIC_BUSY_TELLERS, METRICS_COMPONENT, busy, self.now);
    }
}

pub struct QueueModel {
    servers: ServerPool,
    lifecycle: CustomerLifecycle,
    generator: RandomProcessGenerator,
    stats: SimulationStats,
    metrics: SimulationMetrics,
}

impl QueueModel {
    /// Build an idle model for `config`, drawing samples from `generator`.
    ///
    /// The configuration is assumed validated; zero tellers and a backoff
    /// that is not a positive clock value are still rejected here.
    pub fn new(config: &QueueConfig, generator: RandomProcessGenerator) -> SimResult<Self> {
        let backoff = validate_sim_time("retry_backoff", config.retry_backoff)?;
        Ok(Self {
            servers: ServerPool::new(config.num_tellers)?,
            lifecycle: CustomerLifecycle::new(FixedBackoffPolicy::new(config.max_retries, backoff)),
            generator,
            stats: SimulationStats::new()?,
            metrics: SimulationMetrics::new(),
        })
    }

    /// Keep a timestamped log of every metric update, e.g. for plotting the
    /// busy-teller series. Off by default since it grows with the run.
    pub fn with_metrics_timeline(mut self) -> Self {
        self.enable_metrics_timeline();
        self
    }

    pub fn enable_metrics_timeline(&mut self) {
        self.metrics = SimulationMetrics::with_timeline();
    }

    pub fn servers(&self) -> &ServerPool {
        &self.servers
    }

    pub fn lifecycle(&self) -> &CustomerLifecycle {
        &self.lifecycle
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn metrics(&self) -> &SimulationMetrics {
        &self.metrics
    }

    /// Draw the first inter-arrival gap.
    pub fn first_arrival_delay(&mut self) -> SimResult<SimTime> {
        self.generator.next_interarrival_time()
    }

    /// Total busy time of all tellers up to `now`.
    pub fn busy_time(&self, now: SimTime) -> Duration {
        self.servers.total_busy_time(now)
    }
}

impl Component for QueueModel {
    type Event = QueueEvent;

    fn process_event(
        &mut self,
        event: QueueEvent,
        scheduler: &mut Scheduler<QueueEvent>,
    ) -> SimResult<()> {
        let Self {
            servers,
            lifecycle,
            generator,
            stats,
            metrics,
        } = self;
        let mut ctx = Dispatch {
            now: scheduler.time(),
            scheduler,
            servers,
            generator,
            stats,
            metrics,
        };

        match event {
            QueueEvent::Arrival => {
                let customer = lifecycle.on_arrival(&mut ctx)?;
                let gap = ctx.generator.next_interarrival_time()?;
                ctx.scheduler.schedule_in(gap, QueueEvent::Arrival)?;
                trace!(customer = %customer, next_arrival_in = %gap, "Arrival handled");
            }
            QueueEvent::ServiceCompletion { customer, server } => {
                lifecycle.on_service_completion(customer, server, &mut ctx)?;
            }
            QueueEvent::RetryAttempt { customer } => {
                lifecycle.on_retry_attempt(customer, &mut ctx)?;
            }
        }
        Ok(())
    }
}
