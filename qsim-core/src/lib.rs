//! Core discrete event simulation engine for queueing models.
//!
//! This crate provides the fundamental building blocks: virtual time
//! ([`SimTime`]), an event clock that hands out events in timestamp order
//! ([`Scheduler`]), a driver that feeds those events to a model
//! ([`Simulation`]), stopping conditions ([`Executor`]), and seeded random
//! processes for arrivals and service times ([`dists`]).
//!
//! # Architecture Overview
//!
//! - [`Component`]: the model. It receives every popped event together with
//!   mutable access to the scheduler so it can schedule follow-up events.
//! - [`Simulation`]: owns the scheduler and exactly one component, and
//!   performs the pop-dispatch loop.
//!
//! Everything runs on the caller's thread. Events with equal timestamps are
//! dispatched in the order they were scheduled, so a run is fully determined
//! by the model's inputs and seeds.
//!
//! # Basic Usage
//!
//! ```rust
//! use qsim_core::{Component, Executor, Scheduler, SimResult, SimTime, Simulation};
//!
//! #[derive(Debug)]
//! struct Tick;
//!
//! struct Counter {
//!     ticks: u32,
//! }
//!
//! impl Component for Counter {
//!     type Event = Tick;
//!
//!     fn process_event(&mut self, _event: Tick, scheduler: &mut Scheduler<Tick>) -> SimResult<()> {
//!         self.ticks += 1;
//!         scheduler.schedule_in(SimTime::from_secs(1), Tick)?;
//!         Ok(())
//!     }
//! }
//!
//! let mut simulation = Simulation::new(Counter { ticks: 0 });
//! simulation.schedule(SimTime::zero(), Tick).unwrap();
//! simulation.execute(Executor::timed(SimTime::from_secs(3))).unwrap();
//! assert_eq!(simulation.component().ticks, 4);
//! ```

pub mod dists;
pub mod error;
pub mod execute;
pub mod logging;
pub mod metrics;
pub mod randomness;
pub mod scheduler;
pub mod time;
pub mod types;

use std::fmt;
use tracing::{info, instrument, trace};

pub use dists::{
    ArrivalPattern, ExponentialServiceTime, PoissonArrivals, RandomProcessGenerator,
    ServiceTimeDistribution,
};
pub use error::{SimError, SimResult};
pub use execute::{Execute, Executor};
pub use logging::{
    event_span, init_detailed_simulation_logging, init_simulation_logging,
    init_simulation_logging_with_level, simulation_span,
};
pub use crate::metrics::{MetricType, MetricValue, SimulationMetrics};
pub use scheduler::{ClockRef, EventEntry, Scheduler};
pub use time::SimTime;
pub use types::EventId;

/// A simulation model driven by popped events.
pub trait Component {
    type Event: fmt::Debug;

    /// Handle one event. The scheduler's clock already reads the event's time.
    ///
    /// # Errors
    ///
    /// Any error aborts the run; the executor does not retry.
    fn process_event(
        &mut self,
        event: Self::Event,
        scheduler: &mut Scheduler<Self::Event>,
    ) -> SimResult<()>;
}

/// Simulation struct that puts the scheduler and the model together.
///
/// See the [crate-level documentation](crate) for more information.
pub struct Simulation<C: Component> {
    scheduler: Scheduler<C::Event>,
    component: C,
    events_processed: u64,
}

impl<C: Component> Simulation<C> {
    pub fn new(component: C) -> Self {
        Self {
            scheduler: Scheduler::default(),
            component,
            events_processed: 0,
        }
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.scheduler.time()
    }

    /// Returns a ClockRef for reading the simulation time.
    pub fn clock(&self) -> ClockRef {
        self.scheduler.clock()
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Tear the simulation down, usually at the end of a run to inspect the model.
    pub fn into_component(self) -> C {
        self.component
    }

    /// Number of events dispatched so far.
    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Schedules a new event at the absolute time `time`.
    pub fn schedule(&mut self, time: SimTime, event: C::Event) -> SimResult<EventId> {
        self.scheduler.schedule(time, event)
    }

    /// Returns the time of the next scheduled event, or None if no events are scheduled.
    pub fn peek_next_event_time(&self) -> Option<SimTime> {
        self.scheduler.peek_time()
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.scheduler.is_empty()
    }

    /// Performs one step of the simulation. Returns `true` if there was in fact an event
    /// available to process, and `false` otherwise, which signifies that the simulation
    /// ended.
    pub fn step(&mut self) -> SimResult<bool> {
        let Some(entry) = self.scheduler.pop() else {
            return Ok(false);
        };
        let span = event_span(entry.id(), entry.time());
        let _guard = span.enter();
        trace!(event = ?entry.event(), "Processing simulation step");

        self.events_processed += 1;
        self.component
            .process_event(entry.into_event(), &mut self.scheduler)?;
        Ok(true)
    }

    /// Runs the entire simulation.
    ///
    /// The stopping condition depends on the executor used.
    /// See [`Execute`] and [`Executor`] for more details.
    #[instrument(skip(self, executor), fields(initial_time = %self.time()))]
    pub fn execute<E: Execute>(&mut self, executor: E) -> SimResult<()> {
        info!("Starting simulation execution");
        executor.execute(self)?;
        info!(
            final_time = %self.time(),
            events_processed = self.events_processed,
            "Simulation execution completed"
        );
        Ok(())
    }
}
