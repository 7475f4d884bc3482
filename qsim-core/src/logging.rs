//! Structured logging for discrete event simulation debugging
//!
//! The engine and the queueing model log through `tracing`; nothing is printed
//! unless the application installs a subscriber. These helpers install a
//! `tracing-subscriber` fmt subscriber with sensible filters.
//!
//! # Controlling the output
//!
//! ```bash
//! # Default (info level)
//! cargo run --example bank_tellers
//!
//! # Per-event tracing of the model
//! RUST_LOG=qsim_components=trace cargo run --example bank_tellers
//! ```
//!
//! Level guidelines used across the workspace:
//! - **TRACE**: every scheduled and processed event
//! - **DEBUG**: assignment, retry and abandonment decisions
//! - **INFO**: run start and completion with the final counters
//! - **ERROR**: a run aborted on an invariant violation or sampling failure

use crate::{EventId, SimTime};
use tracing::{info, Span};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for the simulation at `info` level.
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging with a specific level
///
/// `RUST_LOG`, when set, takes precedence over `level`. Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
///
/// # Example
/// ```rust
/// use qsim_core::logging::init_simulation_logging_with_level;
///
/// init_simulation_logging_with_level("debug");
/// ```
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{level},qsim_core::scheduler=info").into());

    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Simulation logging initialized at level: {}", level);
    }
}

/// Initialize logging with every event traced, pretty-printed.
pub fn init_detailed_simulation_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trace,qsim_core=trace,qsim_components=trace".into());

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .pretty(),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Detailed simulation logging initialized");
    }
}

/// Create a span for tracking a whole simulation run
pub fn simulation_span(name: &str) -> Span {
    tracing::info_span!("simulation", name = name)
}

/// Create a span for tracking event processing
pub fn event_span(event_id: EventId, time: SimTime) -> Span {
    tracing::trace_span!("event", id = %event_id, time = %time)
}
