//! Multi-teller queue model built on `qsim-core`
//!
//! Customers arrive as a Poisson process, take the lowest-numbered free teller
//! if there is one, and otherwise re-check after a fixed backoff until their
//! retry budget is spent, at which point they abandon. Service times are
//! exponential.
//!
//! - [`QueueConfig`]: run parameters, with builder, validation and JSON loading
//! - [`QueueingSystem`]: runs one simulation up to the horizon and exposes
//!   the served / retried / abandoned counters
//! - [`SimulationReport`]: everything a finished run measured
//! - [`run_batch`]: independent replications on several threads
//!
//! ```
//! use qsim_components::{QueueConfig, QueueingSystem};
//!
//! let config = QueueConfig::new(1, 5.0, 10.0, 0.1).with_max_retries(1);
//! let mut system = QueueingSystem::new(config).unwrap();
//! let report = system.run_simulation().unwrap();
//!
//! // Heavy overload: the single teller is taken right away and the rest retry
//! assert!(report.total_retries > 0);
//! assert_eq!(
//!     report.customers_arrived,
//!     report.total_customers_served
//!         + report.total_abandoned
//!         + report.waiting_at_cutoff
//!         + report.in_service_at_cutoff
//! );
//! ```

pub mod batch;
pub mod builder;
pub mod config;
pub mod customer;
pub mod model;
pub mod report;
pub mod retry_policy;
pub mod server;
pub mod stats;
pub mod system;

pub use batch::{replication_seed, run_batch, BatchReport, BatchSummary, CounterSummary};
pub use builder::{require, validate_non_zero, validate_positive, validate_sim_time, Validate};
pub use config::{QueueConfig, QueueConfigBuilder};
pub use customer::{Customer, CustomerId, CustomerLifecycle, CustomerStatus};
pub use model::{Dispatch, QueueEvent, QueueModel, METRICS_COMPONENT};
pub use report::SimulationReport;
pub use retry_policy::{FixedBackoffPolicy, RetryDecision};
pub use server::{Server, ServerId, ServerPool};
pub use stats::SimulationStats;
pub use system::{QueueingSystem, SystemPhase};
