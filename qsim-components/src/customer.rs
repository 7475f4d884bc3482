//! Customer lifecycle
//!
//! Customers are created by arrival events and tracked until they reach a
//! terminal state (served or abandoned), after which only the aggregate
//! counters in [`SimulationStats`](crate::stats::SimulationStats) remember them.
//!
//! Status transitions are monotone:
//!
//! ```text
//! Waiting ──► InService ──► Served
//!    │
//!    └──────► Abandoned
//! ```

use crate::model::{Dispatch, QueueEvent};
use crate::retry_policy::{FixedBackoffPolicy, RetryDecision};
use crate::server::ServerId;
use qsim_core::{SimError, SimResult, SimTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace};

pub(crate) const METRIC_ARRIVED: &str = "customers_arrived";
pub(crate) const METRIC_SERVED: &str = "customers_served";
pub(crate) const METRIC_RETRIES: &str = "customer_retries";
pub(crate) const METRIC_ABANDONED: &str = "customers_abandoned";

/// Unique customer identifier, assigned in arrival order starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub u64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Customer({})", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerStatus {
    Waiting,
    InService { server: ServerId },
    Served,
    Abandoned,
}

impl CustomerStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CustomerStatus::Served | CustomerStatus::Abandoned)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub arrived_at: SimTime,
    retries: u32,
    status: CustomerStatus,
}

impl Customer {
    pub fn new(id: CustomerId, arrived_at: SimTime) -> Self {
        Self {
            id,
            arrived_at,
            retries: 0,
            status: CustomerStatus::Waiting,
        }
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn status(&self) -> CustomerStatus {
        self.status
    }

    pub fn is_waiting(&self) -> bool {
        self.status == CustomerStatus::Waiting
    }

    /// Waiting → InService
    pub fn start_service(&mut self, server: ServerId) -> SimResult<()> {
        self.transition(CustomerStatus::Waiting, CustomerStatus::InService { server })
    }

    /// InService → Served
    pub fn complete(&mut self) -> SimResult<()> {
        match self.status {
            CustomerStatus::InService { server } => {
                self.transition(CustomerStatus::InService { server }, CustomerStatus::Served)
            }
            other => Err(SimError::illegal_state(format!(
                "{} cannot complete service while {other:?}",
                self.id
            ))),
        }
    }

    /// Waiting → Abandoned
    pub fn abandon(&mut self) -> SimResult<()> {
        self.transition(CustomerStatus::Waiting, CustomerStatus::Abandoned)
    }

    fn record_retry(&mut self) {
        self.retries += 1;
    }

    fn transition(&mut self, from: CustomerStatus, to: CustomerStatus) -> SimResult<()> {
        if self.status != from {
            return Err(SimError::illegal_state(format!(
                "{} cannot move to {to:?} from {:?}",
                self.id, self.status
            )));
        }
        self.status = to;
        Ok(())
    }
}

/// Creates customers, assigns them to tellers, applies the retry policy and
/// finalizes them.
#[derive(Debug)]
pub struct CustomerLifecycle {
    policy: FixedBackoffPolicy,
    active: BTreeMap<CustomerId, Customer>,
    next_id: u64,
}

impl CustomerLifecycle {
    pub fn new(policy: FixedBackoffPolicy) -> Self {
        Self {
            policy,
            active: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn policy(&self) -> &FixedBackoffPolicy {
        &self.policy
    }

    /// A customer that has not reached a terminal state yet.
    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.active.get(&id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn waiting_count(&self) -> usize {
        self.active.values().filter(|c| c.is_waiting()).count()
    }

    pub fn in_service_count(&self) -> usize {
        self.active.len() - self.waiting_count()
    }

    /// A new customer arrives at `ctx.now()`: serve right away if a teller is
    /// free, otherwise wait and schedule the first retry attempt.
    pub fn on_arrival(&mut self, ctx: &mut Dispatch<'_>) -> SimResult<CustomerId> {
        let id = CustomerId(self.next_id);
        self.next_id += 1;
        let now = ctx.now();

        ctx.stats.customers_arrived += 1;
        ctx.count(METRIC_ARRIVED);

        let mut customer = Customer::new(id, now);
        if !try_assign(&mut customer, ctx)? {
            debug!(customer = %id, time = %now, "All tellers busy, customer waits");
            self.schedule_retry(id, ctx)?;
        }
        self.active.insert(id, customer);
        Ok(id)
    }

    /// `customer` finished at `server`: free the teller and count the service.
    pub fn on_service_completion(
        &mut self,
        customer: CustomerId,
        server: ServerId,
        ctx: &mut Dispatch<'_>,
    ) -> SimResult<()> {
        let mut finished = self.active.remove(&customer).ok_or_else(|| {
            SimError::illegal_state(format!("service completion for unknown {customer}"))
        })?;
        if finished.status() != (CustomerStatus::InService { server }) {
            let status = finished.status();
            self.active.insert(customer, finished);
            return Err(SimError::illegal_state(format!(
                "{customer} completed at {server} while {status:?}"
            )));
        }

        ctx.servers.release(server, ctx.now())?;
        finished.complete()?;
        ctx.stats.total_customers_served += 1;
        ctx.count(METRIC_SERVED);
        ctx.record_busy_tellers();

        trace!(
            customer = %customer,
            server = %server,
            time_in_system = ?ctx.now().duration_since(finished.arrived_at),
            "Customer served"
        );
        Ok(())
    }

    /// Scheduled re-check for a waiting customer.
    ///
    /// Customers that already left the waiting state ignore stale attempts.
    pub fn on_retry_attempt(&mut self, id: CustomerId, ctx: &mut Dispatch<'_>) -> SimResult<()> {
        let Some(customer) = self.active.get_mut(&id) else {
            trace!(customer = %id, "Retry attempt for a departed customer ignored");
            return Ok(());
        };
        if !customer.is_waiting() {
            trace!(customer = %id, status = ?customer.status(), "Retry attempt ignored");
            return Ok(());
        }

        match self.policy.decide(customer.retries()) {
            RetryDecision::Retry => {
                customer.record_retry();
                ctx.stats.record_retry(customer.retries());
                ctx.count(METRIC_RETRIES);

                if !try_assign(customer, ctx)? {
                    debug!(
                        customer = %id,
                        retries = customer.retries(),
                        "Still no free teller, retrying later"
                    );
                    self.schedule_retry(id, ctx)?;
                }
            }
            RetryDecision::FinalCheck => {
                if !try_assign(customer, ctx)? {
                    customer.abandon()?;
                    debug!(
                        customer = %id,
                        retries = customer.retries(),
                        waited = ?ctx.now().duration_since(customer.arrived_at),
                        "Retry budget exhausted, customer abandons"
                    );
                    self.active.remove(&id);
                    ctx.stats.total_abandoned += 1;
                    ctx.count(METRIC_ABANDONED);
                }
            }
        }
        Ok(())
    }

    fn schedule_retry(&self, id: CustomerId, ctx: &mut Dispatch<'_>) -> SimResult<()> {
        ctx.scheduler
            .schedule_in(self.policy.backoff(), QueueEvent::RetryAttempt { customer: id })?;
        Ok(())
    }
}

/// Put `customer` on the lowest-numbered free teller and schedule its
/// completion. Returns `false` if every teller is busy.
fn try_assign(customer: &mut Customer, ctx: &mut Dispatch<'_>) -> SimResult<bool> {
    let Some(server) = ctx.servers.find_free_server() else {
        return Ok(false);
    };
    let now = ctx.now();
    let service_time = ctx.generator.next_service_time()?;
    let until = now + service_time;

    ctx.servers.occupy(server, now, until)?;
    customer.start_service(server)?;
    ctx.stats.record_wait(now.duration_since(customer.arrived_at))?;
    ctx.scheduler.schedule(
        until,
        QueueEvent::ServiceCompletion {
            customer: customer.id,
            server,
        },
    )?;
    ctx.record_busy_tellers();

    debug!(
        customer = %customer.id,
        server = %server,
        retries = customer.retries(),
        completes_at = %until,
        "Customer assigned"
    );
    Ok(true)
}
