//! Teller pool
//!
//! A fixed set of identical service stations. Each teller serves at most one
//! customer at a time; the pool only tracks occupancy; the customer side lives
//! in [`crate::customer`].

use qsim_core::{SimError, SimResult, SimTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Identifier of a teller, `0..num_tellers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServerId(pub usize);

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Teller({})", self.0)
    }
}

/// One service station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub id: ServerId,
    /// `Some(t)` while busy: the current service completes at `t`.
    busy_until: Option<SimTime>,
    busy_since: SimTime,
    /// Completed busy periods
    busy_time: Duration,
    /// Customers taken on so far
    pub customers_started: u64,
}

impl Server {
    fn new(id: ServerId) -> Self {
        Self {
            id,
            busy_until: None,
            busy_since: SimTime::zero(),
            busy_time: Duration::ZERO,
            customers_started: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy_until.is_some()
    }

    pub fn busy_until(&self) -> Option<SimTime> {
        self.busy_until
    }

    /// Busy time accumulated up to `now`, including a service in progress.
    pub fn busy_time_at(&self, now: SimTime) -> Duration {
        if self.is_busy() {
            self.busy_time + now.duration_since(self.busy_since)
        } else {
            self.busy_time
        }
    }
}

/// Fixed-size pool of tellers.
#[derive(Debug, Clone)]
pub struct ServerPool {
    servers: Vec<Server>,
}

impl ServerPool {
    /// Create a pool of `size` idle tellers.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] for an empty pool.
    pub fn new(size: usize) -> SimResult<Self> {
        if size == 0 {
            return Err(SimError::invalid_config("num_tellers", "must be greater than zero"));
        }
        Ok(Self {
            servers: (0..size).map(|i| Server::new(ServerId(i))).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn server(&self, id: ServerId) -> Option<&Server> {
        self.servers.get(id.0)
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Lowest-numbered idle teller, if any.
    pub fn find_free_server(&self) -> Option<ServerId> {
        self.servers.iter().find(|s| !s.is_busy()).map(|s| s.id)
    }

    pub fn busy_count(&self) -> usize {
        self.servers.iter().filter(|s| s.is_busy()).count()
    }

    /// Fraction of tellers currently busy.
    pub fn utilization(&self) -> f64 {
        self.busy_count() as f64 / self.servers.len() as f64
    }

    /// Mark `id` busy from `now` until `until`.
    ///
    /// # Errors
    ///
    /// [`SimError::IllegalState`] if the teller is already busy, does not
    /// exist, or `until` precedes `now`.
    pub fn occupy(&mut self, id: ServerId, now: SimTime, until: SimTime) -> SimResult<()> {
        let server = self.get_mut(id)?;
        if let Some(current) = server.busy_until {
            return Err(SimError::illegal_state(format!(
                "{id} is already busy until {current}"
            )));
        }
        if until < now {
            return Err(SimError::illegal_state(format!(
                "{id} cannot finish at {until}, before {now}"
            )));
        }
        server.busy_until = Some(until);
        server.busy_since = now;
        server.customers_started += 1;
        Ok(())
    }

    /// Mark `id` idle again at `now`.
    ///
    /// # Errors
    ///
    /// [`SimError::IllegalState`] if the teller is already idle or does not exist.
    pub fn release(&mut self, id: ServerId, now: SimTime) -> SimResult<()> {
        let server = self.get_mut(id)?;
        if server.busy_until.take().is_none() {
            return Err(SimError::illegal_state(format!("{id} is already free")));
        }
        server.busy_time += now.duration_since(server.busy_since);
        Ok(())
    }

    /// Total busy time of all tellers up to `now`.
    pub fn total_busy_time(&self, now: SimTime) -> Duration {
        self.servers.iter().map(|s| s.busy_time_at(now)).sum()
    }

    fn get_mut(&mut self, id: ServerId) -> SimResult<&mut Server> {
        let size = self.servers.len();
        self.servers
            .get_mut(id.0)
            .ok_or_else(|| SimError::illegal_state(format!("{id} does not exist in a pool of {size}")))
    }
}
