//! Monte Carlo batches of independent replications
//!
//! Replication `i` runs its own [`QueueingSystem`] seeded with
//! `derive_seed(config.seed, STREAM_REPLICATION, i)`. Replications are split
//! into contiguous shards, one scoped thread per shard. Nothing mutable is
//! shared between replications and results are put back in replication order,
//! so the outcome does not depend on the number of workers.

use crate::builder::Validate;
use crate::config::QueueConfig;
use crate::report::SimulationReport;
use crate::system::QueueingSystem;
use qsim_core::randomness::{derive_seed, STREAM_REPLICATION};
use qsim_core::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Seed used by replication `index` of a batch based on `base_seed`.
pub fn replication_seed(base_seed: u64, index: usize) -> u64 {
    derive_seed(base_seed, STREAM_REPLICATION, index as u64)
}

/// Mean and range of one counter across replications.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CounterSummary {
    pub mean: f64,
    pub min: u64,
    pub max: u64,
}

impl CounterSummary {
    fn from_values(values: impl Iterator<Item = u64> + Clone) -> Self {
        let count = values.clone().count();
        let total: u64 = values.clone().sum();
        Self {
            mean: if count == 0 { 0.0 } else { total as f64 / count as f64 },
            min: values.clone().min().unwrap_or(0),
            max: values.max().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub replications: usize,
    pub arrived: CounterSummary,
    pub served: CounterSummary,
    pub retries: CounterSummary,
    pub abandoned: CounterSummary,
    pub mean_wait: f64,
    pub utilization: f64,
}

impl BatchSummary {
    pub fn from_reports(reports: &[SimulationReport]) -> Self {
        let n = reports.len().max(1) as f64;
        Self {
            replications: reports.len(),
            arrived: CounterSummary::from_values(reports.iter().map(|r| r.customers_arrived)),
            served: CounterSummary::from_values(reports.iter().map(|r| r.total_customers_served)),
            retries: CounterSummary::from_values(reports.iter().map(|r| r.total_retries)),
            abandoned: CounterSummary::from_values(reports.iter().map(|r| r.total_abandoned)),
            mean_wait: reports.iter().map(|r| r.mean_wait).sum::<f64>() / n,
            utilization: reports.iter().map(|r| r.utilization).sum::<f64>() / n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Per-replication reports, ordered by replication index
    pub runs: Vec<SimulationReport>,
    pub summary: BatchSummary,
}

/// Run `replications` independent copies of `config` on up to `workers` threads.
///
/// # Errors
///
/// [`SimError::InvalidConfiguration`] for an invalid config or zero
/// replications/workers. If replications fail, the error of the
/// lowest-indexed failing one is returned.
pub fn run_batch(config: &QueueConfig, replications: usize, workers: usize) -> SimResult<BatchReport> {
    if replications == 0 {
        return Err(SimError::invalid_config("replications", "must be greater than zero"));
    }
    if workers == 0 {
        return Err(SimError::invalid_config("workers", "must be greater than zero"));
    }
    config.validate()?;

    let shards = shard_ranges(replications, workers);
    info!(replications, workers = shards.len(), seed = config.seed, "Starting batch");

    let mut outcomes = std::thread::scope(|scope| -> SimResult<Vec<(usize, SimResult<SimulationReport>)>> {
        let handles: Vec<_> = shards
            .iter()
            .map(|&(start, end)| {
                scope.spawn(move || {
                    (start..end)
                        .map(|index| (index, run_replication(config, index)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(replications);
        for handle in handles {
            let shard = handle
                .join()
                .map_err(|_| SimError::illegal_state("batch worker panicked"))?;
            outcomes.extend(shard);
        }
        Ok(outcomes)
    })?;
    outcomes.sort_by_key(|(index, _)| *index);

    let runs = outcomes
        .into_iter()
        .map(|(_, outcome)| outcome)
        .collect::<SimResult<Vec<_>>>()?;
    let summary = BatchSummary::from_reports(&runs);
    info!(
        mean_served = summary.served.mean,
        mean_abandoned = summary.abandoned.mean,
        "Batch finished"
    );
    Ok(BatchReport { runs, summary })
}

fn run_replication(config: &QueueConfig, index: usize) -> SimResult<SimulationReport> {
    let seed = replication_seed(config.seed, index);
    debug!(replication = index, seed, "Running replication");
    QueueingSystem::new(config.clone().with_seed(seed))?.run_simulation()
}

/// Split `len` items into at most `shards` contiguous, nearly equal ranges.
fn shard_ranges(len: usize, shards: usize) -> Vec<(usize, usize)> {
    let shards = shards.clamp(1, len.max(1));
    let base = len / shards;
    let extra = len % shards;
    let mut ranges = Vec::with_capacity(shards);
    let mut start = 0;
    for idx in 0..shards {
        let end = start + base + usize::from(idx < extra);
        ranges.push((start, end));
        start = end;
    }
    ranges
}
