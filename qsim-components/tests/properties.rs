//! Invariants checked over many seeds
//!
//! Every configuration below is run for a sweep of seeds; the assertions must
//! hold for each single run, not just on average.

use qsim_components::{QueueConfig, QueueingSystem, SimulationReport};

const SEEDS: std::ops::Range<u64> = 0..40;

fn configurations() -> Vec<QueueConfig> {
    vec![
        QueueConfig::new(1, 20.0, 1.0, 1.5),
        QueueConfig::new(2, 10.0, 0.5, 0.5),
        QueueConfig::new(3, 15.0, 6.0, 1.0).with_max_retries(2),
        QueueConfig::new(1, 5.0, 10.0, 0.1).with_max_retries(1),
        QueueConfig::new(4, 8.0, 12.0, 2.0)
            .with_max_retries(5)
            .with_retry_backoff(0.05),
        QueueConfig::new(2, 12.0, 4.0, 0.5).with_max_retries(0),
    ]
}

fn run(config: &QueueConfig, seed: u64) -> SimulationReport {
    QueueingSystem::new(config.clone().with_seed(seed))
        .unwrap()
        .run_simulation()
        .unwrap()
}

#[test]
fn every_arrival_is_accounted_for() {
    for config in configurations() {
        for seed in SEEDS {
            let r = run(&config, seed);
            assert_eq!(
                r.customers_arrived,
                r.total_customers_served + r.total_abandoned + r.waiting_at_cutoff + r.in_service_at_cutoff,
                "{config:?} seed {seed}"
            );
            assert!(r.total_customers_served + r.total_abandoned <= r.customers_arrived);
            assert!(r.total_customers_served <= r.customers_arrived);
        }
    }
}

#[test]
fn retries_respect_the_budget() {
    for config in configurations() {
        for seed in SEEDS {
            let r = run(&config, seed);
            assert!(
                r.max_customer_retries <= config.max_retries,
                "{config:?} seed {seed}: customer retried {} times",
                r.max_customer_retries
            );
            // Each customer contributes at most max_retries retries
            assert!(r.total_retries <= r.customers_arrived * u64::from(config.max_retries));
        }
    }
}

#[test]
fn zero_retry_budget_never_counts_retries() {
    for config in configurations() {
        let config = config.with_max_retries(0);
        for seed in SEEDS {
            assert_eq!(run(&config, seed).total_retries, 0, "{config:?} seed {seed}");
        }
    }
}

#[test]
fn busy_tellers_never_exceed_the_pool() {
    for config in configurations() {
        for seed in SEEDS {
            let r = run(&config, seed);
            assert!(r.in_service_at_cutoff <= config.num_tellers as u64);
            assert!(r.utilization >= 0.0 && r.utilization <= 1.0 + 1e-9);
            assert!(r.final_time <= config.simulation_time);
        }
    }
}

#[test]
fn same_seed_same_outcome() {
    for config in configurations() {
        for seed in SEEDS.step_by(4) {
            let a = run(&config, seed);
            let b = run(&config, seed);
            assert_eq!(a, b, "{config:?} seed {seed}");
        }
    }
}

#[test]
fn seeds_actually_change_the_run() {
    let config = QueueConfig::new(2, 50.0, 3.0, 1.0);
    let distinct: std::collections::HashSet<u64> =
        SEEDS.map(|seed| run(&config, seed).customers_arrived).collect();
    assert!(distinct.len() > 1);
}

#[test]
fn metrics_agree_with_counters() {
    let config = QueueConfig::new(2, 20.0, 5.0, 1.0).with_max_retries(2);
    let mut system = QueueingSystem::new(config).unwrap().with_metrics_timeline();
    let report = system.run_simulation().unwrap();
    let metrics = system.metrics();

    assert_eq!(metrics.counter_total("customers_arrived"), report.customers_arrived);
    assert_eq!(metrics.counter_total("customers_served"), report.total_customers_served);
    assert_eq!(metrics.counter_total("customer_retries"), report.total_retries);
    assert_eq!(metrics.counter_total("customers_abandoned"), report.total_abandoned);

    let busy = metrics.gauge_series("busy_tellers");
    assert!(!busy.is_empty());
    assert!(busy.iter().all(|&(_, v)| (0.0..=2.0).contains(&v)));
    assert!(busy.windows(2).all(|w| w[0].0 <= w[1].0));
}
