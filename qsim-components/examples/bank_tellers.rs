//! Bank teller queue examples
//!
//! 1. A lightly loaded two-teller branch
//! 2. A single overloaded teller with a one-retry budget
//! 3. A Monte Carlo batch of the overloaded case
//!
//! An optional JSON configuration file replaces the first scenario:
//!
//! ```bash
//! RUST_LOG=info cargo run -p qsim-components --example bank_tellers -- branch.json
//! ```

use qsim_components::{run_batch, QueueConfig, QueueingSystem};
use qsim_core::init_simulation_logging_with_level;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_simulation_logging_with_level("warn");

    println!("=== Bank Teller Queue Examples ===\n");

    let branch = match std::env::args().nth(1) {
        Some(path) => QueueConfig::from_json_file(path)?,
        None => QueueConfig::new(2, 10.0, 0.5, 0.5),
    };
    println!("--- Branch (offered load {:.2} per teller) ---", branch.utilization());
    let mut system = QueueingSystem::new(branch)?;
    let report = system.run_simulation()?;
    println!("{report}\n");

    let rush_hour = QueueConfig::new(1, 5.0, 10.0, 0.1).with_max_retries(1);
    println!("--- Rush hour (offered load {:.0}) ---", rush_hour.utilization());
    let report = QueueingSystem::new(rush_hour.clone())?.run_simulation()?;
    println!("{report}");
    println!("  abandonment: {:.1}%\n", report.abandonment_rate() * 100.0);

    let workers = std::thread::available_parallelism().map_or(1, |n| n.get());
    println!("--- Rush hour, 200 replications on {workers} workers ---");
    let batch = run_batch(&rush_hour, 200, workers)?;
    let summary = &batch.summary;
    println!(
        "  served:    mean {:.2} (min {}, max {})",
        summary.served.mean, summary.served.min, summary.served.max
    );
    println!(
        "  retries:   mean {:.2} (min {}, max {})",
        summary.retries.mean, summary.retries.min, summary.retries.max
    );
    println!(
        "  abandoned: mean {:.2} (min {}, max {})",
        summary.abandoned.mean, summary.abandoned.min, summary.abandoned.max
    );
    println!("  utilization: {:.1}%", summary.utilization * 100.0);

    println!("\n✅ Done");
    Ok(())
}
