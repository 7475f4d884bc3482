//! Demonstration of the engine and its logging on an M/M/1 queue
//!
//! Run with:
//! ```bash
//! RUST_LOG=debug cargo run -p qsim-core --example mm1_logging
//!
//! # Every event, pretty-printed with source locations
//! cargo run -p qsim-core --example mm1_logging -- --detailed
//! ```

use qsim_core::{
    init_detailed_simulation_logging, init_simulation_logging_with_level, simulation_span,
    Component, Executor, RandomProcessGenerator, Scheduler, SimResult, SimTime, Simulation,
};
use tracing::{debug, info};

#[derive(Debug)]
enum DeskEvent {
    Arrival,
    Departure,
}

struct HelpDesk {
    generator: RandomProcessGenerator,
    in_system: usize,
    served: u64,
}

impl Component for HelpDesk {
    type Event = DeskEvent;

    fn process_event(&mut self, event: DeskEvent, scheduler: &mut Scheduler<DeskEvent>) -> SimResult<()> {
        match event {
            DeskEvent::Arrival => {
                self.in_system += 1;
                debug!(in_system = self.in_system, time = %scheduler.time(), "Visitor arrived");
                if self.in_system == 1 {
                    let service = self.generator.next_service_time()?;
                    scheduler.schedule_in(service, DeskEvent::Departure)?;
                }
                let gap = self.generator.next_interarrival_time()?;
                scheduler.schedule_in(gap, DeskEvent::Arrival)?;
            }
            DeskEvent::Departure => {
                self.in_system -= 1;
                self.served += 1;
                debug!(served = self.served, time = %scheduler.time(), "Visitor left");
                if self.in_system > 0 {
                    let service = self.generator.next_service_time()?;
                    scheduler.schedule_in(service, DeskEvent::Departure)?;
                }
            }
        }
        Ok(())
    }
}

fn main() -> SimResult<()> {
    if std::env::args().any(|arg| arg == "--detailed") {
        init_detailed_simulation_logging();
    } else {
        init_simulation_logging_with_level("info");
    }
    let span = simulation_span("help_desk");
    let _guard = span.enter();

    let generator = RandomProcessGenerator::exponential(0.8, 1.0, 2024)?;
    let mut sim = Simulation::new(HelpDesk {
        generator,
        in_system: 0,
        served: 0,
    });
    sim.schedule(SimTime::zero(), DeskEvent::Arrival)?;
    sim.execute(Executor::timed(SimTime::from_secs(1_000)))?;

    let desk = sim.component();
    info!(
        served = desk.served,
        in_system = desk.in_system,
        final_time = %sim.time(),
        "Help desk closed"
    );
    println!("Served {} visitors, {} still inside", desk.served, desk.in_system);
    Ok(())
}
