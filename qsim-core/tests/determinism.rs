//! Determinism guardrail tests
//!
//! These tests are intended to detect accidental introduction of
//! non-determinism in event execution order for identical simulations.

use qsim_core::{
    Component, Execute, Executor, RandomProcessGenerator, Scheduler, SimResult, SimTime,
    Simulation,
};

#[derive(Debug, Clone)]
enum LogEvent {
    Push(usize),
}

struct LoggerComponent {
    log: Vec<usize>,
}

impl Component for LoggerComponent {
    type Event = LogEvent;

    fn process_event(&mut self, event: LogEvent, _scheduler: &mut Scheduler<LogEvent>) -> SimResult<()> {
        match event {
            LogEvent::Push(value) => self.log.push(value),
        }
        Ok(())
    }
}

#[test]
fn same_time_events_run_in_insertion_order() {
    let mut sim = Simulation::new(LoggerComponent { log: Vec::new() });

    for i in 0..200 {
        // All events land at the same timestamp.
        sim.schedule(SimTime::from_millis(1), LogEvent::Push(i)).unwrap();
    }

    Executor::timed(SimTime::from_millis(1)).execute(&mut sim).unwrap();

    let expected: Vec<usize> = (0..200).collect();
    assert_eq!(sim.component().log, expected);
}

/// A tiny single-server queue that records (time, what) for every event.
#[derive(Debug)]
enum MM1Event {
    Arrival,
    Departure,
}

struct MM1 {
    generator: RandomProcessGenerator,
    in_system: usize,
    trace: Vec<(SimTime, &'static str)>,
}

impl Component for MM1 {
    type Event = MM1Event;

    fn process_event(&mut self, event: MM1Event, scheduler: &mut Scheduler<MM1Event>) -> SimResult<()> {
        match event {
            MM1Event::Arrival => {
                self.in_system += 1;
                if self.in_system == 1 {
                    let service = self.generator.next_service_time()?;
                    scheduler.schedule_in(service, MM1Event::Departure)?;
                }
                let gap = self.generator.next_interarrival_time()?;
                scheduler.schedule_in(gap, MM1Event::Arrival)?;
                self.trace.push((scheduler.time(), "arrival"));
            }
            MM1Event::Departure => {
                self.in_system -= 1;
                if self.in_system > 0 {
                    let service = self.generator.next_service_time()?;
                    scheduler.schedule_in(service, MM1Event::Departure)?;
                }
                self.trace.push((scheduler.time(), "departure"));
            }
        }
        Ok(())
    }
}

fn run_mm1(seed: u64) -> Vec<(SimTime, &'static str)> {
    let generator = RandomProcessGenerator::exponential(5.0, 6.0, seed).unwrap();
    let mut sim = Simulation::new(MM1 {
        generator,
        in_system: 0,
        trace: Vec::new(),
    });
    sim.schedule(SimTime::zero(), MM1Event::Arrival).unwrap();
    sim.execute(Executor::timed(SimTime::from_secs(50))).unwrap();
    sim.into_component().trace
}

#[test]
fn seeded_runs_are_identical_across_runs() {
    let baseline = run_mm1(1234);
    assert!(baseline.len() > 100);

    for _ in 0..10 {
        assert_eq!(baseline, run_mm1(1234));
    }
    assert_ne!(baseline, run_mm1(4321));
}

#[test]
fn clock_never_goes_backwards() {
    let trace = run_mm1(99);
    assert!(trace.windows(2).all(|w| w[0].0 <= w[1].0));
    assert!(trace.iter().all(|(t, _)| *t <= SimTime::from_secs(50)));
}
