//! Stopping conditions for a simulation run

use crate::{Component, SimResult, SimTime, Simulation};

/// Drives a [`Simulation`] until a stopping condition holds.
pub trait Execute {
    /// Step `sim` until the condition holds or a step fails.
    fn execute<C: Component>(self, sim: &mut Simulation<C>) -> SimResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndCondition {
    Time(SimTime),
    NoEvents,
    Steps(usize),
}

/// The built-in stopping conditions: event exhaustion, a time horizon or a
/// step budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executor {
    end_condition: EndCondition,
}

impl Executor {
    /// Run until the event queue is empty.
    #[must_use]
    pub fn unbound() -> Self {
        Self {
            end_condition: EndCondition::NoEvents,
        }
    }

    /// Process every event scheduled at or before `time`. The first event
    /// past the horizon stays queued and the clock stays at the last
    /// processed event.
    #[must_use]
    pub fn timed(time: SimTime) -> Self {
        Self {
            end_condition: EndCondition::Time(time),
        }
    }

    /// At most `steps` events.
    #[must_use]
    pub fn steps(steps: usize) -> Self {
        Self {
            end_condition: EndCondition::Steps(steps),
        }
    }
}

impl Execute for Executor {
    fn execute<C: Component>(self, sim: &mut Simulation<C>) -> SimResult<()> {
        match self.end_condition {
            EndCondition::Time(time) => execute_until(sim, time),
            EndCondition::NoEvents => execute_until_empty(sim),
            EndCondition::Steps(steps) => execute_steps(sim, steps),
        }
    }
}

fn execute_until_empty<C: Component>(sim: &mut Simulation<C>) -> SimResult<()> {
    while sim.step()? {}
    Ok(())
}

fn execute_until<C: Component>(sim: &mut Simulation<C>, time: SimTime) -> SimResult<()> {
    while sim.peek_next_event_time().is_some_and(|t| t <= time) {
        sim.step()?;
    }
    Ok(())
}

fn execute_steps<C: Component>(sim: &mut Simulation<C>, steps: usize) -> SimResult<()> {
    for _ in 0..steps {
        if !sim.step()? {
            break;
        }
    }
    Ok(())
}
