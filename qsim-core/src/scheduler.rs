use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

use crate::error::{SimError, SimResult};
use crate::types::EventId;
use crate::SimTime;

/// Entry type stored in the scheduler: the event value, the time when it is
/// supposed to occur, and the id assigned when it was scheduled.
///
/// Entries are ordered by time first and by id second, which makes events
/// scheduled for the same instant pop in insertion (FIFO) order.
#[derive(Debug)]
pub struct EventEntry<E> {
    id: EventId,
    time: SimTime,
    event: E,
}

impl<E> EventEntry<E> {
    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    /// Consumes the entry, returning the event value.
    pub fn into_event(self) -> E {
        self.event
    }
}

impl<E> PartialEq for EventEntry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.id == other.id
    }
}

impl<E> Eq for EventEntry<E> {}

impl<E> PartialOrd for EventEntry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for EventEntry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse the ordering for min-heap behavior in BinaryHeap
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.id.cmp(&self.id))
    }
}

type Clock = Rc<Cell<SimTime>>;

/// Read-only handle on the scheduler's clock.
///
/// Only popping an event moves the clock; holders of a `ClockRef` observe it.
///
/// ```
/// # use qsim_core::Scheduler;
/// let scheduler: Scheduler<()> = Scheduler::default();
/// let clock_ref = scheduler.clock();
/// assert_eq!(clock_ref.time(), scheduler.time());
/// ```
#[derive(Clone)]
pub struct ClockRef {
    clock: Clock,
}

impl From<Clock> for ClockRef {
    fn from(clock: Clock) -> Self {
        Self { clock }
    }
}

impl ClockRef {
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }
}

/// Scheduler keeps the current time and the pending events, and hands them out
/// in timestamp order.
///
/// See the [crate-level documentation](crate) for more information.
pub struct Scheduler<E> {
    next_event_id: u64,
    events: BinaryHeap<EventEntry<E>>,
    clock: Clock,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            next_event_id: 0,
            events: BinaryHeap::default(),
            clock: Rc::new(Cell::new(SimTime::default())),
        }
    }
}

impl<E: fmt::Debug> Scheduler<E> {
    /// Schedules `event` at the absolute time `time`.
    ///
    /// Events past any horizon are still stored; it is up to the executor to
    /// stop popping.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::IllegalState`] if `time` lies before the clock.
    pub fn schedule(&mut self, time: SimTime, event: E) -> SimResult<EventId> {
        if time < self.time() {
            return Err(SimError::illegal_state(format!(
                "cannot schedule {event:?} at {time}, clock is already at {}",
                self.time()
            )));
        }
        self.next_event_id += 1;
        let id = EventId(self.next_event_id);
        trace!(event_id = %id, time = %time, event = ?event, "Event scheduled");
        self.events.push(EventEntry { id, time, event });
        Ok(id)
    }

    /// Schedules `event` at `self.time() + delay`.
    pub fn schedule_in(&mut self, delay: SimTime, event: E) -> SimResult<EventId> {
        let time = self.time() + delay;
        self.schedule(time, event)
    }

    /// Schedules `event` at `self.time()`.
    pub fn schedule_now(&mut self, event: E) -> SimResult<EventId> {
        self.schedule(self.time(), event)
    }
}

impl<E> Scheduler<E> {
    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }

    /// Returns a structure with immutable access to the simulation time.
    #[must_use]
    pub fn clock(&self) -> ClockRef {
        ClockRef {
            clock: Rc::clone(&self.clock),
        }
    }

    /// Returns a reference to the next scheduled event or `None` if none are left.
    pub fn peek(&self) -> Option<&EventEntry<E>> {
        self.events.peek()
    }

    /// Time of the next scheduled event.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.events.peek().map(EventEntry::time)
    }

    /// Removes and returns the next scheduled event or `None` if none are left.
    /// The clock advances to the event's time.
    pub fn pop(&mut self) -> Option<EventEntry<E>> {
        self.events.pop().inspect(|event| {
            self.clock.replace(event.time());
        })
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
