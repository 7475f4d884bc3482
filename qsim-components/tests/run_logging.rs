//! The run's log output is grouped under one simulation span
//!
//! A small layer records, for every event, the spans it was emitted in.

use qsim_components::{QueueConfig, QueueingSystem};
use std::sync::{Arc, Mutex};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

#[derive(Clone, Default)]
struct ScopeRecorder {
    events: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl<S> Layer<S> for ScopeRecorder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let scope: Vec<String> = ctx
            .event_scope(event)
            .map(|scope| scope.from_root().map(|span| span.name().to_string()).collect())
            .unwrap_or_default();
        let target = event.metadata().target().to_string();
        self.events.lock().unwrap().push((target, scope));
    }
}

#[test]
fn run_events_are_inside_the_simulation_span() {
    println!("\n=== Log scope of a queueing run ===\n");

    let recorder = ScopeRecorder::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());

    tracing::subscriber::with_default(subscriber, || {
        let mut system = QueueingSystem::new(QueueConfig::new(1, 5.0, 2.0, 1.0)).unwrap();
        system.run_simulation().unwrap();
    });

    let events = recorder.events.lock().unwrap();
    let from_model: Vec<_> = events
        .iter()
        .filter(|(target, _)| target.starts_with("qsim_components"))
        .collect();
    println!("{} events from the queue model", from_model.len());

    assert!(!from_model.is_empty());
    assert!(from_model
        .iter()
        .all(|(_, scope)| scope.first().map(String::as_str) == Some("simulation")));

    println!("✅ Every model event carries the simulation span");
}
