//! Metrics collection for discrete event simulation
//!
//! [`SimulationMetrics`] keeps running counter totals and the latest gauge
//! values, one map entry per metric name, and forwards every update to the
//! `metrics` crate facade so an installed recorder (Prometheus exporter,
//! debugging recorder, ...) sees the same values. Without a recorder the facade
//! calls are no-ops.
//!
//! A timestamped log of every update is only kept when the recorder is created
//! with [`SimulationMetrics::with_timeline`]; it grows with the number of
//! events processed.

use crate::SimTime;
use ::metrics::{counter, gauge};
use std::collections::HashMap;

/// A metric value with metadata for simulation analysis
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub name: String,
    pub metric_type: MetricType,
    pub value: f64,
    /// Simulation time when the metric was recorded
    pub timestamp: SimTime,
    pub component: String,
}

/// Types of metrics supported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// Monotonically increasing counter
    Counter,
    /// Value that can go up or down
    Gauge,
}

/// Simulation-specific metrics recorder that tracks values for analysis
#[derive(Debug, Default)]
pub struct SimulationMetrics {
    counters: HashMap<String, u64>,
    gauges: HashMap<String, f64>,
    timeline: Option<Vec<MetricValue>>,
}

impl SimulationMetrics {
    /// Recorder keeping totals and latest values only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder that also logs every update with its timestamp.
    pub fn with_timeline() -> Self {
        Self {
            timeline: Some(Vec::new()),
            ..Self::default()
        }
    }

    pub fn has_timeline(&self) -> bool {
        self.timeline.is_some()
    }

    /// Record a counter increment
    pub fn increment_counter(&mut self, name: &str, component: &str, timestamp: SimTime) {
        counter!(name.to_string(), "component" => component.to_string()).increment(1);

        match self.counters.get_mut(name) {
            Some(total) => *total += 1,
            None => {
                self.counters.insert(name.to_string(), 1);
            }
        }
        self.log(name, MetricType::Counter, 1.0, component, timestamp);
    }

    /// Record a gauge value
    pub fn record_gauge(&mut self, name: &str, component: &str, value: f64, timestamp: SimTime) {
        gauge!(name.to_string(), "component" => component.to_string()).set(value);

        match self.gauges.get_mut(name) {
            Some(latest) => *latest = value,
            None => {
                self.gauges.insert(name.to_string(), value);
            }
        }
        self.log(name, MetricType::Gauge, value, component, timestamp);
    }

    fn log(&mut self, name: &str, metric_type: MetricType, value: f64, component: &str, timestamp: SimTime) {
        if let Some(timeline) = self.timeline.as_mut() {
            timeline.push(MetricValue {
                name: name.to_string(),
                metric_type,
                value,
                timestamp,
                component: component.to_string(),
            });
        }
    }

    /// Timestamped updates in recording order; empty without a timeline.
    pub fn get_metrics(&self) -> &[MetricValue] {
        self.timeline.as_deref().unwrap_or(&[])
    }

    /// Sum of all increments recorded for counter `name`
    pub fn counter_total(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Latest value recorded for gauge `name`
    pub fn last_gauge(&self, name: &str) -> Option<f64> {
        self.gauges.get(name).copied()
    }

    /// Every gauge sample for `name` as a `(time, value)` series; empty
    /// without a timeline.
    pub fn gauge_series(&self, name: &str) -> Vec<(SimTime, f64)> {
        self.get_metrics()
            .iter()
            .filter(|m| m.metric_type == MetricType::Gauge && m.name == name)
            .map(|m| (m.timestamp, m.value))
            .collect()
    }

    pub fn clear(&mut self) {
        self.counters.clear();
        self.gauges.clear();
        if let Some(timeline) = self.timeline.as_mut() {
            timeline.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_metrics_counter() {
        let mut metrics = SimulationMetrics::with_timeline();
        let timestamp = SimTime::from_secs(1);

        metrics.increment_counter("customers_served", "bank", timestamp);
        metrics.increment_counter("customers_served", "bank", timestamp);
        metrics.increment_counter("customer_retries", "bank", timestamp);

        assert_eq!(metrics.get_metrics().len(), 3);
        assert_eq!(metrics.get_metrics()[0].metric_type, MetricType::Counter);
        assert_eq!(metrics.counter_total("customers_served"), 2);
        assert_eq!(metrics.counter_total("customer_retries"), 1);
        assert_eq!(metrics.counter_total("customers_abandoned"), 0);
    }

    #[test]
    fn test_simulation_metrics_gauge() {
        let mut metrics = SimulationMetrics::with_timeline();

        metrics.record_gauge("busy_tellers", "bank", 1.0, SimTime::from_secs(1));
        metrics.record_gauge("busy_tellers", "bank", 2.0, SimTime::from_secs(2));

        assert_eq!(metrics.last_gauge("busy_tellers"), Some(2.0));
        assert_eq!(metrics.last_gauge("queue_depth"), None);
        assert_eq!(
            metrics.gauge_series("busy_tellers"),
            vec![(SimTime::from_secs(1), 1.0), (SimTime::from_secs(2), 2.0)]
        );

        metrics.clear();
        assert!(metrics.get_metrics().is_empty());
        assert_eq!(metrics.last_gauge("busy_tellers"), None);
        assert!(metrics.has_timeline());
    }

    #[test]
    fn test_default_recorder_keeps_totals_only() {
        let mut metrics = SimulationMetrics::new();
        assert!(!metrics.has_timeline());

        // A long run touching the same few names must not accumulate entries
        for i in 0..100_000u64 {
            let now = SimTime::from_millis(i);
            metrics.increment_counter("customers_arrived", "bank", now);
            metrics.record_gauge("busy_tellers", "bank", (i % 4) as f64, now);
        }

        assert!(metrics.get_metrics().is_empty());
        assert!(metrics.gauge_series("busy_tellers").is_empty());
        assert_eq!(metrics.counter_total("customers_arrived"), 100_000);
        assert_eq!(metrics.last_gauge("busy_tellers"), Some(3.0));
        assert_eq!(metrics.counters.len(), 1);
        assert_eq!(metrics.gauges.len(), 1);
    }
}
