//! Virtual time
//!
//! One simulated time unit is one second of [`SimTime`]. Rates in the queueing
//! model (arrivals per unit, services per unit) are therefore "per second".

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

const NANOS_PER_UNIT: u64 = 1_000_000_000;
const NANOS_PER_SEC: f64 = NANOS_PER_UNIT as f64;

/// A point in virtual time, in nanoseconds since the run started.
///
/// Arithmetic saturates instead of wrapping, and subtracting a later time
/// yields a zero [`Duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTime(u64);

impl SimTime {
    /// Largest number of time units representable as a `SimTime`.
    pub const MAX_SECS: f64 = (u64::MAX as f64) / NANOS_PER_SEC;

    pub const fn zero() -> Self {
        SimTime(0)
    }

    pub const fn from_nanos(nanos: u64) -> Self {
        SimTime(nanos)
    }

    pub const fn from_millis(millis: u64) -> Self {
        SimTime(millis.saturating_mul(1_000_000))
    }

    /// Whole time units
    pub const fn from_secs(secs: u64) -> Self {
        SimTime(secs.saturating_mul(NANOS_PER_UNIT))
    }

    /// Saturates at the largest representable time.
    pub fn from_duration(duration: Duration) -> Self {
        SimTime(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX))
    }

    /// Convert a fractional number of time units into a `SimTime`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidTime`] for negative, non-finite or
    /// out-of-range values.
    pub fn try_from_secs_f64(secs: f64) -> Result<Self, SimError> {
        if !secs.is_finite() || secs < 0.0 || secs > Self::MAX_SECS {
            return Err(SimError::InvalidTime { value: secs });
        }
        Ok(SimTime((secs * NANOS_PER_SEC).round() as u64))
    }

    /// Elapsed time since the start of the run.
    pub fn as_duration(&self) -> Duration {
        Duration::from_nanos(self.0)
    }

    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Time since the simulation start, in fractional time units
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC
    }

    /// Zero if `earlier` is actually later.
    pub fn duration_since(&self, earlier: SimTime) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }
}

impl Add<SimTime> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> Self::Output {
        SimTime(self.0.saturating_add(rhs.0))
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> Self::Output {
        self + SimTime::from_duration(rhs)
    }
}

impl Sub<SimTime> for SimTime {
    type Output = Duration;

    fn sub(self, rhs: SimTime) -> Self::Output {
        self.duration_since(rhs)
    }
}

impl Default for SimTime {
    fn default() -> Self {
        SimTime::zero()
    }
}

impl TryFrom<f64> for SimTime {
    type Error = SimError;

    fn try_from(secs: f64) -> Result<Self, Self::Error> {
        SimTime::try_from_secs_f64(secs)
    }
}

impl fmt::Display for SimTime {
    /// Fractional time units with at least millisecond digits, e.g. `1.500s`
    /// or `0.000000007s`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / NANOS_PER_UNIT;
        let mut frac = format!("{:09}", self.0 % NANOS_PER_UNIT);
        while frac.len() > 3 && frac.ends_with('0') {
            frac.pop();
        }
        write!(f, "{whole}.{frac}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_constructors_agree() {
        assert_eq!(SimTime::default(), SimTime::zero());
        assert_eq!(SimTime::from_secs(2), SimTime::from_millis(2_000));
        assert_eq!(SimTime::from_millis(3), SimTime::from_nanos(3_000_000));
        assert_eq!(SimTime::from_duration(Duration::from_micros(5)).as_nanos(), 5_000);
        assert_eq!(SimTime::from_secs(u64::MAX).as_nanos(), u64::MAX);
    }

    #[test]
    fn test_simtime_arithmetic() {
        let t1 = SimTime::from_millis(100);
        let t2 = SimTime::from_millis(50);

        assert_eq!(t1 + Duration::from_millis(25), SimTime::from_millis(125));
        assert_eq!(t1 + t2, SimTime::from_millis(150));
        assert_eq!(t1 - t2, Duration::from_millis(50));
        // Saturates instead of underflowing
        assert_eq!(t2 - t1, Duration::ZERO);
    }

    #[test]
    fn test_simtime_from_f64() {
        assert_eq!(SimTime::try_from(1.0).unwrap().as_nanos(), 1_000_000_000);
        assert_eq!(SimTime::try_from(0.5).unwrap().as_nanos(), 500_000_000);
        assert_eq!(SimTime::try_from(0.000001).unwrap().as_nanos(), 1_000);
        assert_eq!(SimTime::from_secs(10).as_secs_f64(), 10.0);
    }

    #[test]
    fn test_simtime_rejects_bad_f64() {
        assert!(matches!(SimTime::try_from(-1.0), Err(SimError::InvalidTime { .. })));
        assert!(SimTime::try_from(f64::INFINITY).is_err());
        assert!(SimTime::try_from(f64::NAN).is_err());
        assert!(SimTime::try_from(SimTime::MAX_SECS * 2.0).is_err());
    }

    #[test]
    fn test_simtime_display() {
        assert_eq!(SimTime::from_millis(1500).to_string(), "1.500s");
        assert_eq!(SimTime::from_millis(2).to_string(), "0.002s");
        assert_eq!(SimTime::from_secs(12).to_string(), "12.000s");
        assert_eq!(SimTime::from_nanos(1_250_000).to_string(), "0.00125s");
        assert_eq!(SimTime::from_nanos(7).to_string(), "0.000000007s");
    }
}
