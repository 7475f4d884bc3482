//! Validation infrastructure for component configuration
//!
//! Builders collect fields, then run [`Validate::validate`] in `build()` so a
//! malformed configuration is rejected before any component exists. All
//! failures are reported as [`SimError::InvalidConfiguration`] naming the field.

use qsim_core::{SimError, SimResult, SimTime};

/// Trait for validating builder configurations
///
/// Every configuration type states its own rules; `build()` and the other
/// constructors call this before creating anything.
pub trait Validate {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if validation fails.
    fn validate(&self) -> SimResult<()>;
}

/// Helper to validate that a value is positive and finite
pub fn validate_positive(field: &str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid_config(
            field,
            format!("must be positive and finite, got {value}"),
        ))
    }
}

/// Convert a span of time units to a clock value.
///
/// The span must be positive, fit the clock range and still be non-zero after
/// rounding to whole nanoseconds.
pub fn validate_sim_time(field: &str, value: f64) -> SimResult<SimTime> {
    validate_positive(field, value)?;
    let time = SimTime::try_from_secs_f64(value)
        .map_err(|e| SimError::invalid_config(field, e.to_string()))?;
    if time == SimTime::zero() {
        return Err(SimError::invalid_config(
            field,
            format!("{value} rounds to zero at nanosecond resolution"),
        ));
    }
    Ok(time)
}

/// Helper to validate that a count is non-zero
pub fn validate_non_zero(field: &str, value: usize) -> SimResult<()> {
    if value == 0 {
        Err(SimError::invalid_config(field, "must be greater than zero"))
    } else {
        Ok(())
    }
}

/// Unwrap a required builder field
pub fn require<T>(field: &str, value: Option<T>) -> SimResult<T> {
    value.ok_or_else(|| SimError::invalid_config(field, "is required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("rate", 1.0).is_ok());
        assert!(validate_positive("rate", 0.001).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = validate_positive("rate", bad).unwrap_err();
            assert!(matches!(err, SimError::InvalidConfiguration { ref field, .. } if field == "rate"));
        }
    }

    #[test]
    fn test_validate_sim_time() {
        assert_eq!(validate_sim_time("retry_backoff", 0.5).unwrap(), SimTime::from_millis(500));
        assert_eq!(validate_sim_time("retry_backoff", 1e-9).unwrap(), SimTime::from_nanos(1));

        // Rounds to zero, exceeds the clock, not positive
        for bad in [1e-12, 4e-10, 1e30, SimTime::MAX_SECS * 2.0, 0.0, -1.0] {
            let err = validate_sim_time("retry_backoff", bad).unwrap_err();
            assert!(
                matches!(err, SimError::InvalidConfiguration { ref field, .. } if field == "retry_backoff"),
                "{bad} accepted: {err:?}"
            );
        }
    }

    /// Rules live on the configuration type itself.
    struct Window {
        open: f64,
        slots: usize,
    }

    impl Validate for Window {
        fn validate(&self) -> SimResult<()> {
            validate_sim_time("open", self.open)?;
            validate_non_zero("slots", self.slots)
        }
    }

    #[test]
    fn test_validate_implemented_per_type() {
        assert!(Window { open: 2.0, slots: 1 }.validate().is_ok());
        let err = Window { open: 1e-12, slots: 1 }.validate().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration { ref field, .. } if field == "open"));
        let err = Window { open: 2.0, slots: 0 }.validate().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration { ref field, .. } if field == "slots"));
    }

    #[test]
    fn test_validate_non_zero() {
        assert!(validate_non_zero("num_tellers", 1).is_ok());
        assert!(validate_non_zero("num_tellers", 0).is_err());
    }

    #[test]
    fn test_require() {
        assert_eq!(require("seed", Some(3)).unwrap(), 3);
        let err = require::<u64>("seed", None).unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration for 'seed': is required");
    }
}
