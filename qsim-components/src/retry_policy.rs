//! Retry policy for customers who find every teller busy
//!
//! A waiting customer re-checks availability after a fixed backoff. The first
//! `max_retries` re-checks count as retries; once the budget is spent the
//! customer gets one final, uncounted check and abandons if it fails too.

use qsim_core::SimTime;

/// What a retry-attempt event should do for a waiting customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Count a retry and re-check; schedule another attempt if still blocked.
    Retry,
    /// Budget spent: re-check once more, abandon if still blocked.
    FinalCheck,
}

/// Fixed-delay, bounded retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBackoffPolicy {
    max_retries: u32,
    backoff: SimTime,
}

impl FixedBackoffPolicy {
    pub fn new(max_retries: u32, backoff: SimTime) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay between a failed check and the next retry-attempt event.
    pub fn backoff(&self) -> SimTime {
        self.backoff
    }

    /// Decide for a customer who has already used `retries_so_far` retries.
    pub fn decide(&self, retries_so_far: u32) -> RetryDecision {
        if retries_so_far < self.max_retries {
            RetryDecision::Retry
        } else {
            RetryDecision::FinalCheck
        }
    }
}
