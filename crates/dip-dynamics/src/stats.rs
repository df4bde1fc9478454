//! Computation counters shared by every caller of a `DynamicsModel`.

use crate::error::{DynamicsFailure, FailureKind};
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters; a model can be evaluated from many threads at once.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    successful: AtomicU64,
    invalid_input: AtomicU64,
    out_of_bounds: AtomicU64,
    numerical_instability: AtomicU64,
}

impl StatsCounters {
    pub(crate) const fn new() -> Self {
        Self {
            successful: AtomicU64::new(0),
            invalid_input: AtomicU64::new(0),
            out_of_bounds: AtomicU64::new(0),
            numerical_instability: AtomicU64::new(0),
        }
    }

    pub(crate) fn record<T>(&self, outcome: &Result<T, DynamicsFailure>) {
        let counter = match outcome {
            Ok(_) => &self.successful,
            Err(e) => match e.kind() {
                FailureKind::InvalidInput => &self.invalid_input,
                FailureKind::OutOfBounds => &self.out_of_bounds,
                FailureKind::NumericalInstability => &self.numerical_instability,
            },
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ComputationStatistics {
        let successful = self.successful.load(Ordering::Relaxed);
        let invalid_input = self.invalid_input.load(Ordering::Relaxed);
        let out_of_bounds = self.out_of_bounds.load(Ordering::Relaxed);
        let numerical_instability = self.numerical_instability.load(Ordering::Relaxed);
        let failed = invalid_input + out_of_bounds + numerical_instability;
        ComputationStatistics {
            total: successful + failed,
            successful,
            failed,
            invalid_input,
            out_of_bounds,
            numerical_instability,
        }
    }
}

/// Point-in-time copy of a model's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComputationStatistics {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub invalid_input: u64,
    pub out_of_bounds: u64,
    pub numerical_instability: u64,
}

impl ComputationStatistics {
    /// Fraction of successful computations; 0 before the first call.
    pub fn success_rate(&self) -> f64 {
        if self.total > 0 {
            self.successful as f64 / self.total as f64
        } else {
            0.0
        }
    }
}
