//! Budget
//!
//! Cooperative time budget consulted by the host before expensive work, plus
//! advisory operation counters for host-side accounting. Nothing in the crate
//! depends on these for correctness.
use std::time::{Duration, Instant};

/// Kind of arithmetic work reported to a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    IntegerAddition,
    RealAddition,
    Multiplication,
    Division,
}

/// Running totals of reported operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationCounts {
    pub integer_additions: u64,
    pub real_additions: u64,
    pub multiplications: u64,
    pub divisions: u64,
}

impl OperationCounts {
    pub fn add(&mut self, operation: Operation, n: u64) {
        let counter = match operation {
            Operation::IntegerAddition => &mut self.integer_additions,
            Operation::RealAddition => &mut self.real_additions,
            Operation::Multiplication => &mut self.multiplications,
            Operation::Division => &mut self.divisions,
        };
        *counter = counter.saturating_add(n);
    }

    pub fn total(&self) -> u64 {
        self.integer_additions
            .saturating_add(self.real_additions)
            .saturating_add(self.multiplications)
            .saturating_add(self.divisions)
    }
}

pub trait TimeBudget {
    /// Whether the caller may keep doing work.
    fn has_more_time(&self) -> bool;
    /// Report `n` operations of the given kind.
    fn record_operations(&mut self, _operation: Operation, _n: u64) {}
}

/// A budget that never runs out.
#[derive(Debug, Default)]
pub struct Unbounded {
    pub counts: OperationCounts,
}

impl TimeBudget for Unbounded {
    fn has_more_time(&self) -> bool {
        true
    }
    fn record_operations(&mut self, operation: Operation, n: u64) {
        self.counts.add(operation, n);
    }
}

/// Wall clock budget, started on construction.
#[derive(Debug)]
pub struct Deadline {
    start: Instant,
    limit: Duration,
    pub counts: OperationCounts,
}

impl Deadline {
    pub fn new(limit: Duration) -> Self {
        Deadline {
            start: Instant::now(),
            limit,
            counts: OperationCounts::default(),
        }
    }

    pub fn from_secs_f32(timeout: f32) -> Self {
        Deadline::new(Duration::try_from_secs_f32(timeout.max(0.0)).unwrap_or(Duration::MAX))
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl TimeBudget for Deadline {
    fn has_more_time(&self) -> bool {
        self.start.elapsed() < self.limit
    }
    fn record_operations(&mut self, operation: Operation, n: u64) {
        self.counts.add(operation, n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_counts() {
        let mut budget = Unbounded::default();
        budget.record_operations(Operation::RealAddition, 3);
        budget.record_operations(Operation::Division, 2);
        budget.record_operations(Operation::RealAddition, 1);
        assert_eq!(budget.counts.real_additions, 4);
        assert_eq!(budget.counts.divisions, 2);
        assert_eq!(budget.counts.total(), 6);
        assert!(budget.has_more_time());
    }

    #[test]
    fn test_deadline() {
        let budget = Deadline::new(Duration::ZERO);
        assert!(!budget.has_more_time());
        let budget = Deadline::from_secs_f32(3600.0);
        assert!(budget.has_more_time());
    }
}
