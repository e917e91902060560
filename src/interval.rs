//! Interval Buffer
//!
//! Fixed capacity ring of the most recent gaps between recorded event
//! positions, with an O(1) streaming mean.
use crate::errors::StreamError;
use crate::utils::validate_positive_usize_parameter;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalBuffer {
    capacity: usize,
    intervals: VecDeque<u64>,
    last_position: Option<u64>,
    // Gaps are integers, so the running sum stays exact.
    sum: u64,
}

impl IntervalBuffer {
    /// Create an empty buffer retaining up to `capacity` intervals.
    pub fn new(capacity: usize) -> Result<Self, StreamError> {
        validate_positive_usize_parameter(capacity, "buffer_capacity")?;
        Ok(IntervalBuffer {
            capacity,
            intervals: VecDeque::with_capacity(capacity),
            last_position: None,
            sum: 0,
        })
    }

    /// Record an event position. The gap to the previous position is stored,
    /// evicting the oldest gap once the buffer is full.
    pub fn record(&mut self, position: u64) -> Result<(), StreamError> {
        match self.last_position {
            Some(last) if position < last => {
                return Err(StreamError::NonMonotonicPosition {
                    last,
                    provided: position,
                })
            }
            Some(last) => self.push_interval(position - last),
            None => (),
        }
        self.last_position = Some(position);
        Ok(())
    }

    /// Store a gap length directly.
    pub fn push_interval(&mut self, gap: u64) {
        if self.intervals.len() == self.capacity {
            if let Some(evicted) = self.intervals.pop_front() {
                self.sum -= evicted;
            }
        }
        self.intervals.push_back(gap);
        self.sum += gap;
    }

    /// Mean of the retained intervals. Returns 0.0 when no interval exists yet,
    /// which callers treat as "not enough data to decide".
    pub fn mean(&self) -> f64 {
        if self.intervals.is_empty() {
            0.0
        } else {
            self.sum as f64 / self.intervals.len() as f64
        }
    }

    pub fn intervals(&self) -> impl Iterator<Item = &u64> {
        self.intervals.iter()
    }

    pub fn last_position(&self) -> Option<u64> {
        self.last_position
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.intervals.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
        self.last_position = None;
        self.sum = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_consecutive_gaps() {
        let mut buffer = IntervalBuffer::new(4).unwrap();
        for p in [1, 5, 7] {
            buffer.record(p).unwrap();
        }
        assert_eq!(buffer.intervals().copied().collect::<Vec<_>>(), vec![4, 2]);
        assert_eq!(buffer.mean(), 3.0);

        buffer.record(11).unwrap();
        assert_eq!(buffer.intervals().copied().collect::<Vec<_>>(), vec![4, 2, 4]);
        assert_eq!(buffer.mean(), 10.0 / 3.0);
    }

    #[test]
    fn test_no_data_mean_is_not_positive() {
        let mut buffer = IntervalBuffer::new(4).unwrap();
        assert!(buffer.mean() <= 0.0);
        // A single position still gives no interval.
        buffer.record(10).unwrap();
        assert!(buffer.mean() <= 0.0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_fifo_eviction() {
        let mut buffer = IntervalBuffer::new(2).unwrap();
        for p in [0, 10, 12, 32] {
            buffer.record(p).unwrap();
        }
        // Gaps 10, 2, 20 -> the oldest one is evicted.
        assert!(buffer.is_full());
        assert_eq!(buffer.intervals().copied().collect::<Vec<_>>(), vec![2, 20]);
        assert_eq!(buffer.mean(), 11.0);
    }

    #[test]
    fn test_rejects_position_regression() {
        let mut buffer = IntervalBuffer::new(3).unwrap();
        buffer.record(5).unwrap();
        buffer.record(8).unwrap();
        let before = buffer.clone();
        assert_eq!(
            buffer.record(7),
            Err(StreamError::NonMonotonicPosition { last: 8, provided: 7 })
        );
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(IntervalBuffer::new(0).is_err());
    }

    #[test]
    fn test_clear() {
        let mut buffer = IntervalBuffer::new(3).unwrap();
        for p in [1, 2, 4] {
            buffer.record(p).unwrap();
        }
        buffer.clear();
        assert_eq!(buffer, IntervalBuffer::new(3).unwrap());
    }
}
