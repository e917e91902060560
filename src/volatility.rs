//! Volatility
//!
//! Turns the change signals of an external detector into a measure of how
//! volatile the stream is: the mean number of records between changes.
use crate::errors::StreamError;
use crate::interval::IntervalBuffer;
use crate::utils::{validate_observation, validate_positive_float_parameter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A binary change detector fed with one error signal per record.
pub trait ChangeDetector {
    /// Feed the next signal, returns `true` when a change is flagged on this call.
    fn set_input(&mut self, signal: f64) -> bool;
    /// The detector's own estimate of the monitored signal, if it keeps one.
    fn estimation(&self) -> f64 {
        f64::NAN
    }
    fn reset(&mut self);
}

/// Identity of one of the two supervised models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelId {
    First,
    Second,
}

impl ModelId {
    pub fn number(&self) -> u8 {
        match self {
            ModelId::First => 1,
            ModelId::Second => 2,
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Policy choosing a model from the mean interval between changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClassifierSelector {
    /// Always keep the first model.
    AlwaysFirst,
    /// Short intervals (a volatile stream) favour the first model, long
    /// intervals favour the second one.
    NaiveThreshold { threshold: f64 },
}

impl ClassifierSelector {
    pub fn naive_threshold(threshold: f64) -> Result<Self, StreamError> {
        let selector = ClassifierSelector::NaiveThreshold { threshold };
        selector.validate()?;
        Ok(selector)
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        match self {
            ClassifierSelector::AlwaysFirst => Ok(()),
            ClassifierSelector::NaiveThreshold { threshold } => {
                validate_positive_float_parameter(*threshold, "switch_threshold")
            }
        }
    }

    pub fn make_decision(&self, avg_interval: f64) -> ModelId {
        match self {
            ClassifierSelector::AlwaysFirst => ModelId::First,
            ClassifierSelector::NaiveThreshold { threshold } => {
                if avg_interval < *threshold {
                    ModelId::First
                } else {
                    ModelId::Second
                }
            }
        }
    }
}

/// Records the position of every change flagged by the wrapped detector and
/// exposes the mean gap between them.
#[derive(Debug, Clone)]
pub struct VolatilityDetector<D: ChangeDetector> {
    detector: D,
    buffer: IntervalBuffer,
    position: u64,
    last_mean: f64,
}

impl<D: ChangeDetector> VolatilityDetector<D> {
    pub fn new(detector: D, buffer_capacity: usize) -> Result<Self, StreamError> {
        Ok(VolatilityDetector {
            detector,
            buffer: IntervalBuffer::new(buffer_capacity)?,
            position: 0,
            last_mean: 0.0,
        })
    }

    /// Feed the signal of the next record. Returns whether a change was flagged.
    pub fn set_input_var(&mut self, signal: f64) -> Result<bool, StreamError> {
        validate_observation(signal, "signal")?;
        self.position += 1;
        if self.detector.set_input(signal) {
            self.buffer.record(self.position)?;
            self.last_mean = self.buffer.mean();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Mean interval between the retained changes, 0.0 until two changes were seen.
    pub fn buffer_mean(&self) -> f64 {
        self.buffer.mean()
    }

    /// Mean computed at the last flagged change.
    pub fn last_mean(&self) -> f64 {
        self.last_mean
    }

    pub fn buffer(&self) -> &IntervalBuffer {
        &self.buffer
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Number of signals seen since the last reset.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn reset(&mut self) {
        self.detector.reset();
        self.buffer.clear();
        self.position = 0;
        self.last_mean = 0.0;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Flags a change at fixed record positions and keeps every signal it was fed.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct ScriptedDetector {
        pub changes: Vec<u64>,
        pub seen: u64,
        pub signals: Vec<f64>,
    }

    impl ScriptedDetector {
        pub(crate) fn at(changes: &[u64]) -> Self {
            ScriptedDetector {
                changes: changes.to_vec(),
                seen: 0,
                signals: Vec::new(),
            }
        }
    }

    impl ChangeDetector for ScriptedDetector {
        fn set_input(&mut self, signal: f64) -> bool {
            self.seen += 1;
            self.signals.push(signal);
            self.changes.contains(&self.seen)
        }
        fn reset(&mut self) {
            self.seen = 0;
            self.signals.clear();
        }
    }

    #[test]
    fn test_naive_threshold() {
        let selector = ClassifierSelector::naive_threshold(100.0).unwrap();
        assert_eq!(selector.make_decision(99.0), ModelId::First);
        assert_eq!(selector.make_decision(100.0), ModelId::Second);
        assert_eq!(selector.make_decision(101.0), ModelId::Second);
        assert!(ClassifierSelector::naive_threshold(0.0).is_err());
        assert!(ClassifierSelector::naive_threshold(f64::NAN).is_err());
    }

    #[test]
    fn test_always_first() {
        let selector = ClassifierSelector::AlwaysFirst;
        for avg in [-1.0, 0.0, 1e9] {
            assert_eq!(selector.make_decision(avg), ModelId::First);
        }
    }

    #[test]
    fn test_model_id_display() {
        assert_eq!(ModelId::First.to_string(), "1");
        assert_eq!(ModelId::Second.number(), 2);
    }

    #[test]
    fn test_volatility_detector_records_change_positions() {
        let mut detector = VolatilityDetector::new(ScriptedDetector::at(&[1, 5, 7, 11]), 4).unwrap();
        let mut flagged = Vec::new();
        for _ in 0..7 {
            flagged.push(detector.set_input_var(1.0).unwrap());
        }
        assert_eq!(flagged, vec![true, false, false, false, true, false, true]);
        assert_eq!(detector.buffer_mean(), 3.0);
        for _ in 0..4 {
            detector.set_input_var(0.0).unwrap();
        }
        assert_eq!(detector.buffer_mean(), 10.0 / 3.0);
        assert_eq!(detector.last_mean(), 10.0 / 3.0);
        assert_eq!(detector.position(), 11);
        assert_eq!(detector.detector().signals, [vec![1.0; 7], vec![0.0; 4]].concat());
    }

    #[test]
    fn test_volatility_detector_no_data() {
        let mut detector = VolatilityDetector::new(ScriptedDetector::at(&[2]), 4).unwrap();
        assert!(detector.buffer_mean() <= 0.0);
        detector.set_input_var(0.0).unwrap();
        assert!(detector.set_input_var(1.0).unwrap());
        assert!(detector.buffer_mean() <= 0.0);
    }

    #[test]
    fn test_volatility_detector_rejects_nan_and_resets() {
        let mut detector = VolatilityDetector::new(ScriptedDetector::at(&[1, 3]), 2).unwrap();
        assert!(detector.set_input_var(f64::NAN).is_err());
        assert_eq!(detector.position(), 0);
        for _ in 0..3 {
            detector.set_input_var(1.0).unwrap();
        }
        assert_eq!(detector.buffer_mean(), 2.0);
        detector.reset();
        assert_eq!(detector.position(), 0);
        assert!(detector.buffer().is_empty());
        assert_eq!(detector.detector().seen, 0);
        assert!(VolatilityDetector::new(ScriptedDetector::default(), 0).is_err());
    }
}
