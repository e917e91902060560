//! Fading Error Accumulators
//!
//! Exponentially faded error estimates, so the most recent predictions
//! dominate the error reported for a model.
use crate::constants::DEFAULT_FADING_ERROR_FACTOR;
use crate::errors::StreamError;
use crate::utils::{items_to_strings, validate_float_parameter, validate_observation, validate_weight};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Default)]
pub enum ErrorMeasure {
    #[default]
    MeanAbsoluteDeviation,
    RootMeanSquaredError,
}

impl FromStr for ErrorMeasure {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MeanAbsoluteDeviation" => Ok(ErrorMeasure::MeanAbsoluteDeviation),
            "RootMeanSquaredError" => Ok(ErrorMeasure::RootMeanSquaredError),
            _ => Err(StreamError::ParseString(
                s.to_string(),
                "ErrorMeasure".to_string(),
                items_to_strings(vec!["MeanAbsoluteDeviation", "RootMeanSquaredError"]),
            )),
        }
    }
}

impl ErrorMeasure {
    /// Build a fresh accumulator of this kind.
    pub fn accumulator(&self, fading_error_factor: f64) -> Result<Box<dyn ErrorAccumulator>, StreamError> {
        Ok(match self {
            ErrorMeasure::MeanAbsoluteDeviation => Box::new(MeanAbsoluteDeviation::new(fading_error_factor)?),
            ErrorMeasure::RootMeanSquaredError => Box::new(RootMeanSquaredError::new(fading_error_factor)?),
        })
    }
}

pub trait ErrorAccumulator {
    /// Fold a new prediction into the faded error. NaN inputs and negative
    /// weights are rejected without touching the state.
    fn add_prediction(&mut self, predicted: f64, actual: f64, weight: f64) -> Result<(), StreamError>;
    /// Current faded error, `f64::MAX` while no weight has been seen.
    fn current_error(&self) -> f64;
    fn weight_seen(&self) -> f64;
    fn fading_error_factor(&self) -> f64;
    fn reset(&mut self);
}

/// Decayed sums shared by every error measure.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FadingSums {
    fading_error_factor: f64,
    weight_seen: f64,
    sum_error: f64,
}

impl FadingSums {
    fn new(fading_error_factor: f64) -> Result<Self, StreamError> {
        validate_float_parameter(fading_error_factor, 0.0, 1.0, "fading_error_factor")?;
        Ok(FadingSums {
            fading_error_factor,
            weight_seen: 0.0,
            sum_error: 0.0,
        })
    }

    fn add(&mut self, error: f64, weight: f64) {
        if weight == 0.0 {
            return;
        }
        self.sum_error = error * weight + self.fading_error_factor * self.sum_error;
        self.weight_seen = weight + self.fading_error_factor * self.weight_seen;
    }

    fn mean(&self) -> Option<f64> {
        if self.weight_seen > 0.0 {
            Some(self.sum_error / self.weight_seen)
        } else {
            None
        }
    }

    fn reset(&mut self) {
        self.weight_seen = 0.0;
        self.sum_error = 0.0;
    }
}

fn validate_prediction(predicted: f64, actual: f64, weight: f64) -> Result<(), StreamError> {
    validate_observation(predicted, "predicted")?;
    validate_observation(actual, "actual")?;
    validate_weight(weight)
}

/// Faded mean absolute deviation.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanAbsoluteDeviation {
    sums: FadingSums,
}

impl MeanAbsoluteDeviation {
    pub fn new(fading_error_factor: f64) -> Result<Self, StreamError> {
        Ok(MeanAbsoluteDeviation {
            sums: FadingSums::new(fading_error_factor)?,
        })
    }
}

impl Default for MeanAbsoluteDeviation {
    fn default() -> Self {
        MeanAbsoluteDeviation {
            sums: FadingSums {
                fading_error_factor: DEFAULT_FADING_ERROR_FACTOR,
                weight_seen: 0.0,
                sum_error: 0.0,
            },
        }
    }
}

impl ErrorAccumulator for MeanAbsoluteDeviation {
    fn add_prediction(&mut self, predicted: f64, actual: f64, weight: f64) -> Result<(), StreamError> {
        validate_prediction(predicted, actual, weight)?;
        self.sums.add((predicted - actual).abs(), weight);
        Ok(())
    }
    fn current_error(&self) -> f64 {
        self.sums.mean().unwrap_or(f64::MAX)
    }
    fn weight_seen(&self) -> f64 {
        self.sums.weight_seen
    }
    fn fading_error_factor(&self) -> f64 {
        self.sums.fading_error_factor
    }
    fn reset(&mut self) {
        self.sums.reset();
    }
}

/// Faded root mean squared error. The square root is only taken on read.
#[derive(Debug, Clone, PartialEq)]
pub struct RootMeanSquaredError {
    sums: FadingSums,
}

impl RootMeanSquaredError {
    pub fn new(fading_error_factor: f64) -> Result<Self, StreamError> {
        Ok(RootMeanSquaredError {
            sums: FadingSums::new(fading_error_factor)?,
        })
    }
}

impl Default for RootMeanSquaredError {
    fn default() -> Self {
        RootMeanSquaredError {
            sums: FadingSums {
                fading_error_factor: DEFAULT_FADING_ERROR_FACTOR,
                weight_seen: 0.0,
                sum_error: 0.0,
            },
        }
    }
}

impl ErrorAccumulator for RootMeanSquaredError {
    fn add_prediction(&mut self, predicted: f64, actual: f64, weight: f64) -> Result<(), StreamError> {
        validate_prediction(predicted, actual, weight)?;
        self.sums.add((predicted - actual).powi(2), weight);
        Ok(())
    }
    fn current_error(&self) -> f64 {
        self.sums.mean().map(f64::sqrt).unwrap_or(f64::MAX)
    }
    fn weight_seen(&self) -> f64 {
        self.sums.weight_seen
    }
    fn fading_error_factor(&self) -> f64 {
        self.sums.fading_error_factor
    }
    fn reset(&mut self) {
        self.sums.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::precision_round;

    #[test]
    fn test_untrained_is_worst() {
        let mad = MeanAbsoluteDeviation::default();
        let rmse = RootMeanSquaredError::default();
        assert_eq!(mad.current_error(), f64::MAX);
        assert_eq!(rmse.current_error(), f64::MAX);
    }

    #[test]
    fn test_single_observation() {
        let mut mad = MeanAbsoluteDeviation::new(0.99).unwrap();
        mad.add_prediction(3.0, 5.5, 4.0).unwrap();
        assert_eq!(mad.current_error(), 2.5);
        assert_eq!(mad.weight_seen(), 4.0);

        let mut rmse = RootMeanSquaredError::new(0.99).unwrap();
        rmse.add_prediction(3.0, 5.5, 4.0).unwrap();
        assert_eq!(rmse.current_error(), 2.5);
    }

    #[test]
    fn test_fading() {
        let mut mad = MeanAbsoluteDeviation::new(0.5).unwrap();
        mad.add_prediction(0.0, 4.0, 1.0).unwrap();
        mad.add_prediction(0.0, 1.0, 1.0).unwrap();
        // sum = 1 + 0.5 * 4 = 3, weight = 1 + 0.5 = 1.5
        assert_eq!(mad.current_error(), 2.0);

        let mut rmse = RootMeanSquaredError::new(0.5).unwrap();
        rmse.add_prediction(0.0, 4.0, 1.0).unwrap();
        rmse.add_prediction(0.0, 1.0, 1.0).unwrap();
        // sum = 1 + 0.5 * 16 = 9, weight = 1.5
        assert_eq!(precision_round(rmse.current_error(), 10), precision_round(6.0_f64.sqrt(), 10));
    }

    #[test]
    fn test_degenerate_factors() {
        // No decay, plain running mean.
        let mut mad = MeanAbsoluteDeviation::new(1.0).unwrap();
        for e in [1.0, 2.0, 3.0, 6.0] {
            mad.add_prediction(e, 0.0, 1.0).unwrap();
        }
        assert_eq!(mad.current_error(), 3.0);

        // Only the latest observation counts.
        let mut mad = MeanAbsoluteDeviation::new(0.0).unwrap();
        for e in [1.0, 2.0, 3.0, 6.0] {
            mad.add_prediction(e, 0.0, 1.0).unwrap();
        }
        assert_eq!(mad.current_error(), 6.0);
    }

    #[test]
    fn test_zero_weight_is_a_no_op() {
        let mut mad = MeanAbsoluteDeviation::new(0.0).unwrap();
        mad.add_prediction(1.0, 0.0, 1.0).unwrap();
        let before = mad.clone();
        mad.add_prediction(5.0, 0.0, 0.0).unwrap();
        assert_eq!(mad, before);
        assert_eq!(mad.current_error(), 1.0);
        assert_eq!(mad.weight_seen(), 1.0);

        let mut rmse = RootMeanSquaredError::new(0.5).unwrap();
        rmse.add_prediction(0.0, 0.0, 0.0).unwrap();
        assert_eq!(rmse.current_error(), f64::MAX);
    }

    #[test]
    fn test_rejects_malformed_input() {
        let mut mad = MeanAbsoluteDeviation::new(0.9).unwrap();
        mad.add_prediction(1.0, 2.0, 1.0).unwrap();
        let before = mad.clone();
        assert!(mad.add_prediction(f64::NAN, 2.0, 1.0).is_err());
        assert!(mad.add_prediction(1.0, f64::NAN, 1.0).is_err());
        assert!(mad.add_prediction(1.0, 2.0, -1.0).is_err());
        assert!(mad.add_prediction(1.0, 2.0, f64::NAN).is_err());
        assert_eq!(mad, before);
    }

    #[test]
    fn test_invalid_fading_factor() {
        assert!(MeanAbsoluteDeviation::new(1.5).is_err());
        assert!(RootMeanSquaredError::new(-0.1).is_err());
        assert!(ErrorMeasure::RootMeanSquaredError.accumulator(f64::NAN).is_err());
    }

    #[test]
    fn test_reset() {
        let mut rmse = ErrorMeasure::RootMeanSquaredError.accumulator(0.99).unwrap();
        rmse.add_prediction(1.0, 3.0, 1.0).unwrap();
        assert_eq!(rmse.current_error(), 2.0);
        rmse.reset();
        assert_eq!(rmse.current_error(), f64::MAX);
        assert_eq!(rmse.weight_seen(), 0.0);
        assert_eq!(rmse.fading_error_factor(), 0.99);
    }

    #[test]
    fn test_error_measure_from_str() {
        assert_eq!(
            "RootMeanSquaredError".parse::<ErrorMeasure>().unwrap(),
            ErrorMeasure::RootMeanSquaredError
        );
        assert!("MedianError".parse::<ErrorMeasure>().is_err());
    }
}
