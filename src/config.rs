//! Configuration
//!
//! Immutable configuration values handed to the components at construction.
//! Every value is validated up front, nothing is clamped.
use crate::accumulator::{ErrorAccumulator, ErrorMeasure};
use crate::constants::{
    DEFAULT_BUFFER_CAPACITY, DEFAULT_FADING_ERROR_FACTOR, DEFAULT_INTERVAL_CONFIDENCE, DEFAULT_MAX_BINS,
    DEFAULT_PERCENTAGE_THRESHOLD, DEFAULT_SWITCH_THRESHOLD,
};
use crate::errors::StreamError;
use crate::utils::{validate_float_parameter, validate_positive_usize_parameter};
use crate::volatility::ClassifierSelector;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

fn default_max_bins() -> usize {
    DEFAULT_MAX_BINS
}
fn default_interval_confidence() -> f64 {
    DEFAULT_INTERVAL_CONFIDENCE
}
fn default_fading_error_factor() -> f64 {
    DEFAULT_FADING_ERROR_FACTOR
}
fn default_percentage_threshold() -> f64 {
    DEFAULT_PERCENTAGE_THRESHOLD
}
fn default_buffer_capacity() -> usize {
    DEFAULT_BUFFER_CAPACITY
}
fn default_classifier_selector() -> ClassifierSelector {
    ClassifierSelector::NaiveThreshold {
        threshold: DEFAULT_SWITCH_THRESHOLD,
    }
}

/// Configuration of a numeric attribute observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Maximum number of bins kept per class.
    #[serde(default = "default_max_bins")]
    pub max_bins: usize,
    /// Hoeffding `δ` used for the interval estimates of class probabilities.
    #[serde(default = "default_interval_confidence")]
    pub interval_confidence: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        ObserverConfig {
            max_bins: DEFAULT_MAX_BINS,
            interval_confidence: DEFAULT_INTERVAL_CONFIDENCE,
        }
    }
}

impl ObserverConfig {
    pub fn validate(&self) -> Result<(), StreamError> {
        validate_positive_usize_parameter(self.max_bins, "max_bins")?;
        validate_float_parameter(self.interval_confidence, f64::MIN_POSITIVE, 1.0, "interval_confidence")
    }
}

/// Configuration of a fading error accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccumulatorConfig {
    #[serde(default)]
    pub error_measure: ErrorMeasure,
    /// Decay applied to the history at every prediction, within `[0, 1]`.
    #[serde(default = "default_fading_error_factor")]
    pub fading_error_factor: f64,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        AccumulatorConfig {
            error_measure: ErrorMeasure::MeanAbsoluteDeviation,
            fading_error_factor: DEFAULT_FADING_ERROR_FACTOR,
        }
    }
}

impl AccumulatorConfig {
    pub fn validate(&self) -> Result<(), StreamError> {
        validate_float_parameter(self.fading_error_factor, 0.0, 1.0, "fading_error_factor")
    }

    pub fn build(&self) -> Result<Box<dyn ErrorAccumulator>, StreamError> {
        self.error_measure.accumulator(self.fading_error_factor)
    }
}

/// Configuration of the merit threshold input selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Fraction of the best merit a candidate needs to be kept, within `[0, 1]`.
    #[serde(default = "default_percentage_threshold")]
    pub percentage_threshold: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            percentage_threshold: DEFAULT_PERCENTAGE_THRESHOLD,
        }
    }
}

impl SelectorConfig {
    pub fn validate(&self) -> Result<(), StreamError> {
        validate_float_parameter(self.percentage_threshold, 0.0, 1.0, "percentage_threshold")
    }
}

/// Configuration of the adaptive supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Number of change intervals kept to compute the volatility.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    /// Policy mapping the mean interval to a model.
    #[serde(default = "default_classifier_selector")]
    pub classifier_selector: ClassifierSelector,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        SupervisorConfig {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            classifier_selector: default_classifier_selector(),
        }
    }
}

impl SupervisorConfig {
    pub fn validate(&self) -> Result<(), StreamError> {
        validate_positive_usize_parameter(self.buffer_capacity, "buffer_capacity")?;
        self.classifier_selector.validate()
    }
}

/// All recognised options in one place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamConfig {
    #[serde(default)]
    pub observer: ObserverConfig,
    #[serde(default)]
    pub accumulator: AccumulatorConfig,
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(default)]
    pub supervisor: SupervisorConfig,
}

impl StreamConfig {
    pub fn validate(&self) -> Result<(), StreamError> {
        self.observer.validate()?;
        self.accumulator.validate()?;
        self.selector.validate()?;
        self.supervisor.validate()
    }
}

/// IO
pub trait ConfigIO: Serialize + DeserializeOwned + Sized {
    /// Dump a configuration as a json object.
    fn json_dump(&self) -> Result<String, StreamError> {
        serde_json::to_string(self).map_err(|e| StreamError::UnableToWrite(e.to_string()))
    }

    /// Load a configuration from a json string.
    ///
    /// * `json_str` - String object, which can be deserialized from json.
    fn from_json(json_str: &str) -> Result<Self, StreamError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| StreamError::UnableToRead(e.to_string()))
    }
}

impl ConfigIO for StreamConfig {}
impl ConfigIO for ObserverConfig {}
impl ConfigIO for AccumulatorConfig {}
impl ConfigIO for SelectorConfig {}
impl ConfigIO for SupervisorConfig {}
