use crate::errors::StreamError;
use crate::utils::validate_weight;

/// A single labelled record flowing through the stream.
///
/// Input values are stored as `f64`. Categorical inputs are encoded as
/// their category index, and a `NaN` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRecord {
    values: Vec<f64>,
    class_label: usize,
    weight: f64,
}

impl StreamRecord {
    /// Create a record with the default weight of 1.0.
    pub fn new(values: Vec<f64>, class_label: usize) -> Self {
        StreamRecord {
            values,
            class_label,
            weight: 1.0,
        }
    }

    /// Create a weighted record. Negative or NaN weights are rejected.
    pub fn with_weight(values: Vec<f64>, class_label: usize, weight: f64) -> Result<Self, StreamError> {
        validate_weight(weight)?;
        Ok(StreamRecord {
            values,
            class_label,
            weight,
        })
    }

    /// Value of the `i`th input, `None` when it is missing or out of range.
    pub fn value(&self, i: usize) -> Option<f64> {
        match self.values.get(i) {
            Some(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self, i: usize) -> bool {
        self.value(i).is_none()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn n_attributes(&self) -> usize {
        self.values.len()
    }

    pub fn class_label(&self) -> usize {
        self.class_label
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}
