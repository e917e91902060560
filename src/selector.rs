//! Input Selectors
//!
//! Decide which of the scored split suggestions are worth expanding next.
//! Every selector expects the suggestions sorted ascending by merit, with the
//! best candidate last.
use crate::config::SelectorConfig;
use crate::constants::DEFAULT_PERCENTAGE_THRESHOLD;
use crate::errors::StreamError;
use crate::utils::validate_float_parameter;
use log::warn;
use serde::{Deserialize, Serialize};

/// Binary test on a numeric input, `value <= cut_point` goes left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericPredicate {
    pub attribute_index: usize,
    pub cut_point: f64,
}

impl NumericPredicate {
    pub fn new(attribute_index: usize, cut_point: f64) -> Self {
        NumericPredicate {
            attribute_index,
            cut_point,
        }
    }

    /// Branch taken by `value`, `None` when the value is missing.
    pub fn branch(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            None
        } else if value <= self.cut_point {
            Some(0)
        } else {
            Some(1)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSuggestion {
    pub attribute_index: usize,
    pub predicate: NumericPredicate,
    pub merit: f64,
}

impl SplitSuggestion {
    pub fn new(predicate: NumericPredicate, merit: f64) -> Self {
        SplitSuggestion {
            attribute_index: predicate.attribute_index,
            predicate,
            merit,
        }
    }
}

/// Check that the suggestions are sorted ascending by merit.
///
/// Returns the index of the first suggestion whose merit is lower than its
/// predecessor's. NaN merits count as violations.
pub fn check_ordering(sorted_split_suggestions: &[SplitSuggestion]) -> Result<(), StreamError> {
    for (i, w) in sorted_split_suggestions.windows(2).enumerate() {
        if !(w[0].merit <= w[1].merit) {
            return Err(StreamError::UnsortedSuggestions(i + 1));
        }
    }
    Ok(())
}

fn warn_on_unsorted(sorted_split_suggestions: &[SplitSuggestion]) {
    if let Err(e) = check_ordering(sorted_split_suggestions) {
        warn!("{} The last suggestion is still treated as the best one.", e);
    }
}

pub trait InputSelector {
    /// Attribute indices to expand next, empty when there are no suggestions.
    fn next_input_indices(&self, sorted_split_suggestions: &[SplitSuggestion]) -> Vec<usize>;
}

/// Keep every input.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectAllInputs {}

impl InputSelector for SelectAllInputs {
    fn next_input_indices(&self, sorted_split_suggestions: &[SplitSuggestion]) -> Vec<usize> {
        warn_on_unsorted(sorted_split_suggestions);
        sorted_split_suggestions.iter().map(|s| s.attribute_index).collect()
    }
}

/// Keep the inputs whose merit is at least a percentage of the best merit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeritThreshold {
    percentage_threshold: f64,
}

impl MeritThreshold {
    pub fn new(percentage_threshold: f64) -> Result<Self, StreamError> {
        validate_float_parameter(percentage_threshold, 0.0, 1.0, "percentage_threshold")?;
        Ok(MeritThreshold { percentage_threshold })
    }

    pub fn from_config(config: &SelectorConfig) -> Result<Self, StreamError> {
        MeritThreshold::new(config.percentage_threshold)
    }

    pub fn percentage_threshold(&self) -> f64 {
        self.percentage_threshold
    }
}

impl Default for MeritThreshold {
    fn default() -> Self {
        MeritThreshold {
            percentage_threshold: DEFAULT_PERCENTAGE_THRESHOLD,
        }
    }
}

impl InputSelector for MeritThreshold {
    fn next_input_indices(&self, sorted_split_suggestions: &[SplitSuggestion]) -> Vec<usize> {
        let n = sorted_split_suggestions.len();
        let best = match sorted_split_suggestions.last() {
            Some(best) => best,
            None => return Vec::new(),
        };
        warn_on_unsorted(sorted_split_suggestions);
        // An infinite best merit is its own threshold, so candidates tied with
        // it are kept. A NaN best merit keeps nothing beyond the forced second.
        let threshold = if best.merit.is_infinite() {
            best.merit
        } else {
            best.merit * self.percentage_threshold
        };

        let mut selected = vec![best.attribute_index];
        selected.extend(
            sorted_split_suggestions[..n - 1]
                .iter()
                .rev()
                .filter(|s| s.merit >= threshold)
                .map(|s| s.attribute_index),
        );

        // A comparative stopping rule needs at least two candidates.
        if selected.len() == 1 && n > 1 {
            selected.push(sorted_split_suggestions[n - 2].attribute_index);
        }
        selected
    }
}
