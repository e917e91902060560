use crate::constants::MIN_CONFIDENCE;
use crate::errors::StreamError;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    let mut s = String::new();
    for i in items {
        s.push_str(i);
        s.push_str(&String::from(", "));
    }
    s
}

// Validation
pub fn validate_positive_float_parameter(value: f64, parameter: &str) -> Result<(), StreamError> {
    if value.is_nan() || value <= 0.0 || value.is_infinite() {
        Err(StreamError::InvalidParameter(
            parameter.to_string(),
            "positive finite real value".to_string(),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), StreamError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(StreamError::InvalidParameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_positive_usize_parameter(value: usize, parameter: &str) -> Result<(), StreamError> {
    if value == 0 {
        Err(StreamError::InvalidParameter(
            parameter.to_string(),
            "positive integer".to_string(),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Reject NaN values and negative weights before they reach an aggregate.
#[inline]
pub fn validate_weight(weight: f64) -> Result<(), StreamError> {
    if weight.is_nan() || weight < 0.0 {
        Err(StreamError::InvalidValue("weight".to_string(), weight))
    } else {
        Ok(())
    }
}

#[inline]
pub fn validate_observation(value: f64, name: &str) -> Result<(), StreamError> {
    if value.is_nan() {
        Err(StreamError::InvalidValue(name.to_string(), value))
    } else {
        Ok(())
    }
}

/// Hoeffding bound `sqrt(R² ln(1/δ) / 2n)`.
///
/// * `range` - Range of the observed random variable.
/// * `confidence` - Probability `δ` that the true mean is further than the bound.
/// * `n` - Weight of the sample the mean was computed from.
#[inline]
pub fn hoeffding_bound(range: f64, confidence: f64, n: f64) -> f64 {
    let confidence = if confidence <= 0.0 { MIN_CONFIDENCE } else { confidence };
    ((range * range * (1.0 / confidence).ln()) / (2.0 * n)).sqrt()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn precision_round(n: f64, precision: i32) -> f64 {
        let p = (10.0_f64).powi(precision);
        (n * p).round() / p
    }

    #[test]
    fn test_round() {
        assert_eq!(0.3, precision_round(0.3333, 1));
        assert_eq!(0.2343, precision_round(0.2343123123123, 4));
    }

    #[test]
    fn test_validate_float_parameter() {
        assert!(validate_float_parameter(0.5, 0.0, 1.0, "fading_error_factor").is_ok());
        assert!(validate_float_parameter(0.0, 0.0, 1.0, "fading_error_factor").is_ok());
        assert!(validate_float_parameter(1.0, 0.0, 1.0, "fading_error_factor").is_ok());
        assert!(validate_float_parameter(1.01, 0.0, 1.0, "fading_error_factor").is_err());
        assert!(validate_float_parameter(f64::NAN, 0.0, 1.0, "fading_error_factor").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive_float_parameter(100.0, "switch_threshold").is_ok());
        assert!(validate_positive_float_parameter(0.0, "switch_threshold").is_err());
        assert!(validate_positive_float_parameter(f64::INFINITY, "switch_threshold").is_err());
        assert!(validate_positive_usize_parameter(0, "max_bins").is_err());
        assert!(validate_positive_usize_parameter(1, "max_bins").is_ok());
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(0.0).is_ok());
        assert!(validate_weight(2.5).is_ok());
        assert_eq!(
            validate_weight(-1.0),
            Err(StreamError::InvalidValue("weight".to_string(), -1.0))
        );
        assert!(validate_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_hoeffding_bound() {
        // sqrt(ln(1/0.05) / 200) for a unit range.
        let expected = ((1.0_f64 / 0.05).ln() / 200.0).sqrt();
        assert_eq!(precision_round(hoeffding_bound(1.0, 0.05, 100.0), 10), precision_round(expected, 10));
        // The bound shrinks with more data.
        assert!(hoeffding_bound(1.0, 0.05, 1000.0) < hoeffding_bound(1.0, 0.05, 100.0));
        // Zero confidence falls back to a tiny positive value instead of dividing by zero.
        assert!(hoeffding_bound(1.0, 0.0, 10.0).is_finite());
    }
}
