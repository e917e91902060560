//! Errors
//!
//! Custom error types used throughout the `streamvol` crate.
use thiserror::Error;

/// Errors that can occur while updating or configuring the streaming components.
#[derive(Debug, Error, PartialEq)]
pub enum StreamError {
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// An observation was rejected, the state was left untouched.
    #[error("Invalid {0} value {1} rejected.")]
    InvalidValue(String, f64),
    /// Event positions must never move backwards.
    #[error("Event position {provided} is before the last recorded position {last}.")]
    NonMonotonicPosition { last: u64, provided: u64 },
    /// Split suggestions were not sorted ascending by merit.
    #[error("Split suggestions are not sorted ascending by merit, first violation at index {0}.")]
    UnsortedSuggestions(usize),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
    /// Unable to serialize a configuration.
    #[error("Unable to write configuration: {0}")]
    UnableToWrite(String),
    /// Unable to deserialize a configuration.
    #[error("Unable to read configuration: {0}")]
    UnableToRead(String),
}
