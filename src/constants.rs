pub const DEFAULT_FADING_ERROR_FACTOR: f64 = 0.99;
pub const DEFAULT_PERCENTAGE_THRESHOLD: f64 = 0.1;
pub const DEFAULT_MAX_BINS: usize = 100;
pub const DEFAULT_BUFFER_CAPACITY: usize = 32;
pub const DEFAULT_SWITCH_THRESHOLD: f64 = 100.0;
pub const DEFAULT_INTERVAL_CONFIDENCE: f64 = 0.05;
/// Stand-in for a zero confidence when computing a Hoeffding bound.
pub const MIN_CONFIDENCE: f64 = 1e-7;
