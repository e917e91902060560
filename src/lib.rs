// Modules
pub mod accumulator;
pub mod budget;
pub mod config;
pub mod constants;
pub mod criterion;
pub mod data;
pub mod errors;
pub mod interval;
pub mod observer;
pub mod selector;
pub mod supervisor;
pub mod utils;
pub mod volatility;

// Individual classes, and functions
pub use accumulator::{ErrorAccumulator, ErrorMeasure, MeanAbsoluteDeviation, RootMeanSquaredError};
pub use budget::{Deadline, Operation, OperationCounts, TimeBudget, Unbounded};
pub use config::{ConfigIO, StreamConfig};
pub use data::StreamRecord;
pub use errors::StreamError;
pub use interval::IntervalBuffer;
pub use observer::{BinnedNumericObserver, CutPoints, NumericAttributeObserver};
pub use selector::{InputSelector, MeritThreshold, SelectAllInputs, SplitSuggestion};
pub use supervisor::{AdaptiveSupervisor, Model};
pub use volatility::{ChangeDetector, ClassifierSelector, ModelId, VolatilityDetector};
