//! Adaptive Supervisor
//!
//! Routes every training record to one of two models. The active model is
//! chosen from the volatility of the stream, measured as the mean number of
//! records between the changes a detector flags on the active model's errors.
use crate::config::SupervisorConfig;
use crate::data::StreamRecord;
use crate::errors::StreamError;
use crate::volatility::{ChangeDetector, ClassifierSelector, ModelId, VolatilityDetector};
use log::{debug, info};

/// A learner the supervisor can delegate to.
pub trait Model {
    fn train(&mut self, record: &StreamRecord);
    /// Class votes for the record.
    fn predict(&self, record: &StreamRecord) -> Vec<f64>;
    fn correctly_classifies(&self, record: &StreamRecord) -> bool;
    fn reset(&mut self);
}

/// Two models behind one learner interface, switched on volatility.
#[derive(Debug, Clone)]
pub struct AdaptiveSupervisor<A: Model, B: Model, D: ChangeDetector> {
    first: A,
    second: B,
    volatility: VolatilityDetector<D>,
    classifier_selector: ClassifierSelector,
    active: ModelId,
    switch_count: usize,
    records_seen: u64,
}

impl<A: Model, B: Model, D: ChangeDetector> AdaptiveSupervisor<A, B, D> {
    /// Create a supervisor, the first model starts active.
    ///
    /// * `first` - Model preferred while the stream is volatile.
    /// * `second` - Model preferred while the stream is stable.
    /// * `detector` - Change detector fed with the active model's errors.
    /// * `config` - Buffer capacity and classifier selection policy.
    pub fn new(first: A, second: B, detector: D, config: &SupervisorConfig) -> Result<Self, StreamError> {
        config.validate()?;
        Ok(AdaptiveSupervisor {
            first,
            second,
            volatility: VolatilityDetector::new(detector, config.buffer_capacity)?,
            classifier_selector: config.classifier_selector,
            active: ModelId::First,
            switch_count: 0,
            records_seen: 0,
        })
    }

    fn active_correctly_classifies(&self, record: &StreamRecord) -> bool {
        match self.active {
            ModelId::First => self.first.correctly_classifies(record),
            ModelId::Second => self.second.correctly_classifies(record),
        }
    }

    /// Process one training record and return the model it was routed to.
    pub fn train(&mut self, record: &StreamRecord) -> Result<ModelId, StreamError> {
        let signal = if self.active_correctly_classifies(record) { 0.0 } else { 1.0 };
        let changed = self.volatility.set_input_var(signal)?;
        self.records_seen += 1;

        if changed {
            let avg = self.volatility.last_mean();
            if avg <= 0.0 {
                debug!(
                    "Change at record {}, not enough change points to decide, keeping model {}.",
                    self.records_seen, self.active
                );
            } else {
                let decision = self.classifier_selector.make_decision(avg);
                if decision != self.active {
                    info!(
                        "Switching from model {} to model {} at record {}, mean interval {:.3}.",
                        self.active, decision, self.records_seen, avg
                    );
                    self.active = decision;
                    self.switch_count += 1;
                }
            }
        }

        match self.active {
            ModelId::First => self.first.train(record),
            ModelId::Second => self.second.train(record),
        }
        Ok(self.active)
    }

    pub fn predict(&self, record: &StreamRecord) -> Vec<f64> {
        match self.active {
            ModelId::First => self.first.predict(record),
            ModelId::Second => self.second.predict(record),
        }
    }

    pub fn active_model(&self) -> ModelId {
        self.active
    }

    pub fn switch_count(&self) -> usize {
        self.switch_count
    }

    pub fn records_seen(&self) -> u64 {
        self.records_seen
    }

    pub fn volatility(&self) -> &VolatilityDetector<D> {
        &self.volatility
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }

    /// Reset both models and the volatility state, the first model becomes active.
    pub fn reset_learning(&mut self) {
        self.first.reset();
        self.second.reset();
        self.volatility.reset();
        self.active = ModelId::First;
        self.switch_count = 0;
        self.records_seen = 0;
    }
}
