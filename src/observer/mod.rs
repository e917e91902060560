//! Numeric Attribute Observers
//!
//! Single pass, bounded memory statistics kept for one numeric input at one
//! node. They propose cut points and estimate the class distribution on
//! either side of a cut without retaining any raw sample.
mod binned;
mod cut_points;

pub use binned::{BinnedNumericObserver, ClassBin};
pub use cut_points::CutPoints;

use crate::budget::{Operation, TimeBudget};
use crate::criterion::SplitCriterion;
use crate::errors::StreamError;
use crate::selector::{NumericPredicate, SplitSuggestion};

/// Class weights on each side of one cut.
#[derive(Debug, Clone, PartialEq)]
pub struct CutClassDistribution {
    pub cut_point: f64,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

/// Per class probability bounds on each side of one cut.
#[derive(Debug, Clone, PartialEq)]
pub struct CutClassProbabilities {
    pub cut_point: f64,
    /// Total weight on the left and right side.
    pub counts: [f64; 2],
    /// Lower bounds, `[left, right]`, one entry per class.
    pub lower: [Vec<f64>; 2],
    /// Upper bounds, `[left, right]`, one entry per class.
    pub upper: [Vec<f64>; 2],
}

fn validate_cuts(cuts: &[f64]) -> Result<(), StreamError> {
    if cuts.iter().any(|c| c.is_nan()) || cuts.windows(2).any(|w| w[0] >= w[1]) {
        return Err(StreamError::InvalidParameter(
            "cuts".to_string(),
            "strictly ascending values".to_string(),
            format!("{:?}", cuts),
        ));
    }
    Ok(())
}

/// `weights[c] / total[c]`, or uniform votes when the interval is empty.
fn conditional_probabilities(weights: &[f64], total: &[f64]) -> Vec<f64> {
    if weights.iter().all(|w| *w <= 0.0) {
        let n = weights.len();
        return vec![1.0 / n as f64; n];
    }
    weights
        .iter()
        .zip(total.iter())
        .map(|(w, t)| if *t > 0.0 { w / t } else { 0.0 })
        .collect()
}

pub trait NumericAttributeObserver {
    /// Record a value of the input for a class. NaN or infinite values and
    /// NaN or negative weights are rejected and leave the state untouched.
    fn add_value(&mut self, value: f64, class_label: usize, weight: f64) -> Result<(), StreamError>;

    /// Lazily propose up to `count` ascending cut points.
    fn cut_point_suggestion(&self, count: usize) -> CutPoints;

    /// Same as [`cut_point_suggestion`](Self::cut_point_suggestion) but stops as soon
    /// as the budget runs out. The result is always an ascending prefix of the full
    /// suggestion.
    fn cut_point_suggestion_within(&self, count: usize, budget: &mut dyn TimeBudget) -> Vec<f64> {
        let mut cuts = Vec::new();
        let mut suggestions = self.cut_point_suggestion(count);
        while budget.has_more_time() {
            match suggestions.next() {
                Some(cut) => {
                    budget.record_operations(Operation::RealAddition, 1);
                    budget.record_operations(Operation::Division, 1);
                    cuts.push(cut);
                }
                None => break,
            }
        }
        cuts
    }

    /// Class weights on the left (`value <= cut`) and right side of every cut.
    fn compute_class_dist(&self, cuts: &[f64]) -> Vec<CutClassDistribution> {
        let total = self.class_dist();
        cuts.iter()
            .map(|cut| {
                let left = self.left_class_dist(*cut);
                let right = total.iter().zip(left.iter()).map(|(t, l)| (t - l).max(0.0)).collect();
                CutClassDistribution {
                    cut_point: *cut,
                    left,
                    right,
                }
            })
            .collect()
    }

    /// The `index`th of the first `count` suggested cut points.
    fn cut(&self, count: usize, index: usize) -> Option<f64> {
        self.cut_point_suggestion(count).nth(index)
    }

    /// Class conditional probabilities `P(interval | class)` for every interval
    /// delimited by the ascending `cuts`: `value <= cuts[0]`, then
    /// `cuts[k - 1] < value <= cuts[k]`, then `value > cuts[last]`. An interval
    /// holding no weight at all gets a uniform distribution over the classes.
    fn compute_conditional_prob_per_bin(&self, cuts: &[f64]) -> Result<Vec<Vec<f64>>, StreamError> {
        validate_cuts(cuts)?;
        let total = self.class_dist();
        let mut previous = vec![0.0; total.len()];
        let mut per_interval = Vec::with_capacity(cuts.len() + 1);
        for cut in cuts.iter().map(Some).chain(std::iter::once(None)) {
            let left = match cut {
                Some(c) => self.left_class_dist(*c),
                None => total.clone(),
            };
            let weights: Vec<f64> = left.iter().zip(previous.iter()).map(|(l, p)| (l - p).max(0.0)).collect();
            per_interval.push(conditional_probabilities(&weights, &total));
            previous = left;
        }
        Ok(per_interval)
    }

    /// Class conditional probabilities of the interval `value` falls in, see
    /// [`compute_conditional_prob_per_bin`](Self::compute_conditional_prob_per_bin).
    fn compute_conditional_prob(&self, cuts: &[f64], value: f64) -> Result<Vec<f64>, StreamError> {
        if value.is_nan() {
            return Err(StreamError::InvalidValue("value".to_string(), value));
        }
        validate_cuts(cuts)?;
        let total = self.class_dist();
        let interval = cuts.partition_point(|c| *c < value);
        let upper = match cuts.get(interval) {
            Some(c) => self.left_class_dist(*c),
            None => total.clone(),
        };
        let weights: Vec<f64> = match interval.checked_sub(1) {
            Some(i) => {
                let lower = self.left_class_dist(cuts[i]);
                upper.iter().zip(lower.iter()).map(|(u, l)| (u - l).max(0.0)).collect()
            }
            None => upper,
        };
        Ok(conditional_probabilities(&weights, &total))
    }

    /// Class probabilities on each side of every cut, optionally widened into
    /// Hoeffding intervals computed from the side's total weight.
    fn compute_class_dist_probabilities(&self, cuts: &[f64], with_interval_estimates: bool)
        -> Vec<CutClassProbabilities>;

    /// Number of distinct cut positions the current bins can separate.
    fn number_of_cut_points(&self) -> usize;
    /// Maximum number of bins kept per class.
    fn max_of_values(&self) -> usize;
    /// Total weight recorded since the last reset.
    fn value_count(&self) -> f64;
    fn class_dist(&self) -> Vec<f64>;
    fn left_class_dist(&self, cut: f64) -> Vec<f64>;
    fn probability_of_value_given_class(&self, value: f64, class_label: usize) -> f64;

    fn reset(&mut self);
    /// Change the bin capacity, re-merging bins when it shrinks.
    fn set_max_bins(&mut self, max_bins: usize) -> Result<(), StreamError>;
    /// Deep, independent copy for speculative evaluation.
    fn get_copy(&self) -> Box<dyn NumericAttributeObserver>;

    /// Score every proposed cut with `criterion` and keep the best one.
    fn best_split_suggestion(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split_dist: &[f64],
        attribute_index: usize,
    ) -> Option<SplitSuggestion> {
        let cuts: Vec<f64> = self.cut_point_suggestion(self.number_of_cut_points()).collect();
        let mut best: Option<SplitSuggestion> = None;
        for dist in self.compute_class_dist(&cuts) {
            let post_split_dists = vec![dist.left, dist.right];
            let merit = criterion.merit_of_split(pre_split_dist, &post_split_dists);
            if best.as_ref().map_or(true, |b| merit > b.merit) {
                best = Some(SplitSuggestion::new(
                    NumericPredicate::new(attribute_index, dist.cut_point),
                    merit,
                ));
            }
        }
        best
    }
}
