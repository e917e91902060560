use super::cut_points::{CutPoints, PooledBin};
use super::{CutClassProbabilities, NumericAttributeObserver};
use crate::config::ObserverConfig;
use crate::constants::{DEFAULT_INTERVAL_CONFIDENCE, DEFAULT_MAX_BINS};
use crate::errors::StreamError;
use crate::utils::{hoeffding_bound, validate_float_parameter, validate_positive_usize_parameter, validate_weight};
use log::debug;

/// A weighted centroid summarising nearby values of one class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassBin {
    pub value: f64,
    pub weight: f64,
}

/// Per class streaming histogram of a numeric input.
///
/// Every class keeps at most `max_bins` bins sorted by value. A new value
/// opens its own bin while there is room, and is otherwise merged into the
/// nearest bin, which moves to the weighted centroid of both. Class weights
/// on either side of a cut are therefore bin approximations: every bin is
/// attributed wholly to the side its centroid falls on, so the error per
/// class is bounded by the weight of the bins adjacent to the cut.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedNumericObserver {
    max_bins: usize,
    interval_confidence: f64,
    class_bins: Vec<Vec<ClassBin>>,
    class_weights: Vec<f64>,
}

impl Default for BinnedNumericObserver {
    fn default() -> Self {
        BinnedNumericObserver {
            max_bins: DEFAULT_MAX_BINS,
            interval_confidence: DEFAULT_INTERVAL_CONFIDENCE,
            class_bins: Vec::new(),
            class_weights: Vec::new(),
        }
    }
}

impl BinnedNumericObserver {
    /// * `max_bins` - Maximum number of bins kept for every class.
    /// * `interval_confidence` - Hoeffding `δ` used for interval estimates.
    pub fn new(max_bins: usize, interval_confidence: f64) -> Result<Self, StreamError> {
        validate_positive_usize_parameter(max_bins, "max_bins")?;
        validate_float_parameter(interval_confidence, f64::MIN_POSITIVE, 1.0, "interval_confidence")?;
        Ok(BinnedNumericObserver {
            max_bins,
            interval_confidence,
            class_bins: Vec::new(),
            class_weights: Vec::new(),
        })
    }

    pub fn from_config(config: &ObserverConfig) -> Result<Self, StreamError> {
        BinnedNumericObserver::new(config.max_bins, config.interval_confidence)
    }

    /// Bins of one class, sorted by value.
    pub fn bins(&self, class_label: usize) -> &[ClassBin] {
        self.class_bins.get(class_label).map_or(&[], |b| b.as_slice())
    }

    fn ensure_class(&mut self, class_label: usize) {
        if self.class_bins.len() <= class_label {
            self.class_bins.resize_with(class_label + 1, Vec::new);
            self.class_weights.resize(class_label + 1, 0.0);
        }
    }

    /// Pool the bins of every class into distinct values, sorted ascending.
    fn pooled_bins(&self) -> Vec<PooledBin> {
        let n_classes = self.class_bins.len();
        let mut entries: Vec<(f64, usize, f64)> = self
            .class_bins
            .iter()
            .enumerate()
            .flat_map(|(c, bins)| bins.iter().map(move |b| (b.value, c, b.weight)))
            .collect();
        entries.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut pooled = Vec::new();
        let mut i = 0;
        while i < entries.len() {
            let value = entries[i].0;
            let mut weights = vec![0.0; n_classes];
            while i < entries.len() && entries[i].0 == value {
                weights[entries[i].1] += entries[i].2;
                i += 1;
            }
            let mut dominant_class = 0;
            for (c, w) in weights.iter().enumerate() {
                if *w > weights[dominant_class] {
                    dominant_class = c;
                }
            }
            pooled.push(PooledBin {
                value,
                weight: weights.iter().sum(),
                dominant_class,
            });
        }
        pooled
    }
}

/// Index of the bin closest to `value`, ties go to the lower bin.
fn nearest_bin(bins: &[ClassBin], value: f64) -> Option<usize> {
    let i = bins.partition_point(|b| b.value < value);
    match (i.checked_sub(1), bins.get(i)) {
        (Some(lo), Some(hi)) => {
            if value - bins[lo].value <= hi.value - value {
                Some(lo)
            } else {
                Some(i)
            }
        }
        (Some(lo), None) => Some(lo),
        (None, Some(_)) => Some(i),
        (None, None) => None,
    }
}

/// Merge `weight` at `value` into `bin`, moving it to the weighted centroid.
#[inline]
fn merge_into(bin: &mut ClassBin, value: f64, weight: f64) {
    let total = bin.weight + weight;
    bin.value += (value - bin.value) * (weight / total);
    bin.weight = total;
}

impl NumericAttributeObserver for BinnedNumericObserver {
    fn add_value(&mut self, value: f64, class_label: usize, weight: f64) -> Result<(), StreamError> {
        if !value.is_finite() {
            return Err(StreamError::InvalidValue("value".to_string(), value));
        }
        validate_weight(weight)?;
        if weight == 0.0 {
            return Ok(());
        }
        self.ensure_class(class_label);
        let max_bins = self.max_bins;
        let bins = &mut self.class_bins[class_label];
        match bins.binary_search_by(|b| b.value.total_cmp(&value)) {
            Ok(i) => bins[i].weight += weight,
            Err(i) if bins.len() < max_bins => bins.insert(i, ClassBin { value, weight }),
            Err(_) => {
                if let Some(i) = nearest_bin(bins, value) {
                    merge_into(&mut bins[i], value, weight);
                }
            }
        }
        self.class_weights[class_label] += weight;
        Ok(())
    }

    fn cut_point_suggestion(&self, count: usize) -> CutPoints {
        CutPoints::new(self.pooled_bins(), count)
    }

    fn compute_class_dist_probabilities(
        &self,
        cuts: &[f64],
        with_interval_estimates: bool,
    ) -> Vec<CutClassProbabilities> {
        self.compute_class_dist(cuts)
            .into_iter()
            .map(|dist| {
                let counts = [dist.left.iter().sum::<f64>(), dist.right.iter().sum::<f64>()];
                let mut lower = [Vec::with_capacity(dist.left.len()), Vec::with_capacity(dist.right.len())];
                let mut upper = [Vec::with_capacity(dist.left.len()), Vec::with_capacity(dist.right.len())];
                for (side, weights) in [&dist.left, &dist.right].into_iter().enumerate() {
                    let n = counts[side];
                    let error = match (with_interval_estimates, n > 0.0) {
                        (true, true) => hoeffding_bound(1.0, self.interval_confidence, n),
                        // Nothing observed on this side, anything is possible.
                        (true, false) => 1.0,
                        (false, _) => 0.0,
                    };
                    for w in weights {
                        let estimate = if n > 0.0 { w / n } else { 0.0 };
                        lower[side].push((estimate - error).max(0.0));
                        upper[side].push((estimate + error).min(1.0));
                    }
                }
                CutClassProbabilities {
                    cut_point: dist.cut_point,
                    counts,
                    lower,
                    upper,
                }
            })
            .collect()
    }

    fn number_of_cut_points(&self) -> usize {
        let mut values: Vec<f64> = self.class_bins.iter().flatten().map(|b| b.value).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();
        values.len().saturating_sub(1)
    }

    fn max_of_values(&self) -> usize {
        self.max_bins
    }

    fn value_count(&self) -> f64 {
        self.class_weights.iter().sum()
    }

    fn class_dist(&self) -> Vec<f64> {
        self.class_weights.clone()
    }

    fn left_class_dist(&self, cut: f64) -> Vec<f64> {
        self.class_bins
            .iter()
            .map(|bins| {
                let end = bins.partition_point(|b| b.value <= cut);
                bins[..end].iter().map(|b| b.weight).sum()
            })
            .collect()
    }

    fn probability_of_value_given_class(&self, value: f64, class_label: usize) -> f64 {
        let total = self.class_weights.get(class_label).copied().unwrap_or(0.0);
        if total <= 0.0 || value.is_nan() {
            return 0.0;
        }
        let bins = self.bins(class_label);
        nearest_bin(bins, value).map_or(0.0, |i| bins[i].weight / total)
    }

    fn reset(&mut self) {
        self.class_bins.clear();
        self.class_weights.clear();
    }

    fn set_max_bins(&mut self, max_bins: usize) -> Result<(), StreamError> {
        validate_positive_usize_parameter(max_bins, "max_bins")?;
        self.max_bins = max_bins;
        let mut merged = 0;
        for bins in self.class_bins.iter_mut() {
            while bins.len() > max_bins {
                let mut closest = 0;
                for i in 1..(bins.len() - 1) {
                    if bins[i + 1].value - bins[i].value < bins[closest + 1].value - bins[closest].value {
                        closest = i;
                    }
                }
                let absorbed = bins.remove(closest + 1);
                merge_into(&mut bins[closest], absorbed.value, absorbed.weight);
                merged += 1;
            }
        }
        if merged > 0 {
            debug!("Merged {} bins to respect max_bins = {}.", merged, max_bins);
        }
        Ok(())
    }

    fn get_copy(&self) -> Box<dyn NumericAttributeObserver> {
        Box::new(self.clone())
    }
}
