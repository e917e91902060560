//! Split Criteria
//!
//! Merit functions used to score a candidate cut from the class distributions
//! on either side of it.

pub trait SplitCriterion {
    /// Merit of partitioning `pre_split_dist` into `post_split_dists`. Higher is better.
    fn merit_of_split(&self, pre_split_dist: &[f64], post_split_dists: &[Vec<f64>]) -> f64;
    /// Range of possible merit values, used as `R` in the Hoeffding bound.
    fn range_of_merit(&self, pre_split_dist: &[f64]) -> f64;
}

/// Information gain, measured in bits.
#[derive(Debug, Clone, Copy)]
pub struct InfoGainSplitCriterion {
    /// Minimum fraction of the weight a branch needs to count as populated.
    pub min_branch_frac: f64,
}

impl Default for InfoGainSplitCriterion {
    fn default() -> Self {
        InfoGainSplitCriterion { min_branch_frac: 0.01 }
    }
}

impl SplitCriterion for InfoGainSplitCriterion {
    fn merit_of_split(&self, pre_split_dist: &[f64], post_split_dists: &[Vec<f64>]) -> f64 {
        if num_subsets_greater_than_frac(post_split_dists, self.min_branch_frac) < 2 {
            return f64::NEG_INFINITY;
        }
        entropy(pre_split_dist) - weighted_entropy(post_split_dists)
    }

    fn range_of_merit(&self, pre_split_dist: &[f64]) -> f64 {
        let num_classes = pre_split_dist.len().max(2);
        (num_classes as f64).log2()
    }
}

/// One minus the weighted Gini impurity of the branches.
#[derive(Debug, Clone, Copy, Default)]
pub struct GiniSplitCriterion {}

impl SplitCriterion for GiniSplitCriterion {
    fn merit_of_split(&self, _pre_split_dist: &[f64], post_split_dists: &[Vec<f64>]) -> f64 {
        let total: f64 = post_split_dists.iter().map(|d| d.iter().sum::<f64>()).sum();
        if total <= 0.0 {
            return 0.0;
        }
        let weighted_gini: f64 = post_split_dists
            .iter()
            .map(|d| (d.iter().sum::<f64>() / total) * gini(d))
            .sum();
        1.0 - weighted_gini
    }

    fn range_of_merit(&self, _pre_split_dist: &[f64]) -> f64 {
        1.0
    }
}

pub fn entropy(dist: &[f64]) -> f64 {
    let total: f64 = dist.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    -dist
        .iter()
        .filter(|w| **w > 0.0)
        .map(|w| {
            let p = w / total;
            p * p.log2()
        })
        .sum::<f64>()
}

pub fn gini(dist: &[f64]) -> f64 {
    let total: f64 = dist.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - dist.iter().map(|w| (w / total).powi(2)).sum::<f64>()
}

fn weighted_entropy(dists: &[Vec<f64>]) -> f64 {
    let total: f64 = dists.iter().map(|d| d.iter().sum::<f64>()).sum();
    if total <= 0.0 {
        return 0.0;
    }
    dists
        .iter()
        .map(|d| (d.iter().sum::<f64>() / total) * entropy(d))
        .sum()
}

fn num_subsets_greater_than_frac(dists: &[Vec<f64>], min_frac: f64) -> usize {
    let sums: Vec<f64> = dists.iter().map(|d| d.iter().sum::<f64>()).collect();
    let total: f64 = sums.iter().sum();
    if total <= 0.0 {
        return 0;
    }
    sums.iter().filter(|s| *s / total > min_frac).count()
}
