use std::cmp::Ordering;

/// One distinct value of the pooled distribution over all classes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PooledBin {
    pub value: f64,
    pub weight: f64,
    pub dominant_class: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    /// Midpoints where the dominant class changes.
    Boundaries,
    /// Equally spaced weighted quantiles.
    Quantiles { total: f64 },
}

/// Lazy, finite sequence of ascending cut points.
///
/// The sequence works on a snapshot of the pooled bins, so it is independent
/// of later updates to the observer. Clone it before iterating to walk the
/// same suggestions twice.
#[derive(Debug, Clone)]
pub struct CutPoints {
    pooled: Vec<PooledBin>,
    mode: Mode,
    max_cuts: usize,
    emitted: usize,
    step: usize,
    cursor: usize,
    cumulative: f64,
    last_cut: Option<f64>,
}

#[inline]
fn midpoint(a: f64, b: f64) -> f64 {
    a + (b - a) / 2.0
}

impl CutPoints {
    pub(crate) fn new(pooled: Vec<PooledBin>, count: usize) -> Self {
        let max_cuts = count.min(pooled.len().saturating_sub(1));
        let boundaries = pooled
            .windows(2)
            .filter(|w| w[0].dominant_class != w[1].dominant_class)
            .count();
        let mode = if boundaries > 0 && boundaries <= max_cuts {
            Mode::Boundaries
        } else {
            Mode::Quantiles {
                total: pooled.iter().map(|b| b.weight).sum(),
            }
        };
        CutPoints {
            pooled,
            mode,
            max_cuts,
            emitted: 0,
            step: 0,
            cursor: 0,
            cumulative: 0.0,
            last_cut: None,
        }
    }

    /// Whether the suggestions come from class boundaries rather than quantiles.
    pub fn uses_class_boundaries(&self) -> bool {
        self.mode == Mode::Boundaries
    }

    fn next_boundary(&mut self) -> Option<f64> {
        while self.cursor + 1 < self.pooled.len() {
            let (a, b) = (self.pooled[self.cursor], self.pooled[self.cursor + 1]);
            self.cursor += 1;
            if a.dominant_class != b.dominant_class {
                return Some(midpoint(a.value, b.value));
            }
        }
        None
    }

    fn next_quantile(&mut self, total: f64) -> Option<f64> {
        while self.step < self.max_cuts {
            self.step += 1;
            let target = total * self.step as f64 / (self.max_cuts + 1) as f64;
            while self.cursor < self.pooled.len() {
                let w = self.pooled[self.cursor].weight;
                if self.cumulative + w >= target {
                    break;
                }
                self.cumulative += w;
                self.cursor += 1;
            }
            if self.cursor + 1 >= self.pooled.len() {
                // Later targets are larger, so no further cut exists.
                self.step = self.max_cuts;
                return None;
            }
            let cut = midpoint(self.pooled[self.cursor].value, self.pooled[self.cursor + 1].value);
            if self.last_cut.map_or(false, |last| last.partial_cmp(&cut) != Some(Ordering::Less)) {
                continue;
            }
            return Some(cut);
        }
        None
    }
}

impl Iterator for CutPoints {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.emitted >= self.max_cuts {
            return None;
        }
        let cut = match self.mode {
            Mode::Boundaries => self.next_boundary(),
            Mode::Quantiles { total } => self.next_quantile(total),
        }?;
        self.emitted += 1;
        self.last_cut = Some(cut);
        Some(cut)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.max_cuts - self.emitted))
    }
}
