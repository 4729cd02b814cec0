//! Statistical utilities backing anomaly detection and distribution reports.
//!
//! All functions are pure over a slice of `f64` and never fail: degenerate
//! inputs (empty slices, zero spread) have defined results instead of errors.
//!
//! Quartiles and the median use the biased nearest-rank method: after an
//! ascending sort the value at index `floor(n * p)` is taken, without
//! interpolation.

use serde::{Deserialize, Serialize};

/// Smoothing term added to every bin before taking the KL ratio.
pub const KL_EPSILON: f64 = 1e-10;

/// Default number of histogram bins for drift and distribution reports.
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

/// Summary statistics for a numeric sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    /// Arithmetic mean
    pub mean: f64,
    /// Nearest-rank median
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Nearest-rank first quartile
    pub q1: f64,
    /// Nearest-rank third quartile
    pub q3: f64,
}

/// One bar of a charting histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionBucket {
    /// Lower edge of the bin, two decimal places
    pub range: String,
    /// Raw count of values in the bin
    pub count: usize,
}

/// Calculates summary statistics.
///
/// An empty slice yields an all-zero summary.
pub fn calculate_stats(values: &[f64]) -> StatisticalSummary {
    if values.is_empty() {
        return StatisticalSummary::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let (mean, std_dev) = mean_and_std_dev(values);
    let last = sorted.len().saturating_sub(1);

    StatisticalSummary {
        mean,
        median: nearest_rank(&sorted, 0.5),
        std_dev,
        min: sorted[0],
        max: sorted[last],
        q1: nearest_rank(&sorted, 0.25),
        q3: nearest_rank(&sorted, 0.75),
    }
}

/// Calculates mean and population standard deviation (divides by n).
///
/// Returns `(0.0, 0.0)` for an empty slice.
pub fn mean_and_std_dev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

    (mean, variance.sqrt())
}

/// Standardized distance of `value` from `mean`.
///
/// A zero standard deviation means every value sits on the mean, so the
/// score is 0 rather than a division error.
pub fn calculate_z_score(value: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev == 0.0 {
        return 0.0;
    }
    (value - mean) / std_dev
}

/// Counts values into `bins` equal-width bins spanning `[min, max]`.
///
/// The maximum value is clamped into the last bin. When the span is zero
/// (all-equal or empty input) a bin width of 1 is used. A `bins` of 0 is
/// treated as 1.
pub fn histogram_counts(values: &[f64], bins: usize) -> Vec<usize> {
    let layout = BinLayout::new(values, bins);
    let mut counts = vec![0usize; layout.bins];

    for &value in values {
        let slot = &mut counts[layout.index_of(value)];
        *slot = slot.saturating_add(1);
    }

    counts
}

/// Histogram normalized to probabilities over its own total.
///
/// Empty input yields all-zero probabilities.
pub fn normalized_histogram(values: &[f64], bins: usize) -> Vec<f64> {
    let counts = histogram_counts(values, bins);
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }

    let total = total as f64;
    counts
        .into_iter()
        .map(|count| count as f64 / total)
        .collect()
}

/// KL divergence of `current` from `baseline` over `bins` bins.
///
/// Each side is histogrammed over its own range and normalized by its own
/// length, so the two samples need not be the same size. Every bin of both
/// distributions is smoothed with [`KL_EPSILON`]. The result is
/// non-negative and asymmetric; a sample compared with itself scores 0.
pub fn detect_drift(baseline: &[f64], current: &[f64], bins: usize) -> f64 {
    let p = normalized_histogram(baseline, bins);
    let q = normalized_histogram(current, bins);

    p.iter()
        .zip(q.iter())
        .map(|(p_i, q_i)| {
            let p_s = p_i + KL_EPSILON;
            let q_s = q_i + KL_EPSILON;
            p_s * (p_s / q_s).ln()
        })
        .sum()
}

/// Raw-count histogram labelled by each bin's lower edge, for charting.
pub fn generate_distribution_data(values: &[f64], bins: usize) -> Vec<DistributionBucket> {
    let layout = BinLayout::new(values, bins);
    let counts = histogram_counts(values, bins);

    counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| DistributionBucket {
            range: format!("{:.2}", layout.lower_edge(index)),
            count,
        })
        .collect()
}

fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    let index = (sorted.len() as f64 * p).floor() as usize;
    sorted[index.min(sorted.len().saturating_sub(1))]
}

/// Bin geometry shared by the counting and labelling passes.
struct BinLayout {
    min: f64,
    width: f64,
    bins: usize,
}

impl BinLayout {
    fn new(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let (min, max) = if values.is_empty() {
            (0.0, 0.0)
        } else {
            values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };

        let width = (max - min) / bins as f64;
        let width = if width == 0.0 { 1.0 } else { width };

        Self { min, width, bins }
    }

    fn index_of(&self, value: f64) -> usize {
        let raw = ((value - self.min) / self.width).floor() as usize;
        raw.min(self.bins.saturating_sub(1))
    }

    fn lower_edge(&self, index: usize) -> f64 {
        let offset = index as f64 * self.width;
        self.min + offset
    }
}
