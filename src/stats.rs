//! Sample aggregation
//!
//! Every target is measured exactly [`SAMPLE_COUNT`] times. The aggregator
//! reduces those per-iteration estimates to a population mean and population
//! standard deviation. No min/max, percentiles or outlier rejection: the goal
//! is repeatable order-of-magnitude numbers, not rigorous statistics.

use serde::Serialize;

/// Samples taken per target, identical for every target
pub const SAMPLE_COUNT: usize = 10;

/// One target's worth of per-iteration cost estimates (milliseconds)
///
/// Insertion order is measurement order.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    samples: [f64; SAMPLE_COUNT],
}

impl SampleSet {
    pub fn new(samples: [f64; SAMPLE_COUNT]) -> Self {
        Self { samples }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Reduce the set to mean and standard deviation
    pub fn aggregate(&self) -> BenchmarkResult {
        let count = SAMPLE_COUNT as f64;
        let mean = self.samples.iter().sum::<f64>() / count;
        let variance = self
            .samples
            .iter()
            .map(|sample| {
                let delta = sample - mean;
                delta * delta
            })
            .sum::<f64>()
            / count;

        BenchmarkResult {
            mean,
            standard_deviation: variance.sqrt(),
        }
    }
}

/// Aggregated result for one target (milliseconds per iteration)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub mean: f64,
    pub standard_deviation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_samples_have_zero_deviation() {
        let set = SampleSet::new([2.5; SAMPLE_COUNT]);
        let result = set.aggregate();
        assert_eq!(result.mean, 2.5);
        assert_eq!(result.standard_deviation, 0.0);
    }

    #[test]
    fn test_population_not_sample_deviation() {
        // Five 1.0s and five 3.0s: mean 2, every delta is 1, so the
        // population SD is exactly 1 (the sample SD would be ~1.054).
        let set = SampleSet::new([1.0, 3.0, 1.0, 3.0, 1.0, 3.0, 1.0, 3.0, 1.0, 3.0]);
        let result = set.aggregate();
        assert_eq!(result.mean, 2.0);
        assert!((result.standard_deviation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_outlier_is_kept() {
        let mut samples = [0.0; SAMPLE_COUNT];
        samples[9] = 10.0;
        let result = SampleSet::new(samples).aggregate();
        assert!((result.mean - 1.0).abs() < 1e-12);
        assert!((result.standard_deviation - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_samples_keep_measurement_order() {
        let samples = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let set = SampleSet::new(samples);
        assert_eq!(set.as_slice(), &samples);
    }
}
