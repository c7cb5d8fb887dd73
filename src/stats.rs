//! Running inter-spike interval statistics.
//!
//! [`IntervalStatistics`] keeps a numerically stable running mean and variance
//! using Welford's one-pass update. No history is stored, so the accumulator is
//! `Copy`, allocation-free, and every operation is O(1).

/// Online mean/variance accumulator for interval values.
///
/// # Example
/// ```
/// # use spikestats::IntervalStatistics;
/// let mut stats = IntervalStatistics::new();
/// for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     stats.push(x);
/// }
/// assert_eq!(stats.count(), 8);
/// assert!((stats.mean() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalStatistics {
    count: u64,
    mean: f64,
    /// Sum of squared deviations from the running mean (Welford's M2)
    m2: f64,
}

impl Default for IntervalStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalStatistics {
    pub const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    /// Adds one interval to the accumulator.
    #[inline]
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let n = self.count as f64;

        let delta = x - self.mean;
        self.mean += delta / n;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    /// Number of intervals pushed since construction or the last [`clear`](Self::clear).
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running mean, `0.0` when empty.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance (`count - 1` denominator).
    ///
    /// Returns `0.0` while fewer than two intervals have been pushed, so check
    /// [`count`](Self::count) before trusting the value.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        self.m2 / (self.count - 1) as f64
    }

    /// Sample standard deviation, `0.0` while `count < 2`.
    pub fn stddev(&self) -> f64 {
        libm::sqrt(self.variance())
    }

    /// Coefficient of variation, `stddev / mean`.
    ///
    /// Returns `0.0` when the ratio is undefined (`count < 2` or a zero mean).
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.count < 2 || self.mean == 0.0 {
            return 0.0;
        }
        self.stddev() / self.mean
    }

    /// Resets count, mean and M2 together.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
