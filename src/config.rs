//! Detection tuning and the display-unit boundary.
//!
//! The detector works in SI units (volts, seconds) while hosts display
//! millivolts and milliseconds. Conversions happen only here, when a
//! configuration is built or read back for display.

use thiserror::Error;

/// Nanoseconds per second, the clock's resolution.
pub const NANOS_PER_SECOND: f64 = 1e9;

/// Scale between SI units and their milli- display units.
const MILLI: f64 = 1000.0;

/// Default spike threshold in volts (-20 mV).
pub const DEFAULT_THRESHOLD: f64 = -0.02;

/// Default refractory window in seconds (5 ms).
pub const DEFAULT_MIN_INTERVAL: f64 = 5e-3;

/// Errors a host can hit when validating a configuration before applying it.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// Threshold is NaN or infinite
    #[error("threshold must be finite, got {0} V")]
    NonFiniteThreshold(f64),

    /// Refractory window is NaN or infinite
    #[error("minimum interval must be finite, got {0} s")]
    NonFiniteMinInterval(f64),

    /// Refractory window is below zero
    #[error("minimum interval must be non-negative, got {0} s")]
    NegativeMinInterval(f64),
}

/// Detection parameters in SI units.
///
/// # Example
/// ```
/// # use spikestats::DetectorConfig;
/// let config = DetectorConfig::from_display(-30.0, 10.0);
/// assert!((config.threshold - (-0.03)).abs() < 1e-12);
/// assert_eq!(config.min_interval_nanos(), 10_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectorConfig {
    /// Upward crossing level in volts
    pub threshold: f64,
    /// Refractory window in seconds
    pub min_interval: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

impl DetectorConfig {
    pub fn new(threshold: f64, min_interval: f64) -> Self {
        Self {
            threshold,
            min_interval,
        }
    }

    /// Builds a configuration from display units (mV, ms).
    pub fn from_display(threshold_mv: f64, min_interval_ms: f64) -> Self {
        Self {
            threshold: threshold_mv / MILLI,
            min_interval: min_interval_ms / MILLI,
        }
    }

    /// Threshold in millivolts.
    pub fn threshold_mv(&self) -> f64 {
        self.threshold * MILLI
    }

    /// Refractory window in milliseconds.
    pub fn min_interval_ms(&self) -> f64 {
        self.min_interval * MILLI
    }

    /// Refractory window in clock units.
    ///
    /// Negative and NaN windows collapse to zero; very large ones saturate.
    pub fn min_interval_nanos(&self) -> u64 {
        // `as` saturates float-to-int casts and maps NaN to 0
        libm::round(self.min_interval * NANOS_PER_SECOND) as u64
    }

    /// Checks the configuration before a host applies it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::NonFiniteThreshold(self.threshold));
        }
        if !self.min_interval.is_finite() {
            return Err(ConfigError::NonFiniteMinInterval(self.min_interval));
        }
        if self.min_interval < 0.0 {
            return Err(ConfigError::NegativeMinInterval(self.min_interval));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DetectorConfig::default();
        assert_eq!(config.threshold, -0.02);
        assert_eq!(config.min_interval, 5e-3);
        assert!((config.threshold_mv() - (-20.0)).abs() < 1e-12);
        assert!((config.min_interval_ms() - 5.0).abs() < 1e-12);
        assert_eq!(config.min_interval_nanos(), 5_000_000);
    }

    #[test]
    fn test_display_conversion() {
        let config = DetectorConfig::from_display(15.0, 2.5);
        assert!((config.threshold - 0.015).abs() < 1e-15);
        assert!((config.min_interval - 0.0025).abs() < 1e-15);
        assert!((config.threshold_mv() - 15.0).abs() < 1e-12);
        assert!((config.min_interval_ms() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_min_interval_nanos_saturates() {
        assert_eq!(DetectorConfig::new(0.0, -1.0).min_interval_nanos(), 0);
        assert_eq!(DetectorConfig::new(0.0, f64::NAN).min_interval_nanos(), 0);
        assert_eq!(
            DetectorConfig::new(0.0, f64::INFINITY).min_interval_nanos(),
            u64::MAX
        );
    }

    #[test]
    fn test_validate() {
        assert_eq!(DetectorConfig::default().validate(), Ok(()));
        assert_eq!(DetectorConfig::new(0.0, 0.0).validate(), Ok(()));

        assert_eq!(
            DetectorConfig::new(f64::INFINITY, 0.0).validate(),
            Err(ConfigError::NonFiniteThreshold(f64::INFINITY))
        );
        assert_eq!(
            DetectorConfig::new(0.0, -0.001).validate(),
            Err(ConfigError::NegativeMinInterval(-0.001))
        );
        assert!(matches!(
            DetectorConfig::new(0.0, f64::NAN).validate(),
            Err(ConfigError::NonFiniteMinInterval(_))
        ));
    }
}
