//! Real-time spike detection and inter-spike interval statistics.
//!
//! Each tick the host hands the monitor one membrane-voltage sample and a
//! nanosecond timestamp. The monitor debounces upward threshold crossings
//! into confirmed spikes, enforces a refractory window, and keeps a running
//! mean, standard deviation and coefficient of variation of the intervals
//! between spikes.
//!
//! # Modules
//!
//! - [`detector`] - debounce state machine ([`SpikeDetector`])
//! - [`stats`] - Welford accumulator ([`IntervalStatistics`])
//! - [`monitor`] - per-tick pipeline and host lifecycle ([`SpikeMonitor`])
//! - [`host`] - capability traits the host implements
//! - [`config`] - tuning parameters and unit conversion
//!
//! The crate is `no_std` and never allocates.
//!
//! # Example
//!
//! ```
//! use spikestats::{DetectorConfig, SpikeMonitor};
//!
//! // -20 mV threshold, 5 ms refractory window
//! let mut monitor = SpikeMonitor::new(DetectorConfig::from_display(-20.0, 5.0));
//!
//! // 200 ms of a 100 Hz spike train sampled at 10 kHz
//! for tick in 0..2000u64 {
//!     let vm = if tick % 100 < 5 { 0.03 } else { -0.065 };
//!     monitor.step(vm, tick * 100_000);
//! }
//!
//! let summary = monitor.summary();
//! assert_eq!(summary.spike_count, 20);
//! assert!((summary.mean - 10.0).abs() < 1e-9);
//! ```

#![no_std]

pub mod config;
pub mod detector;
pub mod host;
pub mod monitor;
pub mod stats;

pub use config::{ConfigError, DetectorConfig};
pub use detector::{DetectorState, EventRecord, SpikeDetector, SpikeEvent, TransitionInput};
pub use host::{Clock, OutputSink, Parameter, ParameterStore, SampleSource, StateField};
pub use monitor::{IntervalSummary, SpikeMonitor};
pub use stats::IntervalStatistics;
