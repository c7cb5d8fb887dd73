//! Per-tick spike monitoring pipeline.
//!
//! [`SpikeMonitor`] wires a [`SpikeDetector`] to an [`IntervalStatistics`]
//! accumulator and exposes the lifecycle hooks a real-time host calls between
//! ticks. One tick is:
//!
//! 1. read the membrane voltage and the clock
//! 2. advance the detector
//! 3. on a confirmed spike, store its interval and, once past the start-up
//!    spikes, push it into the statistics
//! 4. write the latest interval to the output channel
//!
//! Nothing on the tick path allocates, blocks or fails. Configuration changes
//! and resets must be serialized against ticks by the host.

use log::{debug, trace};

use crate::config::{DetectorConfig, NANOS_PER_SECOND};
use crate::detector::{SpikeDetector, SpikeEvent};
use crate::host::{
    Clock, OutputSink, Parameter, ParameterStore, SampleSource, StateField, ISI_OUTPUT, VM_INPUT,
};
use crate::stats::IntervalStatistics;

/// Spikes confirmed after a reset whose intervals stay out of the statistics.
///
/// The first interval is measured from the zeroed start-up timestamp; the
/// second is dropped as well to keep the epoch boundary clean.
pub const STARTUP_SPIKES: u64 = 2;

/// Snapshot of everything the monitor publishes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalSummary {
    /// Spikes confirmed since the last reset
    pub spike_count: u64,
    /// Intervals accumulated into the statistics
    pub intervals: u64,
    /// Most recent interval in ms, including start-up intervals
    pub last_interval: f64,
    /// Mean interval in ms
    pub mean: f64,
    /// Interval standard deviation in ms
    pub stddev: f64,
    /// Coefficient of variation
    pub cv: f64,
    /// Run time since the last reset in seconds
    pub time: f64,
}

/// Spike detector plus running ISI statistics for one input channel.
///
/// # Example
/// ```
/// # use spikestats::{DetectorConfig, SpikeMonitor};
/// let mut monitor = SpikeMonitor::new(DetectorConfig::new(0.0, 1e-3));
///
/// // Pulses every 10 ms, sampled every 0.1 ms
/// for tick in 0..1000u64 {
///     let sample = if tick % 100 == 50 { 1.0 } else { -1.0 };
///     monitor.step(sample, tick * 100_000);
/// }
///
/// let summary = monitor.summary();
/// assert_eq!(summary.spike_count, 10);
/// assert_eq!(summary.intervals, 8);
/// assert!((summary.mean - 10.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct SpikeMonitor {
    detector: SpikeDetector,
    stats: IntervalStatistics,
    last_interval: f64,
    /// Seconds per tick
    period: f64,
    ticks: u64,
}

impl Default for SpikeMonitor {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl SpikeMonitor {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            detector: SpikeDetector::new(config),
            stats: IntervalStatistics::new(),
            last_interval: 0.0,
            period: 0.0,
            ticks: 0,
        }
    }

    /// Runs one tick against an already acquired sample and timestamp.
    #[inline]
    pub fn step(&mut self, sample: f64, now: u64) -> Option<SpikeEvent> {
        self.ticks += 1;

        let event = self.detector.process(sample, now);
        if let Some(spike) = event {
            self.last_interval = spike.interval;
            if spike.count > STARTUP_SPIKES {
                self.stats.push(spike.interval);
            }
            trace!(
                "spike #{} at {} ns, isi {:.3} ms",
                spike.count,
                spike.time,
                spike.interval
            );
        }

        event
    }

    /// Runs one tick against the host's input, clock and output.
    ///
    /// The latest interval is written every tick, even while it is still a
    /// start-up interval excluded from the statistics.
    pub fn execute<S, C, O>(
        &mut self,
        source: &mut S,
        clock: &C,
        sink: &mut O,
    ) -> Option<SpikeEvent>
    where
        S: SampleSource + ?Sized,
        C: Clock + ?Sized,
        O: OutputSink + ?Sized,
    {
        let sample = source.read(VM_INPUT);
        let event = self.step(sample, clock.now());
        sink.write(ISI_OUTPUT, self.last_interval);
        event
    }

    /// Clears statistics, detector state, timestamps and run time.
    ///
    /// Bound to the host's "reset statistics" control. Configuration and the
    /// tick period are kept.
    pub fn reset(&mut self) {
        self.stats.clear();
        self.detector.reset();
        self.last_interval = 0.0;
        self.ticks = 0;
        debug!("spike statistics reset");
    }

    /// Host initialization: records the tick period, restores the default
    /// configuration, resets, then writes parameters and state to the panel.
    pub fn on_init<P, C>(&mut self, store: &mut P, clock: &C)
    where
        P: ParameterStore + ?Sized,
        C: Clock + ?Sized,
    {
        self.set_period(clock.period());
        let config = DetectorConfig::default();
        self.detector.set_config(config);
        self.reset();

        for param in Parameter::ALL {
            let value = match param {
                Parameter::Threshold => config.threshold_mv(),
                Parameter::MinInterval => config.min_interval_ms(),
            };
            store.set_parameter(param, value);
        }
        self.publish_state(store);

        debug!(
            "initialized: threshold {} mV, min interval {} ms, period {} s",
            config.threshold_mv(),
            config.min_interval_ms(),
            self.period
        );
    }

    /// Re-reads the parameter panel. Fields the store lacks keep their value.
    pub fn on_configuration_applied<P>(&mut self, store: &P)
    where
        P: ParameterStore + ?Sized,
    {
        let current = *self.detector.config();
        let threshold_mv = store
            .parameter(Parameter::Threshold)
            .unwrap_or_else(|| current.threshold_mv());
        let min_interval_ms = store
            .parameter(Parameter::MinInterval)
            .unwrap_or_else(|| current.min_interval_ms());

        let config = DetectorConfig::from_display(threshold_mv, min_interval_ms);
        self.detector.set_config(config);
        debug!(
            "configuration applied: threshold {} mV, min interval {} ms",
            threshold_mv, min_interval_ms
        );
    }

    pub fn on_pause(&mut self) {
        debug!("paused after {} ticks", self.ticks);
    }

    /// Resuming starts a fresh epoch.
    pub fn on_resume(&mut self) {
        debug!("resumed");
        self.reset();
    }

    pub fn on_period_changed<C>(&mut self, clock: &C)
    where
        C: Clock + ?Sized,
    {
        self.set_period(clock.period());
        debug!("tick period changed to {} s", self.period);
    }

    /// Writes the read-only panel fields.
    pub fn publish_state<P>(&self, store: &mut P)
    where
        P: ParameterStore + ?Sized,
    {
        let summary = self.summary();
        store.set_state(StateField::AverageIsi, summary.mean);
        store.set_state(StateField::Cv, summary.cv);
        store.set_state(StateField::SpikeCount, summary.spike_count as f64);
        store.set_state(StateField::Time, summary.time);
    }

    pub fn summary(&self) -> IntervalSummary {
        IntervalSummary {
            spike_count: self.detector.count(),
            intervals: self.stats.count(),
            last_interval: self.last_interval,
            mean: self.stats.mean(),
            stddev: self.stats.stddev(),
            cv: self.stats.coefficient_of_variation(),
            time: self.elapsed_time(),
        }
    }

    /// Replaces the configuration directly, bypassing the parameter store.
    pub fn set_config(&mut self, config: DetectorConfig) {
        self.detector.set_config(config);
    }

    pub fn config(&self) -> &DetectorConfig {
        self.detector.config()
    }

    pub fn detector(&self) -> &SpikeDetector {
        &self.detector
    }

    pub fn statistics(&self) -> &IntervalStatistics {
        &self.stats
    }

    /// Most recent interval in ms, `0.0` before the first spike.
    pub fn last_interval(&self) -> f64 {
        self.last_interval
    }

    /// Tick period in seconds.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Ticks run since the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run time since the last reset in seconds.
    pub fn elapsed_time(&self) -> f64 {
        self.ticks as f64 * self.period
    }

    fn set_period(&mut self, period_nanos: u64) {
        self.period = period_nanos as f64 / NANOS_PER_SECOND;
    }
}
