//! Debounced threshold-crossing spike detection.
//!
//! [`SpikeDetector`] advances a six-state debounce machine once per tick. A
//! rising edge moves `Idle` to `CrossedUp`; the spike is confirmed one tick
//! later on the `CrossedUp -> Confirming` edge, so the event timestamp is
//! always taken one sample after the edge was seen. After confirmation the
//! machine waits for the signal to come back down and for the refractory
//! window to pass before it re-arms.
//!
//! ```text
//!            above                       below
//!   Idle ---------> CrossedUp ---> Confirming ------> PendingLow --+
//!    ^                               |  above && sustained        |
//!    |                               v                            v
//!    +---- refractory elapsed ---- RefractoryActive <--below-- PendingHigh
//! ```

use crate::config::DetectorConfig;

/// Raw clock units after a confirmation beyond which a signal still above
/// threshold in `Confirming` takes the sustained path.
///
/// Compared against the unscaled clock difference (nanoseconds with the usual
/// real-time clock). The intended unit of this constant has never been pinned
/// down, so it is kept as-is rather than rescaled.
pub const SUSTAINED_REARM_TICKS: u64 = 100;

/// Clock units (nanoseconds) to interval units (milliseconds).
pub const NANOS_TO_MILLIS: f64 = 1e-6;

/// Phase of the debounce protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorState {
    /// Armed, waiting for an upward crossing
    #[default]
    Idle,
    /// Upward crossing seen on the previous tick
    CrossedUp,
    /// Spike confirmed, waiting to see how the signal leaves threshold
    Confirming,
    /// Signal stayed high; waiting for it to fall below threshold
    RefractoryPendingHigh,
    /// Signal already fell below threshold
    RefractoryPendingLow,
    /// Waiting out the refractory window
    RefractoryActive,
}

/// Everything the transition function looks at, reduced to booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionInput {
    /// `sample > threshold`
    pub above: bool,
    /// `sample < threshold`
    pub below: bool,
    /// Time since the last confirmation exceeds [`SUSTAINED_REARM_TICKS`]
    pub sustained: bool,
    /// Time since the last confirmation exceeds the refractory window
    pub refractory_elapsed: bool,
}

impl TransitionInput {
    /// Evaluates the transition conditions for one tick.
    ///
    /// A sample exactly at threshold is neither above nor below.
    #[inline]
    pub fn evaluate(sample: f64, threshold: f64, elapsed: u64, min_interval: u64) -> Self {
        Self {
            above: sample > threshold,
            below: sample < threshold,
            sustained: elapsed > SUSTAINED_REARM_TICKS,
            refractory_elapsed: elapsed > min_interval,
        }
    }
}

impl DetectorState {
    /// Every state in declaration order.
    pub const ALL: [DetectorState; 6] = [
        DetectorState::Idle,
        DetectorState::CrossedUp,
        DetectorState::Confirming,
        DetectorState::RefractoryPendingHigh,
        DetectorState::RefractoryPendingLow,
        DetectorState::RefractoryActive,
    ];

    /// Transition function. Total over every state and input combination.
    #[inline]
    pub fn next(self, input: TransitionInput) -> Self {
        use DetectorState::*;

        match self {
            Idle if input.above => CrossedUp,
            Idle => Idle,
            CrossedUp => Confirming,
            Confirming if input.above && input.sustained => RefractoryPendingHigh,
            Confirming if input.below => RefractoryPendingLow,
            Confirming => Confirming,
            RefractoryPendingHigh if input.below => RefractoryActive,
            RefractoryPendingHigh => RefractoryPendingHigh,
            RefractoryPendingLow => RefractoryActive,
            RefractoryActive if input.refractory_elapsed => Idle,
            RefractoryActive => RefractoryActive,
        }
    }

    /// Legacy integer code used by older hosts to display the state.
    pub fn code(self) -> i8 {
        match self {
            DetectorState::Idle => 0,
            DetectorState::CrossedUp => 1,
            DetectorState::Confirming => 2,
            DetectorState::RefractoryPendingLow => 3,
            DetectorState::RefractoryPendingHigh => 4,
            DetectorState::RefractoryActive => -1,
        }
    }

    /// Inverse of [`code`](Self::code). Unknown codes give `None`.
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(DetectorState::Idle),
            1 => Some(DetectorState::CrossedUp),
            2 => Some(DetectorState::Confirming),
            3 => Some(DetectorState::RefractoryPendingLow),
            4 => Some(DetectorState::RefractoryPendingHigh),
            -1 => Some(DetectorState::RefractoryActive),
            _ => None,
        }
    }
}

/// Timestamps of the last two confirmed spikes, in clock units.
///
/// Both start at zero, so the first interval after a reset is measured from
/// the clock origin and is not a real inter-spike interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventRecord {
    pub previous: u64,
    pub current: u64,
}

impl EventRecord {
    /// Shifts `current` into `previous` and stores `now`.
    #[inline]
    pub fn record(&mut self, now: u64) {
        self.previous = self.current;
        self.current = now;
    }

    /// Time between the two recorded spikes in milliseconds.
    ///
    /// A clock that stepped backwards yields `0.0` instead of a negative value.
    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.current.saturating_sub(self.previous) as f64 * NANOS_TO_MILLIS
    }
}

/// A confirmed spike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeEvent {
    /// Clock value at confirmation
    pub time: u64,
    /// Milliseconds since the previous confirmed spike
    pub interval: f64,
    /// Spikes confirmed since the last reset, this one included
    pub count: u64,
}

/// Single-channel debounced spike detector.
///
/// # Example
/// ```
/// # use spikestats::{DetectorConfig, SpikeDetector};
/// let mut detector = SpikeDetector::new(DetectorConfig::new(0.0, 1e-3));
///
/// // Rising edge at t = 1 ms, confirmed one tick later
/// assert!(detector.process(-1.0, 0).is_none());
/// assert!(detector.process(1.0, 1_000_000).is_none());
/// let event = detector.process(1.0, 1_000_100).unwrap();
/// assert_eq!(event.time, 1_000_100);
/// assert_eq!(event.count, 1);
/// ```
#[derive(Debug, Clone)]
pub struct SpikeDetector {
    config: DetectorConfig,
    min_interval_nanos: u64,
    state: DetectorState,
    record: EventRecord,
    count: u64,
}

impl SpikeDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            min_interval_nanos: config.min_interval_nanos(),
            state: DetectorState::Idle,
            record: EventRecord::default(),
            count: 0,
        }
    }

    /// Advances the state machine by one tick.
    ///
    /// Returns the spike confirmed on this tick, if any. At most one spike is
    /// confirmed per call.
    #[inline]
    pub fn process(&mut self, sample: f64, now: u64) -> Option<SpikeEvent> {
        let elapsed = now.saturating_sub(self.record.current);
        let input = TransitionInput::evaluate(
            sample,
            self.config.threshold,
            elapsed,
            self.min_interval_nanos,
        );

        let previous = self.state;
        self.state = previous.next(input);

        if previous == DetectorState::CrossedUp && self.state == DetectorState::Confirming {
            self.record.record(now);
            self.count += 1;
            return Some(SpikeEvent {
                time: now,
                interval: self.record.interval_ms(),
                count: self.count,
            });
        }

        None
    }

    /// Returns to `Idle` with zeroed timestamps and spike count.
    pub fn reset(&mut self) {
        self.state = DetectorState::Idle;
        self.record = EventRecord::default();
        self.count = 0;
    }

    /// Replaces the configuration. State and timestamps are kept.
    pub fn set_config(&mut self, config: DetectorConfig) {
        self.config = config;
        self.min_interval_nanos = config.min_interval_nanos();
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn record(&self) -> &EventRecord {
        &self.record
    }

    /// Spikes confirmed since the last reset.
    pub fn count(&self) -> u64 {
        self.count
    }
}
