//! Capabilities the monitor borrows from its host.
//!
//! The host owns acquisition, timing and the parameter panel. The monitor only
//! sees them through these small traits, so any real-time runtime (or a test
//! double) can drive it.

/// Input channel carrying the membrane voltage.
pub const VM_INPUT: usize = 0;

/// Output channel carrying the latest inter-spike interval.
pub const ISI_OUTPUT: usize = 0;

/// Per-tick analog input.
pub trait SampleSource {
    /// Current value of `channel` in volts.
    fn read(&mut self, channel: usize) -> f64;
}

/// Monotonic real-time clock.
pub trait Clock {
    /// Current time in nanoseconds.
    fn now(&self) -> u64;

    /// Tick period in nanoseconds.
    fn period(&self) -> u64;
}

/// Per-tick analog output.
pub trait OutputSink {
    fn write(&mut self, channel: usize, value: f64);
}

/// Named parameters and read-only state exposed on the host's panel.
///
/// Values are in display units: millivolts, milliseconds, and seconds for
/// [`StateField::Time`].
pub trait ParameterStore {
    /// Current value of an editable parameter, `None` if the host has none.
    fn parameter(&self, param: Parameter) -> Option<f64>;

    fn set_parameter(&mut self, param: Parameter, value: f64);

    fn set_state(&mut self, field: StateField, value: f64);
}

/// Editable detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Threshold,
    MinInterval,
}

impl Parameter {
    pub const ALL: [Parameter; 2] = [Parameter::Threshold, Parameter::MinInterval];

    /// Label shown on the host panel.
    pub fn name(self) -> &'static str {
        match self {
            Parameter::Threshold => "Threshold (mV)",
            Parameter::MinInterval => "Min Interval (ms)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Parameter::Threshold => "Threshold (mV) at which to detect a spike",
            Parameter::MinInterval => {
                "Minimum interval (refractory period) that must pass before another spike is detected"
            }
        }
    }
}

/// Read-only values published after each tick or on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    AverageIsi,
    Cv,
    SpikeCount,
    Time,
}

impl StateField {
    pub const ALL: [StateField; 4] = [
        StateField::AverageIsi,
        StateField::Cv,
        StateField::SpikeCount,
        StateField::Time,
    ];

    /// Label shown on the host panel.
    pub fn name(self) -> &'static str {
        match self {
            StateField::AverageIsi => "Average ISI (ms)",
            StateField::Cv => "CV",
            StateField::SpikeCount => "# Spikes",
            StateField::Time => "Time (s)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StateField::AverageIsi => "Average ISI (ms)",
            StateField::Cv => "Coefficient of Variation",
            StateField::SpikeCount => "# Spikes",
            StateField::Time => "Time (s)",
        }
    }

    /// Position in [`ALL`](Self::ALL), handy for array-backed stores.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_unique() {
        for (i, a) in StateField::ALL.iter().enumerate() {
            assert_eq!(a.index(), i);
            for b in StateField::ALL.iter().skip(i + 1) {
                assert_ne!(a.name(), b.name());
            }
        }
        assert_ne!(Parameter::Threshold.name(), Parameter::MinInterval.name());
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Parameter::Threshold.name(), "Threshold (mV)");
        assert_eq!(Parameter::MinInterval.name(), "Min Interval (ms)");
        assert_eq!(StateField::SpikeCount.name(), "# Spikes");
        assert_eq!(StateField::Cv.description(), "Coefficient of Variation");
        assert_eq!(
            Parameter::Threshold.description(),
            "Threshold (mV) at which to detect a spike"
        );
        assert!(Parameter::MinInterval
            .description()
            .starts_with("Minimum interval (refractory period)"));
    }
}
