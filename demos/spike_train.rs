//! Drives a spike monitor with a synthetic, jittered spike train.
//!
//! The demo plays the host: it supplies samples, a simulated real-time clock
//! and a parameter panel, then prints what the panel would show.
//!
//! Run with:
//!   cargo run --example spike_train
//!   cargo run --example spike_train -- --rate 40 --jitter 5 --duration 10

use clap::Parser;
use spikestats::host::{ISI_OUTPUT, VM_INPUT};
use spikestats::{
    Clock, DetectorConfig, OutputSink, Parameter, ParameterStore, SampleSource, SpikeMonitor,
    StateField,
};
use std::collections::HashMap;
use std::error::Error;

const RESTING_MV: f64 = -65.0;
const PEAK_MV: f64 = 30.0;
const SPIKE_WIDTH_MS: f64 = 1.0;

#[derive(Parser, Debug)]
#[command(about = "Spike detection and ISI statistics on a synthetic spike train")]
struct Args {
    /// Mean firing rate in Hz
    #[arg(long, default_value_t = 20.0)]
    rate: f64,

    /// Uniform ISI jitter in ms (+/-)
    #[arg(long, default_value_t = 3.0)]
    jitter: f64,

    /// Recording length in seconds
    #[arg(long, default_value_t = 5.0)]
    duration: f64,

    /// Sampling rate in Hz
    #[arg(long, default_value_t = 10_000.0)]
    sample_rate: f64,

    /// Detection threshold in mV
    #[arg(long, default_value_t = -20.0)]
    threshold: f64,

    /// Refractory window in ms
    #[arg(long, default_value_t = 5.0)]
    min_interval: f64,

    /// Peak-to-peak baseline noise in mV
    #[arg(long, default_value_t = 2.0)]
    noise: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Simple LCG returning values in [-1, 1].
struct Lcg(u64);

impl Lcg {
    fn next_signed(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
    }
}

/// Membrane voltage trace in volts plus the true spike onsets in ms.
fn synthesize(args: &Args) -> (Vec<f64>, Vec<f64>) {
    let mut rng = Lcg(args.seed);
    let dt_ms = 1000.0 / args.sample_rate;
    let samples = (args.duration * args.sample_rate) as usize;
    let mean_isi_ms = 1000.0 / args.rate;

    let mut onsets = Vec::new();
    let mut t = mean_isi_ms;
    while t < args.duration * 1000.0 {
        onsets.push(t);
        t += (mean_isi_ms + args.jitter * rng.next_signed()).max(SPIKE_WIDTH_MS * 2.0);
    }

    let mut trace = Vec::with_capacity(samples);
    let mut next_onset = 0;
    for i in 0..samples {
        let t = i as f64 * dt_ms;
        while next_onset + 1 < onsets.len() && onsets[next_onset] + SPIKE_WIDTH_MS < t {
            next_onset += 1;
        }
        let in_spike = onsets
            .get(next_onset)
            .is_some_and(|&onset| t >= onset && t < onset + SPIKE_WIDTH_MS);

        let base = if in_spike { PEAK_MV } else { RESTING_MV };
        let mv = base + args.noise * 0.5 * rng.next_signed();
        trace.push(mv / 1000.0);
    }

    (trace, onsets)
}

struct TraceSource {
    trace: Vec<f64>,
    pos: usize,
}

impl SampleSource for TraceSource {
    fn read(&mut self, channel: usize) -> f64 {
        debug_assert_eq!(channel, VM_INPUT);
        let v = self.trace[self.pos.min(self.trace.len() - 1)];
        self.pos += 1;
        v
    }
}

struct SimClock {
    now: u64,
    period: u64,
}

impl Clock for SimClock {
    fn now(&self) -> u64 {
        self.now
    }

    fn period(&self) -> u64 {
        self.period
    }
}

#[derive(Default)]
struct IsiOutput {
    last: f64,
}

impl OutputSink for IsiOutput {
    fn write(&mut self, channel: usize, value: f64) {
        debug_assert_eq!(channel, ISI_OUTPUT);
        self.last = value;
    }
}

#[derive(Default)]
struct Panel {
    parameters: HashMap<Parameter, f64>,
    states: HashMap<StateField, f64>,
}

impl ParameterStore for Panel {
    fn parameter(&self, param: Parameter) -> Option<f64> {
        self.parameters.get(&param).copied()
    }

    fn set_parameter(&mut self, param: Parameter, value: f64) {
        self.parameters.insert(param, value);
    }

    fn set_state(&mut self, field: StateField, value: f64) {
        self.states.insert(field, value);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    DetectorConfig::from_display(args.threshold, args.min_interval).validate()?;

    println!("=== Spike Statistics Demo ===\n");
    println!(
        "{:.1} Hz train, +/-{:.1} ms jitter, {:.1} s at {:.0} Hz",
        args.rate, args.jitter, args.duration, args.sample_rate
    );

    let (trace, onsets) = synthesize(&args);
    let period = (1e9 / args.sample_rate) as u64;

    let mut source = TraceSource { trace, pos: 0 };
    let mut clock = SimClock { now: 0, period };
    let mut output = IsiOutput::default();
    let mut panel = Panel::default();
    let mut monitor = SpikeMonitor::default();

    monitor.on_init(&mut panel, &clock);

    // User edits the panel and hits "Modify"
    panel.set_parameter(Parameter::Threshold, args.threshold);
    panel.set_parameter(Parameter::MinInterval, args.min_interval);
    monitor.on_configuration_applied(&panel);

    let ticks = source.trace.len() as u64;
    let report_every = (args.sample_rate as u64).max(1);
    for tick in 0..ticks {
        clock.now = tick * period;
        monitor.execute(&mut source, &clock, &mut output);

        if (tick + 1) % report_every == 0 {
            monitor.publish_state(&mut panel);
            println!(
                "t={:>5.1} s  spikes={:>4}  isi={:>7.2} ms",
                panel.states[&StateField::Time],
                panel.states[&StateField::SpikeCount],
                output.last
            );
        }
    }

    monitor.publish_state(&mut panel);
    let summary = monitor.summary();

    println!();
    for field in StateField::ALL {
        println!("{:<18} {:>10.4}", field.name(), panel.states[&field]);
    }
    println!("{:<18} {:>10.4}", "ISI stddev (ms)", summary.stddev);
    println!("{:<18} {:>10}", "True spikes", onsets.len());

    Ok(())
}
