use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spikestats::{DetectorConfig, IntervalStatistics, SpikeDetector, SpikeMonitor};

// 10 kHz sampling, 0.1 ms per tick
const TICK_NS: u64 = 100_000;

/// Square-wave spike train: `width` ticks high every `period` ticks.
fn spike_train(len: usize, period: usize, width: usize) -> Vec<f64> {
    (0..len)
        .map(|i| if i % period < width { 0.03 } else { -0.065 })
        .collect()
}

// A single tick has to fit well inside a 100 µs real-time period
fn bench_monitor_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("monitor_step");

    for spike_period in [20usize, 100, 1000].iter() {
        let samples = spike_train(10_000, *spike_period, 3);
        group.throughput(Throughput::Elements(samples.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("every_{}_ticks", spike_period)),
            &samples,
            |b, samples| {
                let mut monitor = SpikeMonitor::new(DetectorConfig::from_display(-20.0, 1.0));
                let mut tick = 0u64;
                b.iter(|| {
                    for &vm in samples.iter() {
                        let _ = black_box(monitor.step(black_box(vm), tick * TICK_NS));
                        tick += 1;
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_detector_quiet(c: &mut Criterion) {
    let mut group = c.benchmark_group("detector_quiet");

    let mut detector = SpikeDetector::new(DetectorConfig::default());
    let mut now = 0u64;
    group.bench_function("below_threshold", |b| {
        b.iter(|| {
            now += TICK_NS;
            let _ = black_box(detector.process(black_box(-0.065), now));
        });
    });

    group.finish();
}

fn bench_statistics_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("interval_statistics");

    let mut stats = IntervalStatistics::new();
    let mut x = 0.0f64;
    group.bench_function("push", |b| {
        b.iter(|| {
            x += 0.25;
            stats.push(black_box(10.0 + (x % 3.0)));
        });
    });

    group.bench_function("coefficient_of_variation", |b| {
        b.iter(|| black_box(stats.coefficient_of_variation()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_monitor_step,
    bench_detector_quiet,
    bench_statistics_push
);
criterion_main!(benches);
