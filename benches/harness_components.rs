/// Harness component benchmarks
///
/// Cost of the pieces that run between timed regions: duration formatting,
/// sample aggregation and the sponge.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use wasmbench::format::format_duration;
use wasmbench::sponge::Sponge;
use wasmbench::stats::{SampleSet, SAMPLE_COUNT};

fn bench_format_duration(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_duration");
    group.measurement_time(Duration::from_secs(3));

    for (unit, ms) in [("s", 15000.0), ("ms", 50.0), ("us", 0.05), ("ns", 0.00005)] {
        group.bench_with_input(BenchmarkId::from_parameter(unit), &ms, |b, &ms| {
            b.iter(|| format_duration(black_box(ms)))
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut samples = [0.0; SAMPLE_COUNT];
    for (i, sample) in samples.iter_mut().enumerate() {
        *sample = 0.05 + i as f64 * 0.001;
    }
    let set = SampleSet::new(samples);

    c.bench_function("aggregate_samples", |b| b.iter(|| black_box(&set).aggregate()));
}

fn bench_sponge(c: &mut Criterion) {
    let mut group = c.benchmark_group("sponge");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("absorb_1000", |b| {
        b.iter(|| {
            let mut sponge = Sponge::new();
            for i in 0..1000 {
                sponge.absorb(i as f64);
            }
            sponge.value()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_format_duration, bench_aggregate, bench_sponge);

criterion_main!(benches);
