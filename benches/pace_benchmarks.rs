use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pacetrack::pace::{self, Tier};

/// Performance benchmarks for the pace arithmetic hot path
///
/// The pace table regenerates on every config edit and the classifier runs
/// on every mark; both must stay trivially cheap.

fn bench_pace_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pace Table");

    // Denser marker spacing means more rows
    for &marker_distance in &[25.0, 10.0, 5.0, 1.0] {
        let rows = (400.0 / marker_distance) as u64 + 1;
        group.throughput(Throughput::Elements(rows));
        group.bench_with_input(
            BenchmarkId::new("pace_table", marker_distance as u32),
            &marker_distance,
            |b, &marker_distance| {
                b.iter(|| pace::pace_table(black_box(400.0), marker_distance, 120.0, false));
            },
        );
    }

    group.finish();
}

fn bench_tier_classification(c: &mut Criterion) {
    c.bench_function("classify_tier", |b| {
        b.iter(|| {
            for i in 0..1000 {
                let observed = 8.0 + (i as f64) * 0.004;
                let _ = Tier::from_deviation(black_box(observed), black_box(9.6));
            }
        });
    });
}

fn bench_plan_decomposition(c: &mut Criterion) {
    c.bench_function("plan_decomposition", |b| {
        b.iter(|| {
            let speed = pace::target_speed_kmh(black_box(14.0), black_box(85.0));
            let distance = pace::total_distance_m(speed, black_box(12.0));
            let (laps, remainder) = pace::laps_and_remainder(distance, black_box(400.0));
            let markers = pace::markers_from_remainder(remainder, black_box(10.0));
            pace::distance_from_laps_and_markers(laps, markers, 400.0, 10.0)
        });
    });
}

criterion_group!(
    benches,
    bench_pace_table,
    bench_tier_classification,
    bench_plan_decomposition
);
criterion_main!(benches);
