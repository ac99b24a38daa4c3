//! Per-CPU aggregation benchmarks.
//!
//! Guards the single-pass bucket aggregation against regressions; the
//! event volume mirrors a few seconds of `sched_switch` on a busy box.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use vigia::analysis::count_events_per_cpu;
use vigia::event::TraceEvent;

const EVENTS: usize = 100_000;
const CPUS: usize = 8;

fn make_events() -> Vec<TraceEvent> {
    (0..EVENTS)
        .map(|i| {
            TraceEvent::sched_switch(
                i as f64 * 1e-5,
                i % CPUS,
                "prev",
                100,
                0,
                "next",
                200,
                120,
            )
        })
        .collect()
}

fn bench_count_events_per_cpu(c: &mut Criterion) {
    let events = make_events();

    let mut group = c.benchmark_group("aggregation");
    group.throughput(Throughput::Elements(EVENTS as u64));

    group.bench_function("count_events_per_cpu_100k", |b| {
        b.iter(|| {
            let table = count_events_per_cpu(black_box(&events), black_box(CPUS));
            black_box(table);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_count_events_per_cpu);
criterion_main!(benches);
