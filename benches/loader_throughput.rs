/// Event interpretation throughput
///
/// Measures the per-event cost of dispatch + interpretation + interning, and
/// the scaling of sharded whole-trace loading.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use schedline::event::Event;
use schedline::ingest::{load_trace, LoadOptions};
use schedline::loader::{EventLoader, LoaderSet};
use schedline::string_bank::StringBank;
use std::sync::Arc;

/// A synthetic trace cycling through switch, wakeup and migrate events
fn synthetic_trace(len: u64) -> Vec<Event> {
    (0..len)
        .map(|i| {
            let cpu = (i % 8) as i64;
            let pid = (i % 257) as i64 + 1;
            match i % 3 {
                0 => Event::new(i, i as i64 * 10, cpu, "sched_switch")
                    .with_number("next_pid", pid)
                    .with_number("prev_pid", pid + 1)
                    .with_number("prev_state", (i % 2) as i64)
                    .with_number("next_prio", 120)
                    .with_number("prev_prio", 120)
                    .with_text("next_comm", format!("worker-{}", pid % 16))
                    .with_text("prev_comm", format!("worker-{}", (pid + 1) % 16)),
                1 => Event::new(i, i as i64 * 10, cpu, "sched_wakeup")
                    .with_number("pid", pid)
                    .with_number("target_cpu", cpu)
                    .with_number("prio", 120)
                    .with_text("comm", format!("worker-{}", pid % 16)),
                _ => Event::new(i, i as i64 * 10, cpu, "sched_migrate_task")
                    .with_number("pid", pid)
                    .with_number("orig_cpu", cpu)
                    .with_number("dest_cpu", (cpu + 1) % 8)
                    .with_number("prio", 120)
                    .with_text("comm", format!("worker-{}", pid % 16)),
            }
        })
        .collect()
}

fn bench_single_event(c: &mut Criterion) {
    let loader = EventLoader::new(LoaderSet::Default.loaders(), Arc::new(StringBank::new()))
        .expect("default loader");
    let trace = synthetic_trace(3);

    let mut group = c.benchmark_group("single_event");
    for ev in &trace {
        group.bench_with_input(BenchmarkId::from_parameter(&ev.name), ev, |b, ev| {
            b.iter(|| loader.thread_transitions(black_box(ev)))
        });
    }
    group.finish();
}

fn bench_sharded_load(c: &mut Criterion) {
    let loader = EventLoader::new(LoaderSet::Default.loaders(), Arc::new(StringBank::new()))
        .expect("default loader");
    let trace = synthetic_trace(100_000);

    let mut group = c.benchmark_group("sharded_load");
    group.throughput(Throughput::Elements(trace.len() as u64));
    group.sample_size(20);
    for jobs in [1usize, 2, 4, 8] {
        let options = LoadOptions {
            strict: true,
            jobs,
        };
        group.bench_with_input(BenchmarkId::from_parameter(jobs), &options, |b, options| {
            b.iter(|| load_trace(&loader, black_box(&trace), options))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_event, bench_sharded_load);
criterion_main!(benches);
