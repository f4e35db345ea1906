//! Benchmarks for level resolution and dispatch.
//!
//! Run with: `cargo bench -- enablement`

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use quantum_hierarchy::{Appender, AppenderResult, Hierarchy, Level, LogEvent, Logger};

#[derive(Debug)]
struct NullAppender;

impl Appender for NullAppender {
    fn name(&self) -> &str {
        "null"
    }

    fn write(&self, event: &LogEvent) -> AppenderResult<()> {
        black_box(event);
        Ok(())
    }
}

fn logger_at_depth(hierarchy: &Hierarchy, depth: usize) -> Logger {
    let name = (0..depth)
        .map(|i| format!("seg{i}"))
        .collect::<Vec<_>>()
        .join(".");
    hierarchy.get_instance(&name).unwrap()
}

fn bench_is_enabled_for(c: &mut Criterion) {
    let mut group = c.benchmark_group("enablement/is_enabled_for");
    for depth in [1usize, 4, 16, 64] {
        let hierarchy = Hierarchy::new();
        hierarchy.get_root().set_level(Level::Info).unwrap();
        let logger = logger_at_depth(&hierarchy, depth);

        group.bench_with_input(BenchmarkId::from_parameter(depth), &logger, |b, logger| {
            b.iter(|| {
                black_box(logger.is_enabled_for(black_box(Level::Debug)));
                black_box(logger.is_enabled_for(black_box(Level::Warn)));
            })
        });
    }
    group.finish();
}

fn bench_suppressed_log(c: &mut Criterion) {
    let hierarchy = Hierarchy::new();
    hierarchy.get_root().set_level(Level::Error).unwrap();
    let logger = logger_at_depth(&hierarchy, 8);

    c.bench_function("enablement/suppressed_log_with", |b| {
        b.iter(|| logger.log_with(Level::Debug, || format!("value = {}", black_box(42))))
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("enablement/dispatch");
    for depth in [1usize, 8, 32] {
        let hierarchy = Hierarchy::new();
        hierarchy.get_root().add_appender(Arc::new(NullAppender));
        let logger = logger_at_depth(&hierarchy, depth);
        let event = LogEvent::new(Level::Info, logger.get_name(), "payload");

        group.bench_with_input(BenchmarkId::from_parameter(depth), &event, |b, event| {
            b.iter(|| logger.call_appenders(event))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_is_enabled_for, bench_suppressed_log, bench_dispatch);
criterion_main!(benches);
