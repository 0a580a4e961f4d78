use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parsearch::{Benchmark, BenchmarkConfig, ExecutionStrategy, TextBuffer};
use std::num::NonZeroUsize;
use std::sync::Arc;

const TEXT_LEN: usize = 4 * 1024 * 1024;

fn create_text(len: usize) -> Arc<TextBuffer> {
    let line = "Line TODO: fix bug FIXME: optimize NOTE: important task\n";
    let text: Vec<u8> = line.bytes().cycle().take(len).collect();
    Arc::new(TextBuffer::from_bytes(&text, len))
}

fn create_benchmark(
    text: &Arc<TextBuffer>,
    pattern: &str,
    tasks: usize,
    strategy: ExecutionStrategy,
) -> Benchmark {
    let config = BenchmarkConfig {
        task_count: NonZeroUsize::new(tasks).unwrap(),
        thread_count: NonZeroUsize::new(num_cpus::get()).unwrap(),
        strategy,
        ..BenchmarkConfig::new(pattern)
    };
    Benchmark::new(config, text.clone()).unwrap()
}

fn bench_single_task(c: &mut Criterion) {
    let text = create_text(TEXT_LEN);
    let patterns = ["TODO", "important task", "x"];

    let mut group = c.benchmark_group("Single Task");
    for (i, pattern) in patterns.iter().enumerate() {
        let bench = create_benchmark(&text, pattern, 1, ExecutionStrategy::Single);
        group.bench_function(format!("pattern_{}", i), |b| {
            b.iter(|| black_box(bench.run_single().unwrap()));
        });
    }
    group.finish();
}

fn bench_task_scaling(c: &mut Criterion) {
    let text = create_text(TEXT_LEN);
    let task_counts = [1, 2, 4, 8, 16, 64];

    let mut group = c.benchmark_group("Task Scaling");
    for &tasks in &task_counts {
        let bench = create_benchmark(&text, "FIXME", tasks, ExecutionStrategy::Fixed);
        group.bench_function(format!("tasks_{}", tasks), |b| {
            b.iter(|| black_box(bench.run_multi().unwrap()));
        });
    }
    group.finish();
}

fn bench_strategies(c: &mut Criterion) {
    let text = create_text(TEXT_LEN);

    let mut group = c.benchmark_group("Executor Strategy");
    for strategy in [
        ExecutionStrategy::Single,
        ExecutionStrategy::Cached,
        ExecutionStrategy::Fixed,
    ] {
        let bench = create_benchmark(&text, "NOTE", 16, strategy);
        group.bench_function(strategy.to_string(), |b| {
            b.iter(|| black_box(bench.run_multi().unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_single_task,
    bench_task_scaling,
    bench_strategies
);
criterion_main!(benches);
