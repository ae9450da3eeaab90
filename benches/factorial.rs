use criterion::{criterion_group, criterion_main, Criterion};
use parex::workloads::{factorial_task, Factorial};
use parex::{ExecutorConfig, ParallelExecutor, TaskBatch};

const INPUTS: [u32; 4] = [5000, 6000, 700, 8000];

fn bench_factorials(c: &mut Criterion) {
    let mut group = c.benchmark_group("factorial_batch");
    group.sample_size(10);

    group.bench_function("sequential", |b| {
        b.iter(|| INPUTS.iter().map(|n| Factorial::compute(*n)).collect::<Vec<_>>())
    });

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let executor = ParallelExecutor::new(ExecutorConfig::cpu_bound()).unwrap();
    group.bench_function("parallel", |b| {
        b.iter(|| {
            runtime
                .block_on(executor.execute(TaskBatch::from_inputs(INPUTS, factorial_task(None))))
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_factorials);
criterion_main!(benches);
