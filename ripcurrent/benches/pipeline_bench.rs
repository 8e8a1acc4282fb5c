//! Benchmarks for pipeline execution.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ripcurrent::rc;
use ripcurrent::testing::{Collect, Collected, Decorate, Greeting, Multiply, Numbers, Render};

fn pipeline_benchmark(c: &mut Criterion) {
    let values: Vec<i32> = (0..1_000).collect();

    c.bench_function("sync_chain_1000", |b| {
        let result = Collected::<i32>::new();
        let numbers = rc!(Numbers(values.clone()));
        let multiply = rc!(Multiply(3));
        let collect = rc!(Collect(result.clone()));
        b.iter(|| {
            result.clear();
            let summary = (&numbers | &multiply | &multiply | &collect).sync();
            black_box(summary.map(|s| s.delivered))
        });
    });

    c.bench_function("describe_chain", |b| {
        let numbers = rc!(Numbers(1, 2, 3));
        let multiply = rc!(Multiply(10));
        let collect = rc!(Collect());
        b.iter(|| {
            let chain = &numbers | &multiply | &collect;
            black_box(chain.describe())
        });
    });

    c.bench_function("multi_type_flow", |b| {
        let result = Collected::<String>::new();
        b.iter(|| {
            result.clear();
            let summary = (rc!(Greeting()) | rc!(Decorate()) | rc!(Render(result.clone()))).sync();
            black_box(summary.map(|s| s.emitted))
        });
    });

    c.bench_function("threaded_chain_1000", |b| {
        let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        let result = Collected::<i32>::new();
        let numbers = rc!(Numbers(values.clone()));
        let multiply = rc!(Multiply(3));
        let collect = rc!(Collect(result.clone()));
        b.iter(|| {
            result.clear();
            let job = (&numbers | &multiply | &collect).realize();
            black_box(runtime.block_on(job.run_threaded(64)).map(|s| s.delivered))
        });
    });
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
