//! Grid shape sweep for a fixed matrix size.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gridmul::{matmul_naive_ijk, run};

const N: usize = 256;
const ITERATIONS: usize = 2;

fn bench_grid_shapes(c: &mut Criterion) {
    let a0: Vec<f64> = (0..N * N).map(|i| (i % 100) as f64 * 1e-3).collect();
    let b: Vec<f64> = (0..N * N).map(|i| (i % 100) as f64 * 1e-3).collect();

    let mut group = c.benchmark_group("grid_run");
    group.throughput(Throughput::Elements((2 * N * N * N * ITERATIONS) as u64));
    group.sample_size(10);

    group.bench_function("sequential", |bench| {
        let mut a = a0.clone();
        let mut out = vec![0.0; N * N];
        bench.iter(|| {
            a.copy_from_slice(&a0);
            for _ in 0..ITERATIONS {
                matmul_naive_ijk(black_box(&a), black_box(&b), &mut out, N);
                a.copy_from_slice(&out);
            }
        })
    });

    for (p, q) in [(1, 1), (2, 1), (1, 2), (2, 2), (4, 1), (2, 4), (4, 4)] {
        group.bench_with_input(BenchmarkId::new("grid", format!("{}x{}", p, q)), &(p, q), |bench, &(p, q)| {
            let mut a = a0.clone();
            let mut out = vec![0.0; N * N];
            bench.iter(|| {
                a.copy_from_slice(&a0);
                run(&mut a, black_box(&b), &mut out, N, p, q, ITERATIONS).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grid_shapes);
criterion_main!(benches);
