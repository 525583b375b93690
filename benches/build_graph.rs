//! Criterion benchmarks for grid graph construction
//!
//! Covers:
//! - 4- and 8-connected image graphs, undirected and directed
//! - Sequential vs chunked parallel build
//! - 26-connected volumes

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grid_graph::{build_graph, BuildConfig, DenseGrid, Neighborhood, OffsetPolicy, SquaredDifference};
use std::hint::black_box;

/// Deterministic pseudo-random image (LCG for reproducibility)
fn noise_image(width: usize, height: usize) -> DenseGrid<u8, 2> {
    let mut rng_state = 12345_u64;
    let data = (0..width * height)
        .map(|_| {
            rng_state = rng_state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            (rng_state >> 16) as u8
        })
        .collect();
    DenseGrid::from_vec([width, height], data).unwrap()
}

/// Benchmark: undirected build, 4- vs 8-connectivity
fn bench_image_connectivity(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_connectivity");
    let config = BuildConfig::undirected().with_verify_vertex_mapping(false);

    for size in [64, 256, 512].iter() {
        let image = noise_image(*size, *size);
        group.throughput(Throughput::Elements((size * size) as u64));

        for (name, hood) in [
            ("von_neumann", Neighborhood::von_neumann(OffsetPolicy::Ordered)),
            ("moore", Neighborhood::moore(OffsetPolicy::Ordered)),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &image, |b, image| {
                b.iter(|| {
                    let graph =
                        build_graph(black_box(image), &hood, &SquaredDifference, &config).unwrap();
                    black_box(graph);
                });
            });
        }
    }

    group.finish();
}

/// Benchmark: directed vs undirected with the same offsets
fn bench_directedness(c: &mut Criterion) {
    let mut group = c.benchmark_group("directedness");
    let image = noise_image(256, 256);
    let hood = Neighborhood::moore(OffsetPolicy::Ordered);

    for (name, config) in [
        ("undirected", BuildConfig::undirected()),
        ("directed", BuildConfig::directed()),
    ] {
        let config = config.with_verify_vertex_mapping(false);
        group.bench_function(name, |b| {
            b.iter(|| {
                let graph = build_graph(black_box(&image), &hood, &SquaredDifference, &config).unwrap();
                black_box(graph);
            });
        });
    }

    group.finish();
}

/// Benchmark: sequential vs rayon build
#[cfg(feature = "parallel")]
fn bench_parallel(c: &mut Criterion) {
    use grid_graph::build_graph_par;

    let mut group = c.benchmark_group("parallel_build");
    let hood = Neighborhood::moore(OffsetPolicy::Ordered);

    for size in [256, 1024].iter() {
        let image = noise_image(*size, *size);
        for config in [BuildConfig::undirected(), BuildConfig::directed()] {
            let config = config.with_verify_vertex_mapping(false);
            let label = format!("{:?}", config.directedness);

            group.bench_with_input(
                BenchmarkId::new(format!("sequential_{label}"), size),
                &image,
                |b, image| {
                    b.iter(|| black_box(build_graph(image, &hood, &SquaredDifference, &config).unwrap()));
                },
            );
            group.bench_with_input(
                BenchmarkId::new(format!("parallel_{label}"), size),
                &image,
                |b, image| {
                    b.iter(|| {
                        black_box(build_graph_par(image, &hood, &SquaredDifference, &config).unwrap())
                    });
                },
            );
        }
    }

    group.finish();
}

#[cfg(not(feature = "parallel"))]
fn bench_parallel(_: &mut Criterion) {}

/// Benchmark: 3D volume, 26-connectivity
fn bench_volume(c: &mut Criterion) {
    let mut group = c.benchmark_group("volume");
    let config = BuildConfig::undirected().with_verify_vertex_mapping(false);
    let hood = Neighborhood::<3>::moore(OffsetPolicy::Ordered);

    for size in [16, 48].iter() {
        let volume = DenseGrid::from_fn([*size; 3], |[x, y, z]| (x ^ y ^ z) as f32).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &volume, |b, volume| {
            b.iter(|| black_box(build_graph(volume, &hood, &SquaredDifference, &config).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_image_connectivity,
    bench_directedness,
    bench_parallel,
    bench_volume
);
criterion_main!(benches);
