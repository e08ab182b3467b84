//! HNSW index benchmarks.
//!
//! Measures batch construction across dataset sizes and fan-outs, and query
//! latency across `ef_search` values with the measured recall folded into the
//! benchmark identifier.
use std::num::NonZeroUsize;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_main};

use navigraph_benches::{
    error::BenchSetupError,
    params::{BuildBenchParams, SearchBenchParams},
    recall::{RecallScore, brute_force_top_k, recall_at_k},
    source::{ClusteredConfig, SyntheticConfig, SyntheticVectors},
};
use navigraph_core::{HnswError, HnswIndex, HnswParams, Metric};

/// Seed used for all synthetic data generation in this benchmark.
const SEED: u64 = 42;

/// Vector dimensionality for all benchmark datasets.
const DIMENSIONS: usize = 16;

/// Dataset sizes to benchmark.
const POINT_COUNTS: &[usize] = &[500, 1_000, 5_000];

/// Fan-out values to benchmark.
const MAX_CONNECTIONS: &[usize] = &[8, 16, 24];

/// Dataset size for query benchmarks.
const SEARCH_POINT_COUNT: usize = 5_000;

/// Query beam widths to sweep.
const EF_SEARCH: &[usize] = &[16, 64, 200];

/// Neighbours requested per query.
const K: usize = 10;

/// Number of queries per iteration.
const QUERY_COUNT: usize = 100;

fn make_vectors(point_count: usize, seed: u64) -> Result<SyntheticVectors, BenchSetupError> {
    Ok(SyntheticVectors::generate(&SyntheticConfig {
        point_count,
        dimensions: DIMENSIONS,
        seed,
    })?)
}

fn make_params(max_connections: usize, ef_construction: usize) -> Result<HnswParams, HnswError> {
    Ok(HnswParams::new(max_connections, ef_construction)?.with_rng_seed(SEED))
}

fn build_index(vectors: &[Vec<f32>], params: HnswParams) -> Result<HnswIndex, HnswError> {
    let index = HnswIndex::for_metric(Metric::L2, DIMENSIONS, vectors.len(), params)?;
    index.insert_batch(vectors)?;
    Ok(index)
}

fn measure_recall(
    index: &HnswIndex,
    data: &[Vec<f32>],
    queries: &[Vec<f32>],
) -> Result<RecallScore, BenchSetupError> {
    let mut score = RecallScore::default();
    for query in queries {
        let oracle = brute_force_top_k(index.space(), data, query, K)?;
        let observed = index.search_knn(query, K)?;
        score += recall_at_k(&oracle, &observed, K);
    }
    Ok(score)
}

#[expect(
    clippy::excessive_nesting,
    reason = "Criterion bench_with_input + b.iter pattern requires deep nesting"
)]
fn hnsw_build_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("hnsw_build");
    group.sample_size(10);

    for &point_count in POINT_COUNTS {
        let vectors = make_vectors(point_count, SEED)?;
        for &m in MAX_CONNECTIONS {
            let ef_construction = m.saturating_mul(8);
            let params = make_params(m, ef_construction)?;
            let bench_params = BuildBenchParams {
                point_count,
                max_connections: m,
                ef_construction,
            };
            group.bench_with_input(
                BenchmarkId::from_parameter(&bench_params),
                &(&vectors, &params),
                |b, &(input, input_params)| {
                    b.iter_batched(
                        || input_params.clone(),
                        |cloned| {
                            if let Err(err) = build_index(input.rows(), cloned) {
                                panic!("hnsw_build failed during benchmark: {err}");
                            }
                        },
                        BatchSize::SmallInput,
                    );
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn hnsw_build(c: &mut Criterion) {
    if let Err(err) = hnsw_build_impl(c) {
        panic!("hnsw_build benchmark setup failed: {err}");
    }
}

fn hnsw_build_clustered_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let vectors = SyntheticVectors::generate_clustered(&ClusteredConfig {
        base: SyntheticConfig {
            point_count: SEARCH_POINT_COUNT,
            dimensions: DIMENSIONS,
            seed: SEED,
        },
        cluster_count: 32,
        spread: 0.05,
    })?;
    let params = make_params(16, 200)?;

    let mut group = c.benchmark_group("hnsw_build_clustered");
    group.sample_size(10);
    group.bench_function(
        BenchmarkId::from_parameter(BuildBenchParams {
            point_count: vectors.len(),
            max_connections: params.max_connections(),
            ef_construction: params.ef_construction(),
        }),
        |b| {
            b.iter_batched(
                || params.clone(),
                |cloned| {
                    if let Err(err) = build_index(vectors.rows(), cloned) {
                        panic!("hnsw_build_clustered failed during benchmark: {err}");
                    }
                },
                BatchSize::SmallInput,
            );
        },
    );
    group.finish();
    Ok(())
}

fn hnsw_build_clustered(c: &mut Criterion) {
    if let Err(err) = hnsw_build_clustered_impl(c) {
        panic!("hnsw_build_clustered benchmark setup failed: {err}");
    }
}

#[expect(
    clippy::excessive_nesting,
    reason = "Criterion bench_with_input + b.iter pattern requires deep nesting"
)]
fn hnsw_search_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let data = make_vectors(SEARCH_POINT_COUNT, SEED)?;
    let queries = make_vectors(QUERY_COUNT, SEED.wrapping_add(1))?;
    let index = build_index(data.rows(), make_params(16, 200)?)?;

    let mut group = c.benchmark_group("hnsw_search");
    for &ef_search in EF_SEARCH {
        let Some(ef) = NonZeroUsize::new(ef_search) else {
            continue;
        };
        index.set_ef_search(ef);
        let bench_params = SearchBenchParams {
            ef_search,
            k: K,
            recall: measure_recall(&index, data.rows(), queries.rows())?,
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(&bench_params),
            &queries,
            |b, input| {
                b.iter(|| {
                    for query in input.rows() {
                        if let Err(err) = index.search_knn(query, K) {
                            panic!("hnsw_search failed during benchmark: {err}");
                        }
                    }
                });
            },
        );
    }
    group.finish();
    Ok(())
}

fn hnsw_search(c: &mut Criterion) {
    if let Err(err) = hnsw_search_impl(c) {
        panic!("hnsw_search benchmark setup failed: {err}");
    }
}

mod bench_harness {
    use super::{hnsw_build, hnsw_build_clustered, hnsw_search};
    use criterion::criterion_group;

    criterion_group!(benches, hnsw_build, hnsw_build_clustered, hnsw_search);
}
criterion_main!(bench_harness::benches);
