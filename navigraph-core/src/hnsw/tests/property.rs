//! Property tests over randomly generated datasets and parameters.

use std::collections::HashSet;

use proptest::{
    prelude::*,
    prop_assert, prop_assert_eq, proptest,
    test_runner::{Config, TestCaseError},
};

use crate::{
    distance::{DistanceSpace, Metric, Space},
    hnsw::{HnswIndex, HnswParams},
};

use super::fixtures::STRUCTURAL;

#[derive(Clone, Debug)]
struct Fixture {
    metric: Metric,
    vectors: Vec<Vec<f32>>,
    max_connections: usize,
    ef_construction: usize,
    seed: u64,
}

fn component() -> impl Strategy<Value = f32> {
    prop_oneof![-10.0_f32..-0.1, 0.1_f32..10.0]
}

fn metric() -> impl Strategy<Value = Metric> {
    prop_oneof![
        Just(Metric::L2),
        Just(Metric::InnerProduct),
        Just(Metric::Cosine)
    ]
}

/// Draws a pool of distinct vectors and then picks from it with replacement,
/// so duplicates show up regularly.
fn fixture_strategy() -> impl Strategy<Value = Fixture> {
    (1_usize..=6, 1_usize..=8, 0_usize..=24)
        .prop_flat_map(|(dimension, max_connections, ef_slack)| {
            let pool = prop::collection::vec(
                prop::collection::vec(component(), dimension),
                1..=24,
            );
            (
                metric(),
                pool,
                prop::collection::vec(any::<prop::sample::Index>(), 1..=48),
                Just(max_connections),
                Just(max_connections + ef_slack),
                any::<u64>(),
            )
        })
        .prop_map(|(metric, pool, picks, max_connections, ef_construction, seed)| Fixture {
            metric,
            vectors: picks.iter().map(|pick| pick.get(&pool).clone()).collect(),
            max_connections,
            ef_construction,
            seed,
        })
}

fn build(fixture: &Fixture) -> Result<HnswIndex, TestCaseError> {
    let params = HnswParams::new(fixture.max_connections, fixture.ef_construction)
        .map_err(|err| TestCaseError::fail(format!("params: {err}")))?
        .with_rng_seed(fixture.seed);
    let dimension = fixture.vectors[0].len();
    let index = HnswIndex::for_metric(fixture.metric, dimension, fixture.vectors.len(), params)
        .map_err(|err| TestCaseError::fail(format!("index: {err}")))?;
    for vector in &fixture.vectors {
        index
            .insert(vector)
            .map_err(|err| TestCaseError::fail(format!("insert: {err}")))?;
    }
    Ok(index)
}

proptest! {
    #![proptest_config(Config::with_cases(64))]

    #[test]
    fn builds_preserve_graph_structure(fixture in fixture_strategy()) {
        let index = build(&fixture)?;
        prop_assert_eq!(index.len(), fixture.vectors.len());
        let violations = index.invariants().collect_many(STRUCTURAL);
        prop_assert!(violations.is_empty(), "violations: {:?}", violations);
    }

    #[test]
    fn searches_return_sorted_unique_exact_distances(
        fixture in fixture_strategy(),
        k in 1_usize..=12,
        pick in any::<prop::sample::Index>(),
    ) {
        let index = build(&fixture)?;
        let query = pick.get(&fixture.vectors);
        let hits = index
            .search_knn(query, k)
            .map_err(|err| TestCaseError::fail(format!("search: {err}")))?;

        prop_assert!(!hits.is_empty());
        prop_assert!(hits.len() <= k.min(fixture.vectors.len()));
        let unique: HashSet<_> = hits.iter().map(|n| n.id).collect();
        prop_assert_eq!(unique.len(), hits.len());
        for window in hits.windows(2) {
            prop_assert!(window[0] <= window[1], "unsorted: {:?}", hits);
        }
        for hit in &hits {
            let stored = index.vector(hit.id).expect("hit must be stored");
            let expected = index
                .space()
                .distance(query, stored)
                .map_err(|err| TestCaseError::fail(format!("distance: {err}")))?;
            prop_assert_eq!(hit.distance, expected.value());
        }
    }

    #[test]
    fn symmetric_metrics_agree_both_ways(
        (left, right) in (1_usize..=16).prop_flat_map(|dimension| (
            prop::collection::vec(component(), dimension),
            prop::collection::vec(component(), dimension),
        )),
        metric in prop_oneof![Just(Metric::L2), Just(Metric::Cosine)],
    ) {
        let space = Space::new(metric, left.len())
            .map_err(|err| TestCaseError::fail(format!("space: {err}")))?;
        let forward = space
            .distance(&left, &right)
            .map_err(|err| TestCaseError::fail(format!("distance: {err}")))?;
        let backward = space
            .distance(&right, &left)
            .map_err(|err| TestCaseError::fail(format!("distance: {err}")))?;
        prop_assert!(metric.is_symmetric());
        prop_assert_eq!(forward.value(), backward.value());
        prop_assert!(forward.value() >= 0.0);
    }
}
