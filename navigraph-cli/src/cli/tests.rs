//! Unit tests for the CLI commands.

use super::commands::{run_query, run_self_recall, uniform_vectors};
use super::{Cli, CliError, Command, QueryReport, Report, SelfRecallReport, render_report, run_cli};

use std::time::Duration;

use clap::Parser;
use navigraph_core::{HnswError, Metric, Neighbour};
use rand::{SeedableRng, rngs::SmallRng};
use rstest::rstest;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("navigraph").chain(args.iter().copied()))
        .expect("arguments must parse")
}

#[test]
fn self_recall_defaults_match_the_demo() {
    let cli = parse(&["self-recall"]);
    let Command::SelfRecall(command) = cli.command else {
        panic!("expected self-recall");
    };
    assert_eq!(command.max_elements, 10_000);
    assert_eq!(command.index.dimension, 16);
    assert_eq!(command.index.max_connections, 16);
    assert_eq!(command.index.ef_construction, 200);
    assert_eq!(command.index.ef_search.get(), 64);
    assert_eq!(command.index.metric, Metric::L2);
    assert_eq!(command.index.seed, 47);
}

#[rstest]
#[case("l2", Metric::L2)]
#[case("ip", Metric::InnerProduct)]
#[case("cosine", Metric::Cosine)]
fn metric_flag_parses(#[case] raw: &str, #[case] expected: Metric) {
    let cli = parse(&["query", "--metric", raw]);
    let Command::Query(command) = cli.command else {
        panic!("expected query");
    };
    assert_eq!(command.index.metric, expected);
}

#[rstest]
#[case::unknown_metric(&["query", "--metric", "hamming"])]
#[case::zero_ef_search(&["query", "--ef-search", "0"])]
fn invalid_flags_are_rejected(#[case] args: &[&str]) {
    let result = Cli::try_parse_from(std::iter::once("navigraph").chain(args.iter().copied()));
    assert!(result.is_err());
}

#[rstest]
#[case::l2("l2")]
#[case::cosine("cosine")]
fn self_recall_finds_stored_vectors(#[case] metric: &str) {
    let cli = parse(&[
        "self-recall",
        "--max-elements",
        "400",
        "--dim",
        "8",
        "--ef-construction",
        "64",
        "--metric",
        metric,
    ]);
    let Command::SelfRecall(command) = cli.command else {
        panic!("expected self-recall");
    };
    let report = run_self_recall(command).expect("self recall must succeed");
    assert_eq!(report.points, 400);
    assert!(report.recall > 0.95, "recall {} too low", report.recall);
}

#[test]
fn query_returns_sorted_neighbours() {
    let cli = parse(&["query", "--dim", "6", "--points", "200", "--k", "5"]);
    let Command::Query(command) = cli.command else {
        panic!("expected query");
    };
    let report = run_query(command).expect("query must succeed");
    assert_eq!(report.query.len(), 6);
    assert_eq!(report.neighbours.len(), 5);
    assert!(report.neighbours.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn query_caps_results_at_the_index_size() {
    let cli = parse(&["query", "--dim", "3", "--points", "4", "--k", "10"]);
    let Report::Query(report) = run_cli(cli).expect("query must succeed") else {
        panic!("expected a query report");
    };
    assert_eq!(report.neighbours.len(), 4);
}

#[rstest]
#[case::zero_m(&["query", "--m", "0"], "HNSW_INVALID_PARAMETERS")]
#[case::ef_below_m(&["query", "--m", "8", "--ef-construction", "4"], "HNSW_INVALID_PARAMETERS")]
#[case::zero_points(&["query", "--points", "0"], "HNSW_INVALID_PARAMETERS")]
#[case::zero_dimension(&["self-recall", "--dim", "0"], "HNSW_INVALID_PARAMETERS")]
fn invalid_configurations_surface_index_errors(#[case] args: &[&str], #[case] code: &str) {
    let err = run_cli(parse(args)).expect_err("configuration must be rejected");
    assert!(matches!(
        err,
        CliError::Index(HnswError::InvalidParameters { .. })
    ));
    assert_eq!(err.code(), code);
}

#[test]
fn uniform_vectors_are_reproducible() {
    let first = uniform_vectors(&mut SmallRng::seed_from_u64(9), 5, 3);
    let second = uniform_vectors(&mut SmallRng::seed_from_u64(9), 5, 3);
    assert_eq!(first, second);
    assert!(
        first
            .iter()
            .flatten()
            .all(|value| (0.0..1.0).contains(value))
    );
}

#[test]
fn render_self_recall_report() {
    let report = Report::SelfRecall(SelfRecallReport {
        metric: Metric::Cosine,
        points: 10,
        dimension: 4,
        recall: 1.0,
        build_time: Duration::from_millis(1500),
        search_time: Duration::from_millis(250),
    });
    let mut buffer = Vec::new();
    render_report(&report, &mut buffer).expect("render must succeed");
    let text = String::from_utf8(buffer).expect("utf-8 output");
    assert_eq!(
        text,
        "metric: cosine\npoints: 10\ndimension: 4\nrecall: 1.0000\nbuild: 1.500s\nsearch: 0.250s\n"
    );
}

#[test]
fn render_query_report() {
    let report = Report::Query(QueryReport {
        metric: Metric::L2,
        query: vec![0.0, 0.0],
        neighbours: vec![
            Neighbour { id: 3, distance: 0.5 },
            Neighbour { id: 1, distance: 2.0 },
        ],
    });
    let mut buffer = Vec::new();
    render_report(&report, &mut buffer).expect("render must succeed");
    let text = String::from_utf8(buffer).expect("utf-8 output");
    assert_eq!(text, "metric: l2\nneighbours: 2\n3\t0.5\n1\t2\n");
}
