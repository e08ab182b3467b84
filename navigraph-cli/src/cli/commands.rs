//! Command implementations and argument parsing for the navigraph CLI.

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use navigraph_core::{HnswError, HnswIndex, HnswParams, Metric, Neighbour};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_DIMENSION: usize = 16;
const DEFAULT_MAX_CONNECTIONS: usize = 16;
const DEFAULT_EF_CONSTRUCTION: usize = 200;
const DEFAULT_SEED: u64 = 47;
const DEFAULT_MAX_ELEMENTS: usize = 10_000;
const DEFAULT_QUERY_POINTS: usize = 1_000;
const DEFAULT_K: usize = 10;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "navigraph", about = "Build and query in-memory HNSW indexes.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Index random vectors and query each one for itself.
    SelfRecall(SelfRecallCommand),
    /// Print the nearest neighbours of a random query.
    Query(QueryCommand),
}

/// Index shape and tuning shared by every command.
#[derive(Debug, Args, Clone)]
pub struct IndexArgs {
    /// Vector dimension.
    #[arg(long = "dim", default_value_t = DEFAULT_DIMENSION)]
    pub dimension: usize,

    /// Neighbour fan-out per upper layer (`M`).
    #[arg(long = "m", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: usize,

    /// Beam width used while inserting.
    #[arg(long, default_value_t = DEFAULT_EF_CONSTRUCTION)]
    pub ef_construction: usize,

    /// Beam width used while querying.
    #[arg(long, default_value = "64")]
    pub ef_search: NonZeroUsize,

    /// Distance metric: l2, ip or cosine.
    #[arg(long, default_value_t = Metric::L2)]
    pub metric: Metric,

    /// Seed for both the dataset and the level sampler.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

impl IndexArgs {
    fn params(&self) -> Result<HnswParams, HnswError> {
        Ok(HnswParams::new(self.max_connections, self.ef_construction)?
            .with_ef_search(self.ef_search)
            .with_rng_seed(self.seed))
    }

    fn empty_index(&self, max_elements: usize) -> Result<HnswIndex, HnswError> {
        HnswIndex::for_metric(self.metric, self.dimension, max_elements, self.params()?)
    }
}

/// Options accepted by the `self-recall` command.
#[derive(Debug, Args, Clone)]
pub struct SelfRecallCommand {
    /// Index configuration.
    #[command(flatten)]
    pub index: IndexArgs,

    /// Number of vectors to generate, which is also the index capacity.
    #[arg(long, default_value_t = DEFAULT_MAX_ELEMENTS)]
    pub max_elements: usize,
}

/// Options accepted by the `query` command.
#[derive(Debug, Args, Clone)]
pub struct QueryCommand {
    /// Index configuration.
    #[command(flatten)]
    pub index: IndexArgs,

    /// Number of vectors to index.
    #[arg(long, default_value_t = DEFAULT_QUERY_POINTS)]
    pub points: usize,

    /// Number of neighbours to return.
    #[arg(long, default_value_t = DEFAULT_K)]
    pub k: usize,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Building or querying the index failed.
    #[error(transparent)]
    Index(#[from] HnswError),
}

impl CliError {
    /// Returns the stable machine-readable code of the underlying failure.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Index(err) => err.code().as_str(),
        }
    }
}

/// Outcome of the `self-recall` command.
#[derive(Debug, Clone)]
pub struct SelfRecallReport {
    /// Metric the index was built with.
    pub metric: Metric,
    /// Number of indexed vectors.
    pub points: usize,
    /// Vector dimension.
    pub dimension: usize,
    /// Fraction of vectors whose nearest neighbour is themselves.
    pub recall: f64,
    /// Wall-clock time spent inserting.
    pub build_time: Duration,
    /// Wall-clock time spent querying.
    pub search_time: Duration,
}

/// Outcome of the `query` command.
#[derive(Debug, Clone)]
pub struct QueryReport {
    /// Metric the index was built with.
    pub metric: Metric,
    /// Randomly drawn query vector.
    pub query: Vec<f32>,
    /// Nearest neighbours, closest first.
    pub neighbours: Vec<Neighbour>,
}

/// Result of any CLI command.
#[derive(Debug, Clone)]
pub enum Report {
    /// Produced by `self-recall`.
    SelfRecall(SelfRecallReport),
    /// Produced by `query`.
    Query(QueryReport),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the index rejects the configuration or an
/// operation fails.
///
/// # Examples
/// ```
/// use clap::Parser;
/// use navigraph_cli::cli::{Cli, Report, run_cli};
///
/// let cli = Cli::parse_from(["navigraph", "query", "--dim", "4", "--points", "50", "--k", "3"]);
/// let Report::Query(report) = run_cli(cli).expect("query must succeed") else {
///     panic!("expected a query report");
/// };
/// assert_eq!(report.neighbours.len(), 3);
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<Report, CliError> {
    let span = Span::current();
    match cli.command {
        Command::SelfRecall(command) => {
            span.record("command", "self-recall");
            run_self_recall(command).map(Report::SelfRecall)
        }
        Command::Query(command) => {
            span.record("command", "query");
            run_query(command).map(Report::Query)
        }
    }
}

#[instrument(
    name = "cli.self_recall",
    err,
    skip(command),
    fields(points = command.max_elements, dim = command.index.dimension, metric = %command.index.metric),
)]
pub(super) fn run_self_recall(command: SelfRecallCommand) -> Result<SelfRecallReport, CliError> {
    let SelfRecallCommand {
        index: args,
        max_elements,
    } = command;
    let index = args.empty_index(max_elements)?;
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let vectors = uniform_vectors(&mut rng, max_elements, args.dimension);

    let started = Instant::now();
    let ids = index.insert_batch(&vectors)?;
    let build_time = started.elapsed();
    info!(points = ids.len(), elapsed_ms = build_time.as_millis(), "index built");

    let started = Instant::now();
    let results = index.search_knn_batch(&vectors, 1)?;
    let search_time = started.elapsed();

    let hits = ids
        .iter()
        .zip(&results)
        .filter(|(id, found)| found.first().is_some_and(|n| n.id == **id))
        .count();
    let recall = hits as f64 / max_elements as f64;
    info!(recall, elapsed_ms = search_time.as_millis(), "self queries completed");

    Ok(SelfRecallReport {
        metric: args.metric,
        points: max_elements,
        dimension: args.dimension,
        recall,
        build_time,
        search_time,
    })
}

#[instrument(
    name = "cli.query",
    err,
    skip(command),
    fields(points = command.points, k = command.k, metric = %command.index.metric),
)]
pub(super) fn run_query(command: QueryCommand) -> Result<QueryReport, CliError> {
    let QueryCommand {
        index: args,
        points,
        k,
    } = command;
    let index = args.empty_index(points)?;
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let vectors = uniform_vectors(&mut rng, points, args.dimension);
    index.insert_batch(&vectors)?;

    let query = random_vector(&mut rng, args.dimension);
    let neighbours = index.search_knn(&query, k)?;
    info!(found = neighbours.len(), "query completed");
    Ok(QueryReport {
        metric: args.metric,
        query,
        neighbours,
    })
}

fn random_vector(rng: &mut SmallRng, dimension: usize) -> Vec<f32> {
    (0..dimension).map(|_| rng.r#gen::<f32>()).collect()
}

/// Uniform `[0, 1)` vectors; the first `count` draws of a seeded RNG.
pub(super) fn uniform_vectors(rng: &mut SmallRng, count: usize, dimension: usize) -> Vec<Vec<f32>> {
    (0..count).map(|_| random_vector(rng, dimension)).collect()
}

/// Renders `report` to `writer` as plain text.
///
/// # Errors
/// Returns [`io::Error`] if writing fails.
pub fn render_report(report: &Report, mut writer: impl Write) -> io::Result<()> {
    match report {
        Report::SelfRecall(report) => {
            writeln!(writer, "metric: {}", report.metric)?;
            writeln!(writer, "points: {}", report.points)?;
            writeln!(writer, "dimension: {}", report.dimension)?;
            writeln!(writer, "recall: {:.4}", report.recall)?;
            writeln!(writer, "build: {:.3}s", report.build_time.as_secs_f64())?;
            writeln!(writer, "search: {:.3}s", report.search_time.as_secs_f64())?;
        }
        Report::Query(report) => {
            writeln!(writer, "metric: {}", report.metric)?;
            writeln!(writer, "neighbours: {}", report.neighbours.len())?;
            for neighbour in &report.neighbours {
                writeln!(writer, "{}\t{}", neighbour.id, neighbour.distance)?;
            }
        }
    }
    Ok(())
}
