//! Benchmark support crate for navigraph.
//!
//! Provides seeded synthetic datasets, an exhaustive-search oracle and an
//! integer recall scorer used by the Criterion benchmarks for index build
//! and query throughput.

pub mod error;
pub mod params;
pub mod recall;
pub mod source;
