//! Integration tests for the HNSW index.

mod property;
