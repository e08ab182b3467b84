//! Optional counters emitted through the `metrics` facade.

#[cfg(feature = "metrics")]
pub(crate) fn record_insert() {
    metrics::counter!("hnsw_inserts_total").increment(1);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_insert() {}

#[cfg(feature = "metrics")]
pub(crate) fn record_search() {
    metrics::counter!("hnsw_searches_total").increment(1);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_search() {}

#[cfg(feature = "metrics")]
pub(crate) fn record_prune(evicted: usize) {
    metrics::counter!("hnsw_neighbour_prunes_total").increment(evicted as u64);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_prune(_evicted: usize) {}
