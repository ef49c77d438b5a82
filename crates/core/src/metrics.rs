//! Prometheus metrics for the reconciliation engine.
//!
//! Collectors are process-wide statics; a host registers them once with
//! `all_metrics()`.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Search
// =============================================================================

/// Catalog searches by outcome.
pub static SEARCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shelfsync_searches_total", "Total catalog searches"),
        &["outcome"], // "applied", "empty", "stale", "failed"
    )
    .unwrap()
});

/// Results per applied search.
pub static SEARCH_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "shelfsync_search_results",
            "Number of normalized results per applied search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 20.0, 40.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Save
// =============================================================================

/// Save requests by outcome.
pub static SAVES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shelfsync_saves_total", "Total save requests"),
        // "saved", "already_saved", "not_found", "unauthenticated", "pending", "failed"
        &["outcome"],
    )
    .unwrap()
});

// =============================================================================
// Durable cache
// =============================================================================

/// Saved-id cache persists by result.
pub static CACHE_PERSISTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shelfsync_cache_persists_total",
            "Saved-id cache persists at session end",
        ),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// All collectors, for registration with a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SEARCHES.clone()),
        Box::new(SEARCH_RESULTS.clone()),
        Box::new(SAVES.clone()),
        Box::new(CACHE_PERSISTS.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        SEARCHES.with_label_values(&["applied"]).inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "shelfsync_searches_total"));
    }
}
