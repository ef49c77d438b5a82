//! Process metrics registry.
//!
//! Holds the engine collectors from `shelfsync_core::metrics` plus a
//! command counter for the shell itself.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::warn;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Shell commands executed, by command name.
pub static COMMANDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shelfsync_shell_commands_total", "Shell commands executed"),
        &["command"],
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    let collectors = std::iter::once(
        Box::new(COMMANDS_TOTAL.clone()) as Box<dyn prometheus::core::Collector>
    )
    .chain(shelfsync_core::metrics::all_metrics());

    for metric in collectors {
        if let Err(e) = registry.register(metric) {
            warn!("Failed to register metric: {}", e);
        }
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics output is not UTF-8")
}
