use std::sync::Mutex;

use kinesis_producer_metrics::config::MetricsConfig;
use kinesis_producer_metrics::metrics::register_metrics;
use kinesis_producer_metrics::utils::Logger;
use kinesis_producer_metrics::Registration;
use prometheus::Registry;

/// Logger that keeps every reported failure for assertions.
#[derive(Default)]
pub struct RecordingLogger {
    pub entries: Mutex<Vec<(String, String)>>,
}

impl RecordingLogger {
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .expect("logger mutex poisoned")
            .iter()
            .map(|(message, _)| message.clone())
            .collect()
    }
}

impl Logger for RecordingLogger {
    fn error(&self, message: &str, cause: &dyn std::error::Error) {
        self.entries
            .lock()
            .expect("logger mutex poisoned")
            .push((message.to_string(), cause.to_string()));
    }
}

/// Registers the shipped catalog against `registry` with default naming.
pub fn register(registry: &Registry, logger: &RecordingLogger) -> Registration {
    register_metrics(&MetricsConfig::default(), registry, logger)
        .expect("shipped catalog should register")
}

/// Cumulative count of the bucket with upper bound `le` for a single-series histogram.
pub fn cumulative_count(registry: &Registry, name: &str, le: f64) -> u64 {
    let families = registry.gather();
    let family = families
        .iter()
        .find(|f| f.get_name() == name)
        .unwrap_or_else(|| panic!("{} not exported", name));
    let histogram = family.get_metric()[0].get_histogram();
    histogram
        .get_bucket()
        .iter()
        .find(|b| b.get_upper_bound() == le)
        .map(|b| b.get_cumulative_count())
        .unwrap_or_else(|| panic!("{} has no bucket le={}", name, le))
}
