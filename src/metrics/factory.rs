//! Turns catalog descriptors into live Prometheus collectors.

use std::collections::HashMap;

use prometheus::core::Collector as PrometheusCollector;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts};

use super::catalog::{MetricDescriptor, MetricKind};
use crate::config::MetricsConfig;
use crate::error::{CatalogError, Result};

/// A collector built from one descriptor.
///
/// Clones share the underlying vector, so the copy handed to the registry and
/// the copy kept in the handle record into the same cells.
#[derive(Clone)]
pub enum Collector {
    Counter {
        vec: CounterVec,
        fq_name: String,
        label_names: Vec<String>,
    },
    Distribution {
        vec: HistogramVec,
        fq_name: String,
        label_names: Vec<String>,
        buckets: Vec<f64>,
    },
}

impl Collector {
    pub fn kind(&self) -> MetricKind {
        match self {
            Collector::Counter { .. } => MetricKind::Counter,
            Collector::Distribution { .. } => MetricKind::Distribution,
        }
    }

    /// Name with namespace and subsystem applied.
    pub fn fq_name(&self) -> &str {
        match self {
            Collector::Counter { fq_name, .. } | Collector::Distribution { fq_name, .. } => fq_name,
        }
    }

    pub fn label_names(&self) -> &[String] {
        match self {
            Collector::Counter { label_names, .. }
            | Collector::Distribution { label_names, .. } => label_names,
        }
    }

    /// Effective bucket boundaries; empty for counters.
    pub fn buckets(&self) -> &[f64] {
        match self {
            Collector::Counter { .. } => &[],
            Collector::Distribution { buckets, .. } => buckets,
        }
    }

    /// A registry-ready copy sharing this collector's cells.
    pub fn boxed(&self) -> Box<dyn PrometheusCollector> {
        match self {
            Collector::Counter { vec, .. } => Box::new(vec.clone()),
            Collector::Distribution { vec, .. } => Box::new(vec.clone()),
        }
    }
}

/// Builds the collector for `descriptor`, prefixed by the configured
/// namespace and subsystem.
///
/// Distributions without declared buckets get [`prometheus::DEFAULT_BUCKETS`].
pub fn build(descriptor: &MetricDescriptor, config: &MetricsConfig) -> Result<Collector> {
    let opts = common_opts(descriptor, config);
    let fq_name = opts.fq_name();
    let label_names: Vec<String> = descriptor
        .label_names
        .iter()
        .map(|l| l.to_string())
        .collect();
    let invalid = |source| CatalogError::Collector {
        id: descriptor.id.as_str(),
        source,
    };

    match descriptor.kind {
        MetricKind::Counter => {
            let vec = CounterVec::new(opts, descriptor.label_names).map_err(invalid)?;
            Ok(Collector::Counter {
                vec,
                fq_name,
                label_names,
            })
        }
        MetricKind::Distribution => {
            let buckets = effective_buckets(descriptor).to_vec();
            let opts = HistogramOpts::from(opts).buckets(buckets.clone());
            let vec = HistogramVec::new(opts, descriptor.label_names).map_err(invalid)?;
            Ok(Collector::Distribution {
                vec,
                fq_name,
                label_names,
                buckets,
            })
        }
    }
}

/// Name `build` gives `descriptor` under `config`.
pub fn fq_name(descriptor: &MetricDescriptor, config: &MetricsConfig) -> String {
    common_opts(descriptor, config).fq_name()
}

/// Bucket boundaries `build` uses for `descriptor`; empty for counters.
pub fn effective_buckets(descriptor: &MetricDescriptor) -> &'static [f64] {
    match descriptor.kind {
        MetricKind::Counter => &[],
        MetricKind::Distribution if descriptor.buckets.is_empty() => prometheus::DEFAULT_BUCKETS,
        MetricKind::Distribution => descriptor.buckets,
    }
}

fn common_opts(descriptor: &MetricDescriptor, config: &MetricsConfig) -> Opts {
    let mut opts = Opts::new(descriptor.name, descriptor.description)
        .subsystem(config.subsystem.as_str());
    if let Some(namespace) = &config.namespace {
        opts = opts.namespace(namespace.as_str());
    }
    if !config.const_labels.is_empty() {
        let labels: HashMap<String, String> = config
            .const_labels
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        opts = opts.const_labels(labels);
    }
    opts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::catalog::{catalog, MetricId, TIME_MILLISECOND_BUCKETS};

    fn descriptor(id: MetricId) -> MetricDescriptor {
        catalog().into_iter().find(|d| d.id == id).unwrap()
    }

    #[test]
    fn counters_carry_no_buckets() {
        let collector = build(&descriptor(MetricId::ErrorsByCodeCount), &MetricsConfig::default())
            .expect("catalog descriptor should build");
        assert_eq!(collector.kind(), MetricKind::Counter);
        assert!(collector.buckets().is_empty());
        assert_eq!(collector.label_names(), ["stream", "code"]);
    }

    #[test]
    fn declared_buckets_are_used_verbatim() {
        let collector = build(&descriptor(MetricId::BufferingTimeMs), &MetricsConfig::default())
            .expect("catalog descriptor should build");
        assert_eq!(collector.kind(), MetricKind::Distribution);
        assert_eq!(collector.buckets(), TIME_MILLISECOND_BUCKETS);
    }

    #[test]
    fn empty_buckets_fall_back_to_runtime_default() {
        let collector = build(&descriptor(MetricId::RetriesPerRecord), &MetricsConfig::default())
            .expect("catalog descriptor should build");
        assert_eq!(collector.buckets(), prometheus::DEFAULT_BUCKETS);
    }

    #[test]
    fn names_are_prefixed_by_namespace_and_subsystem() {
        let mut config = MetricsConfig::default();
        assert_eq!(
            build(&descriptor(MetricId::ErrorsTotalCount), &config).unwrap().fq_name(),
            "kinesis_producer_errors_total"
        );

        config.namespace = Some("orders".to_string());
        assert_eq!(
            build(&descriptor(MetricId::ErrorsTotalCount), &config).unwrap().fq_name(),
            "orders_kinesis_producer_errors_total"
        );
    }

    #[test]
    fn name_and_buckets_are_known_without_building() {
        let mut config = MetricsConfig::default();
        config.namespace = Some("orders".to_string());
        for descriptor in catalog() {
            let collector = build(&descriptor, &config).expect("catalog descriptor should build");
            assert_eq!(fq_name(&descriptor, &config), collector.fq_name());
            assert_eq!(effective_buckets(&descriptor), collector.buckets());
        }
    }

    #[test]
    fn invalid_names_are_catalog_defects() {
        let mut bad = descriptor(MetricId::ErrorsTotalCount);
        bad.name = "errors-total";
        assert!(matches!(
            build(&bad, &MetricsConfig::default()),
            Err(CatalogError::Collector { id: "errors-total-count", .. })
        ));
    }
}
