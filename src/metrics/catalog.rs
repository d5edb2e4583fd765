//! Declarative catalog of every metric the producer emits.

use std::collections::HashSet;
use std::fmt;

use crate::error::{CatalogError, Result};

/// Millisecond buckets for buffering and request latencies (10µs to 60s).
pub const TIME_MILLISECOND_BUCKETS: &[f64] = &[
    0.01, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 100.0, 1000.0, 10000.0, 60000.0,
];

/// Buckets for byte sizes and record counts (1 to 4MiB).
pub const SIZE_BYTE_BUCKETS: &[f64] = &[
    1.0, 16.0, 64.0, 256.0, 512.0, 1024.0, 16384.0, 65536.0, 262144.0, 1048576.0, 4194304.0,
];

/// Stable key tying a descriptor to its field on [`ProducerMetrics`](super::ProducerMetrics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricId {
    UserRecordsAcceptedCount,
    UserRecordsAcceptedBytes,
    KinesisRecordsPutCount,
    KinesisRecordsPutBytes,
    ErrorsByCodeCount,
    ErrorsTotalCount,
    RetriesPerRecord,
    BufferingTimeMs,
    RequestTimeMs,
    UserRecordsPerKinesisRecord,
    KinesisRecordsPerRequest,
}

impl MetricId {
    pub const ALL: [MetricId; 11] = [
        MetricId::UserRecordsAcceptedCount,
        MetricId::UserRecordsAcceptedBytes,
        MetricId::KinesisRecordsPutCount,
        MetricId::KinesisRecordsPutBytes,
        MetricId::ErrorsByCodeCount,
        MetricId::ErrorsTotalCount,
        MetricId::RetriesPerRecord,
        MetricId::BufferingTimeMs,
        MetricId::RequestTimeMs,
        MetricId::UserRecordsPerKinesisRecord,
        MetricId::KinesisRecordsPerRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricId::UserRecordsAcceptedCount => "user-records-accepted-count",
            MetricId::UserRecordsAcceptedBytes => "user-records-accepted-bytes",
            MetricId::KinesisRecordsPutCount => "kinesis-records-put-count",
            MetricId::KinesisRecordsPutBytes => "kinesis-records-put-bytes",
            MetricId::ErrorsByCodeCount => "errors-by-code-count",
            MetricId::ErrorsTotalCount => "errors-total-count",
            MetricId::RetriesPerRecord => "retries-per-record",
            MetricId::BufferingTimeMs => "buffering-time-ms",
            MetricId::RequestTimeMs => "request-time-ms",
            MetricId::UserRecordsPerKinesisRecord => "user-records-per-kinesis-record",
            MetricId::KinesisRecordsPerRequest => "kinesis-records-per-request",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of collector a descriptor turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Monotonic count of discrete events.
    Counter,
    /// Bucketed histogram of observed values.
    Distribution,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Distribution => "distribution",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A self-contained metric declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDescriptor {
    pub id: MetricId,
    /// Name before the namespace/subsystem prefix is applied.
    pub name: &'static str,
    pub description: &'static str,
    pub kind: MetricKind,
    pub label_names: &'static [&'static str],
    /// Distributions only. Empty means the collector runtime's default buckets.
    pub buckets: &'static [f64],
}

/// Returns the full metric catalog in registration order.
pub fn catalog() -> Vec<MetricDescriptor> {
    vec![
        MetricDescriptor {
            id: MetricId::UserRecordsAcceptedCount,
            name: "user_records_put_total",
            description: "Count of how many logical user records were received by the KPL core for put operations.",
            kind: MetricKind::Counter,
            label_names: &["stream"],
            buckets: &[],
        },
        MetricDescriptor {
            id: MetricId::UserRecordsAcceptedBytes,
            name: "user_records_data_put_bytes",
            description: "Bytes in the logical user records were received by the KPL core for put operations.",
            kind: MetricKind::Distribution,
            label_names: &["stream"],
            buckets: SIZE_BYTE_BUCKETS,
        },
        MetricDescriptor {
            id: MetricId::KinesisRecordsPutCount,
            name: "kinesis_records_put_total",
            description: "Count of how many Kinesis Data Streams records were put successfully (each Kinesis Data Streams record can contain multiple user records).",
            kind: MetricKind::Counter,
            label_names: &["stream", "shard"],
            buckets: &[],
        },
        MetricDescriptor {
            id: MetricId::KinesisRecordsPutBytes,
            name: "kinesis_records_data_put_bytes",
            description: "Bytes in the Kinesis Data Streams records.",
            kind: MetricKind::Distribution,
            label_names: &["stream"],
            buckets: SIZE_BYTE_BUCKETS,
        },
        MetricDescriptor {
            id: MetricId::ErrorsByCodeCount,
            name: "errors_by_code_total",
            description: "Count of each type of error code.",
            kind: MetricKind::Counter,
            label_names: &["stream", "code"],
            buckets: &[],
        },
        MetricDescriptor {
            id: MetricId::ErrorsTotalCount,
            name: "errors_total",
            description: "Count of all errors, triggered by the same errors as errors_by_code_total without distinguishing between codes.",
            kind: MetricKind::Counter,
            label_names: &["stream"],
            buckets: &[],
        },
        MetricDescriptor {
            id: MetricId::RetriesPerRecord,
            name: "retries_per_record",
            description: "Number of retries performed per Kinesis record. Zero is emitted for records that succeed in one try.",
            kind: MetricKind::Distribution,
            label_names: &["stream"],
            buckets: &[],
        },
        MetricDescriptor {
            id: MetricId::BufferingTimeMs,
            name: "buffering_time_milliseconds",
            description: "The time between a user record arriving at the KPL and leaving for the backend.",
            kind: MetricKind::Distribution,
            label_names: &["stream"],
            buckets: TIME_MILLISECOND_BUCKETS,
        },
        MetricDescriptor {
            id: MetricId::RequestTimeMs,
            name: "request_time_milliseconds",
            description: "The time it takes to perform PutRecords requests.",
            kind: MetricKind::Distribution,
            label_names: &["stream"],
            buckets: TIME_MILLISECOND_BUCKETS,
        },
        MetricDescriptor {
            id: MetricId::UserRecordsPerKinesisRecord,
            name: "user_records_per_kinesis_record",
            description: "The number of logical user records aggregated into a single Kinesis Data Streams record.",
            kind: MetricKind::Distribution,
            label_names: &["stream"],
            buckets: SIZE_BYTE_BUCKETS,
        },
        MetricDescriptor {
            id: MetricId::KinesisRecordsPerRequest,
            name: "kinesis_records_per_put_records_request",
            description: "The number of Kinesis Data Streams records aggregated into a single PutRecords request.",
            kind: MetricKind::Distribution,
            label_names: &["stream"],
            buckets: SIZE_BYTE_BUCKETS,
        },
    ]
}

/// Checks the catalog for internal inconsistencies.
///
/// Rejects duplicate ids and names, empty help text, repeated label names,
/// buckets on counters, and bucket boundaries that are non-finite,
/// non-positive or not strictly increasing.
pub fn validate(descriptors: &[MetricDescriptor]) -> Result<()> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();

    for descriptor in descriptors {
        let id = descriptor.id.as_str();
        if !ids.insert(descriptor.id) {
            return Err(CatalogError::DuplicateId(id));
        }
        if !names.insert(descriptor.name) {
            return Err(CatalogError::DuplicateName(descriptor.name));
        }
        if descriptor.description.trim().is_empty() {
            return Err(CatalogError::EmptyDescription(id));
        }

        let mut labels = HashSet::new();
        for label in descriptor.label_names {
            if !labels.insert(*label) {
                return Err(CatalogError::DuplicateLabel { id, label });
            }
        }

        let buckets = descriptor.buckets;
        if descriptor.kind == MetricKind::Counter && !buckets.is_empty() {
            return Err(CatalogError::BucketsOnCounter(id));
        }
        if buckets.iter().any(|&b| !b.is_finite() || b <= 0.0)
            || !buckets.windows(2).all(|w| w[0] < w[1])
        {
            return Err(CatalogError::InvalidBuckets(id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(id: MetricId, name: &'static str) -> MetricDescriptor {
        MetricDescriptor {
            id,
            name,
            description: "test counter",
            kind: MetricKind::Counter,
            label_names: &["stream"],
            buckets: &[],
        }
    }

    #[test]
    fn shipped_catalog_is_valid() {
        validate(&catalog()).expect("shipped catalog should validate");
    }

    #[test]
    fn catalog_covers_every_id_once_in_order() {
        let ids: Vec<MetricId> = catalog().iter().map(|d| d.id).collect();
        assert_eq!(ids, MetricId::ALL.to_vec());
    }

    #[test]
    fn catalog_is_deterministic() {
        assert_eq!(catalog(), catalog());
    }

    #[test]
    fn label_schemas_match_the_producer_call_sites() {
        let catalog = catalog();
        let labels = |id: MetricId| {
            catalog
                .iter()
                .find(|d| d.id == id)
                .map(|d| d.label_names)
                .unwrap()
        };
        assert_eq!(labels(MetricId::KinesisRecordsPutCount), ["stream", "shard"]);
        assert_eq!(labels(MetricId::ErrorsByCodeCount), ["stream", "code"]);
        assert_eq!(labels(MetricId::BufferingTimeMs), ["stream"]);
    }

    #[test]
    fn only_retries_fall_back_to_default_buckets() {
        let defaulted: Vec<MetricId> = catalog()
            .iter()
            .filter(|d| d.kind == MetricKind::Distribution && d.buckets.is_empty())
            .map(|d| d.id)
            .collect();
        assert_eq!(defaulted, vec![MetricId::RetriesPerRecord]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let descriptors = vec![
            counter(MetricId::ErrorsTotalCount, "a_total"),
            counter(MetricId::ErrorsTotalCount, "b_total"),
        ];
        assert!(matches!(
            validate(&descriptors),
            Err(CatalogError::DuplicateId("errors-total-count"))
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let descriptors = vec![
            counter(MetricId::ErrorsTotalCount, "a_total"),
            counter(MetricId::ErrorsByCodeCount, "a_total"),
        ];
        assert!(matches!(
            validate(&descriptors),
            Err(CatalogError::DuplicateName("a_total"))
        ));
    }

    #[test]
    fn rejects_repeated_labels_and_empty_help() {
        let mut repeated = counter(MetricId::ErrorsByCodeCount, "a_total");
        repeated.label_names = &["stream", "stream"];
        assert!(matches!(
            validate(&[repeated]),
            Err(CatalogError::DuplicateLabel { label: "stream", .. })
        ));

        let mut silent = counter(MetricId::ErrorsTotalCount, "b_total");
        silent.description = "  ";
        assert!(matches!(
            validate(&[silent]),
            Err(CatalogError::EmptyDescription(_))
        ));
    }

    #[test]
    fn rejects_bad_buckets() {
        let mut on_counter = counter(MetricId::ErrorsTotalCount, "a_total");
        on_counter.buckets = &[1.0, 2.0];
        assert!(matches!(
            validate(&[on_counter]),
            Err(CatalogError::BucketsOnCounter(_))
        ));

        let cases: [&'static [f64]; 4] =
            [&[1.0, 1.0], &[2.0, 1.0], &[0.0, 1.0], &[1.0, f64::INFINITY]];
        for buckets in cases {
            let descriptor = MetricDescriptor {
                kind: MetricKind::Distribution,
                buckets,
                ..counter(MetricId::RequestTimeMs, "request_time")
            };
            assert!(
                matches!(validate(&[descriptor]), Err(CatalogError::InvalidBuckets(_))),
                "{:?} should be rejected",
                buckets
            );
        }
    }
}
