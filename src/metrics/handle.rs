//! Typed handle over the producer's collectors.
//!
//! Every field is populated once at startup and never replaced. Label arity is
//! part of each field's type, so call sites cannot pass the wrong number of
//! label values.

use std::fmt;

use prometheus::{CounterVec, HistogramVec};

use super::catalog::{MetricDescriptor, MetricId, MetricKind};
use super::factory::Collector;
use crate::error::{CatalogError, Result};

/// Counter partitioned by `N` label values.
#[derive(Clone)]
pub struct LabeledCounter<const N: usize> {
    vec: CounterVec,
}

impl<const N: usize> LabeledCounter<N> {
    /// Increment by 1.
    #[inline]
    pub fn inc(&self, labels: [&str; N]) {
        self.vec.with_label_values(&labels).inc();
    }

    /// Increment by a non-negative amount.
    #[inline]
    pub fn inc_by(&self, v: f64, labels: [&str; N]) {
        self.vec.with_label_values(&labels).inc_by(v);
    }

    /// Current value for one label tuple (0 if never touched).
    pub fn get(&self, labels: [&str; N]) -> f64 {
        self.vec.with_label_values(&labels).get()
    }
}

/// Histogram partitioned by `N` label values.
#[derive(Clone)]
pub struct LabeledDistribution<const N: usize> {
    vec: HistogramVec,
    buckets: Vec<f64>,
}

impl<const N: usize> LabeledDistribution<N> {
    #[inline]
    pub fn observe(&self, v: f64, labels: [&str; N]) {
        self.vec.with_label_values(&labels).observe(v);
    }

    pub fn sample_count(&self, labels: [&str; N]) -> u64 {
        self.vec.with_label_values(&labels).get_sample_count()
    }

    pub fn sample_sum(&self, labels: [&str; N]) -> f64 {
        self.vec.with_label_values(&labels).get_sample_sum()
    }

    /// Upper bounds of the buckets in effect, excluding `+Inf`.
    pub fn buckets(&self) -> &[f64] {
        &self.buckets
    }
}

/// Live collectors for every metric the producer records.
#[derive(Clone)]
pub struct ProducerMetrics {
    pub user_records_accepted: LabeledCounter<1>,
    pub user_records_accepted_bytes: LabeledDistribution<1>,
    pub kinesis_records_put: LabeledCounter<2>,
    pub kinesis_records_put_bytes: LabeledDistribution<1>,
    pub errors_by_code: LabeledCounter<2>,
    pub errors_total: LabeledCounter<1>,
    pub retries_per_record: LabeledDistribution<1>,
    pub buffering_time_ms: LabeledDistribution<1>,
    pub request_time_ms: LabeledDistribution<1>,
    pub user_records_per_kinesis_record: LabeledDistribution<1>,
    pub kinesis_records_per_request: LabeledDistribution<1>,
}

impl fmt::Debug for ProducerMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProducerMetrics").finish_non_exhaustive()
    }
}

fn counter<const N: usize>(id: MetricId, collector: Collector) -> Result<LabeledCounter<N>> {
    check_arity::<N>(id, &collector)?;
    match collector {
        Collector::Counter { vec, .. } => Ok(LabeledCounter { vec }),
        other => Err(kind_mismatch(id, MetricKind::Counter, other.kind())),
    }
}

fn distribution<const N: usize>(
    id: MetricId,
    collector: Collector,
) -> Result<LabeledDistribution<N>> {
    check_arity::<N>(id, &collector)?;
    match collector {
        Collector::Distribution { vec, buckets, .. } => Ok(LabeledDistribution { vec, buckets }),
        other => Err(kind_mismatch(id, MetricKind::Distribution, other.kind())),
    }
}

fn check_arity<const N: usize>(id: MetricId, collector: &Collector) -> Result<()> {
    let declared = collector.label_names().len();
    if declared != N {
        return Err(CatalogError::LabelArity {
            id: id.as_str(),
            expected: N,
            declared,
        });
    }
    Ok(())
}

fn kind_mismatch(id: MetricId, expected: MetricKind, found: MetricKind) -> CatalogError {
    CatalogError::KindMismatch {
        id: id.as_str(),
        expected: expected.as_str(),
        found: found.as_str(),
    }
}

/// Collects one collector per id and turns them into a [`ProducerMetrics`].
#[derive(Default)]
pub struct HandleBuilder {
    user_records_accepted: Option<LabeledCounter<1>>,
    user_records_accepted_bytes: Option<LabeledDistribution<1>>,
    kinesis_records_put: Option<LabeledCounter<2>>,
    kinesis_records_put_bytes: Option<LabeledDistribution<1>>,
    errors_by_code: Option<LabeledCounter<2>>,
    errors_total: Option<LabeledCounter<1>>,
    retries_per_record: Option<LabeledDistribution<1>>,
    buffering_time_ms: Option<LabeledDistribution<1>>,
    request_time_ms: Option<LabeledDistribution<1>>,
    user_records_per_kinesis_record: Option<LabeledDistribution<1>>,
    kinesis_records_per_request: Option<LabeledDistribution<1>>,
}

impl HandleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `collector` into the field keyed by `descriptor.id`.
    pub fn set(&mut self, descriptor: &MetricDescriptor, collector: Collector) -> Result<()> {
        let id = descriptor.id;
        let already_set = match id {
            MetricId::UserRecordsAcceptedCount => {
                self.user_records_accepted.replace(counter(id, collector)?).is_some()
            }
            MetricId::UserRecordsAcceptedBytes => self
                .user_records_accepted_bytes
                .replace(distribution(id, collector)?)
                .is_some(),
            MetricId::KinesisRecordsPutCount => {
                self.kinesis_records_put.replace(counter(id, collector)?).is_some()
            }
            MetricId::KinesisRecordsPutBytes => self
                .kinesis_records_put_bytes
                .replace(distribution(id, collector)?)
                .is_some(),
            MetricId::ErrorsByCodeCount => {
                self.errors_by_code.replace(counter(id, collector)?).is_some()
            }
            MetricId::ErrorsTotalCount => {
                self.errors_total.replace(counter(id, collector)?).is_some()
            }
            MetricId::RetriesPerRecord => self
                .retries_per_record
                .replace(distribution(id, collector)?)
                .is_some(),
            MetricId::BufferingTimeMs => self
                .buffering_time_ms
                .replace(distribution(id, collector)?)
                .is_some(),
            MetricId::RequestTimeMs => self
                .request_time_ms
                .replace(distribution(id, collector)?)
                .is_some(),
            MetricId::UserRecordsPerKinesisRecord => self
                .user_records_per_kinesis_record
                .replace(distribution(id, collector)?)
                .is_some(),
            MetricId::KinesisRecordsPerRequest => self
                .kinesis_records_per_request
                .replace(distribution(id, collector)?)
                .is_some(),
        };
        if already_set {
            return Err(CatalogError::DuplicateId(id.as_str()));
        }
        Ok(())
    }

    /// Fails if any field was never set.
    pub fn finish(self) -> Result<ProducerMetrics> {
        fn take<T>(slot: Option<T>, id: MetricId) -> Result<T> {
            slot.ok_or(CatalogError::MissingMetric(id.as_str()))
        }

        Ok(ProducerMetrics {
            user_records_accepted: take(
                self.user_records_accepted,
                MetricId::UserRecordsAcceptedCount,
            )?,
            user_records_accepted_bytes: take(
                self.user_records_accepted_bytes,
                MetricId::UserRecordsAcceptedBytes,
            )?,
            kinesis_records_put: take(self.kinesis_records_put, MetricId::KinesisRecordsPutCount)?,
            kinesis_records_put_bytes: take(
                self.kinesis_records_put_bytes,
                MetricId::KinesisRecordsPutBytes,
            )?,
            errors_by_code: take(self.errors_by_code, MetricId::ErrorsByCodeCount)?,
            errors_total: take(self.errors_total, MetricId::ErrorsTotalCount)?,
            retries_per_record: take(self.retries_per_record, MetricId::RetriesPerRecord)?,
            buffering_time_ms: take(self.buffering_time_ms, MetricId::BufferingTimeMs)?,
            request_time_ms: take(self.request_time_ms, MetricId::RequestTimeMs)?,
            user_records_per_kinesis_record: take(
                self.user_records_per_kinesis_record,
                MetricId::UserRecordsPerKinesisRecord,
            )?,
            kinesis_records_per_request: take(
                self.kinesis_records_per_request,
                MetricId::KinesisRecordsPerRequest,
            )?,
        })
    }
}

/// Builds the handle from descriptors and the collectors produced for them,
/// paired by position.
pub fn assemble(
    descriptors: &[MetricDescriptor],
    collectors: Vec<Collector>,
) -> Result<ProducerMetrics> {
    debug_assert_eq!(descriptors.len(), collectors.len());
    let mut builder = HandleBuilder::new();
    for (descriptor, collector) in descriptors.iter().zip(collectors) {
        builder.set(descriptor, collector)?;
    }
    builder.finish()
}
