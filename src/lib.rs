//! Library exports for kinesis-producer-metrics, shared between the binary and tests.

pub mod config;
pub mod error;
pub mod metrics;
pub mod utils;

pub use error::{CatalogError, RegistrationError};
pub use metrics::{register_global, register_metrics, ProducerMetrics, Registration};
