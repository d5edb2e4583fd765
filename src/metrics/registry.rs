//! Registry seam and the binder that adds collectors to it.

use prometheus::core::Collector as PrometheusCollector;
use prometheus::Registry;

use super::factory::Collector;
use crate::error::RegistrationError;
use crate::utils::logger::Logger;

/// Anything collectors can be registered with for export.
///
/// Implemented for [`prometheus::Registry`]; the process-wide one is
/// [`prometheus::default_registry`].
pub trait MetricsRegistry: Send + Sync {
    fn register(&self, collector: Box<dyn PrometheusCollector>) -> prometheus::Result<()>;
}

impl MetricsRegistry for Registry {
    fn register(&self, collector: Box<dyn PrometheusCollector>) -> prometheus::Result<()> {
        Registry::register(self, collector)
    }
}

/// Registers collectors and reports failures without aborting.
pub struct Binder<'a> {
    registry: &'a dyn MetricsRegistry,
    logger: &'a dyn Logger,
}

impl<'a> Binder<'a> {
    pub fn new(registry: &'a dyn MetricsRegistry, logger: &'a dyn Logger) -> Self {
        Self { registry, logger }
    }

    /// Adds `collector` to the registry under its fully-qualified name.
    ///
    /// A failure is logged and returned; the collector stays usable for
    /// recording either way.
    pub fn bind(&self, collector: &Collector) -> Result<(), RegistrationError> {
        let name = collector.fq_name();
        self.registry.register(collector.boxed()).map_err(|source| {
            let err = RegistrationError::new(name, source);
            self.logger
                .error(&format!("{} could not be registered in Prometheus", name), &err);
            err
        })
    }
}
