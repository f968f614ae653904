//! Shared application state.
//!
//! Owns the metrics registry and the request counter. Both routers get a
//! clone of the same state, so the greeting handler and the metrics renderer
//! see one counter without any process-wide global.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use promhello_core::error::Result;
use promhello_core::metrics::{Counter, Registry};

use crate::config::ServiceConfig;

pub const REQUESTS_TOTAL: &str = "app_requests_total";
const REQUESTS_TOTAL_HELP: &str = "Total number of requests";

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    registry: Registry,
    requests: Arc<Counter>,
    draining: AtomicBool,
}

impl AppState {
    /// Build state and register the service metrics.
    pub fn new(cfg: ServiceConfig) -> Result<Self> {
        let registry = Registry::with_process_collector()?;
        let requests = registry.register_counter(REQUESTS_TOTAL, REQUESTS_TOTAL_HELP)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                requests,
                draining: AtomicBool::new(false),
            }),
        })
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn requests(&self) -> &Counter {
        &self.inner.requests
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }
}
