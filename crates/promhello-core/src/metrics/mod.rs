//! In-process metrics registry.
//!
//! Families are kept in registration order so that rendering is
//! deterministic. Values live in atomics: incrementing never takes the
//! registry lock, and the lock is only written while registering.
//! Sampled families are read at render time instead.

mod process;
mod text;
mod value;

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{PromHelloError, Result};

pub use process::{
    PROCESS_CPU_SECONDS, PROCESS_MAX_FDS, PROCESS_OPEN_FDS, PROCESS_RESIDENT_MEMORY,
    PROCESS_START_TIME, PROCESS_VIRTUAL_MEMORY,
};
pub use text::{is_valid_metric_name, CONTENT_TYPE};
pub use value::{Counter, Gauge};

/// Exposition type of a sampled family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

type Sampler = Arc<dyn Fn() -> Option<f64> + Send + Sync>;

enum Metric {
    Counter(Arc<Counter>),
    Gauge(Arc<Gauge>),
    Sampled { kind: MetricKind, sample: Sampler },
}

struct Family {
    name: String,
    help: String,
    metric: Metric,
}

fn wanted<S: AsRef<str>>(names: &[S], name: &str) -> bool {
    names.is_empty() || names.iter().any(|n| n.as_ref() == name)
}

impl Family {
    fn render<S: AsRef<str>>(&self, out: &mut String, names: &[S]) {
        match &self.metric {
            Metric::Counter(c) => {
                if wanted(names, &self.name) {
                    text::write_family(out, &self.name, &self.help, "counter", c.get());
                }
                // `foo_total` also exposes `foo_created` as its own gauge family.
                if let Some(base) = self.name.strip_suffix("_total") {
                    let created = format!("{base}_created");
                    if wanted(names, &created) {
                        text::write_family(out, &created, &self.help, "gauge", c.created());
                    }
                }
            }
            Metric::Gauge(g) => {
                if wanted(names, &self.name) {
                    text::write_family(out, &self.name, &self.help, "gauge", g.get());
                }
            }
            Metric::Sampled { kind, sample } => {
                if !wanted(names, &self.name) {
                    return;
                }
                // A source that cannot be read right now is left out of the scrape.
                if let Some(v) = sample() {
                    text::write_family(out, &self.name, &self.help, kind.as_str(), v);
                }
            }
        }
    }
}

#[derive(Default)]
pub struct Registry {
    families: RwLock<Vec<Family>>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the process families: start time always,
    /// plus CPU, memory and file descriptor families read from `/proc/self`
    /// on Linux.
    pub fn with_process_collector() -> Result<Self> {
        let registry = Self::new();
        process::register(&registry)?;
        Ok(registry)
    }

    pub fn register_counter(&self, name: &str, help: &str) -> Result<Arc<Counter>> {
        let counter = Arc::new(Counter::new());
        self.register(name, help, Metric::Counter(Arc::clone(&counter)))?;
        Ok(counter)
    }

    pub fn register_gauge(&self, name: &str, help: &str) -> Result<Arc<Gauge>> {
        let gauge = Arc::new(Gauge::new());
        self.register(name, help, Metric::Gauge(Arc::clone(&gauge)))?;
        Ok(gauge)
    }

    /// Register a family whose value is read by `sample` on every render.
    /// When `sample` returns `None` the family is omitted from that render.
    pub fn register_sampled<F>(
        &self,
        name: &str,
        help: &str,
        kind: MetricKind,
        sample: F,
    ) -> Result<()>
    where
        F: Fn() -> Option<f64> + Send + Sync + 'static,
    {
        let metric = Metric::Sampled {
            kind,
            sample: Arc::new(sample),
        };
        self.register(name, help, metric)
    }

    fn register(&self, name: &str, help: &str, metric: Metric) -> Result<()> {
        if !is_valid_metric_name(name) {
            return Err(PromHelloError::BadRequest(format!("invalid metric name: {name:?}")));
        }
        let mut families = self.families.write().unwrap_or_else(PoisonError::into_inner);
        if families.iter().any(|f| f.name == name) {
            return Err(PromHelloError::BadRequest(format!("metric already registered: {name}")));
        }
        tracing::debug!(metric = %name, "metric registered");
        families.push(Family {
            name: name.to_string(),
            help: help.to_string(),
            metric,
        });
        Ok(())
    }

    /// Registered family names, in registration order.
    pub fn names(&self) -> Vec<String> {
        let families = self.families.read().unwrap_or_else(PoisonError::into_inner);
        families.iter().map(|f| f.name.clone()).collect()
    }

    /// Render every family in Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.render_filtered::<&str>(&[])
    }

    /// Render only the named families. An empty filter renders everything;
    /// unknown names are ignored. Names match rendered family names, so
    /// `foo_created` selects the creation gauge of counter `foo_total`.
    pub fn render_filtered<S: AsRef<str>>(&self, names: &[S]) -> String {
        let families = self.families.read().unwrap_or_else(PoisonError::into_inner);
        let mut out = String::new();
        for family in families.iter() {
            family.render(&mut out, names);
        }
        out
    }
}
