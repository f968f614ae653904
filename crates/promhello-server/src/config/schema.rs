use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use promhello_core::error::{PromHelloError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default = "ListenSection::app")]
    pub app: ListenSection,

    #[serde(default = "ListenSection::metrics")]
    pub metrics: ListenSection,

    #[serde(default)]
    pub shutdown: ShutdownSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            app: ListenSection::app(),
            metrics: ListenSection::metrics(),
            shutdown: ShutdownSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PromHelloError::UnsupportedVersion);
        }

        let app = self.app.addr("app")?;
        let metrics = self.metrics.addr("metrics")?;
        // Port 0 asks the OS for a fresh port, so equal addresses are fine there.
        if app == metrics && app.port() != 0 {
            return Err(PromHelloError::BadRequest(format!(
                "app.listen and metrics.listen must differ (both {app})"
            )));
        }

        self.shutdown.validate()?;
        Ok(())
    }

    pub fn app_addr(&self) -> Result<SocketAddr> {
        self.app.addr("app")
    }

    pub fn metrics_addr(&self) -> Result<SocketAddr> {
        self.metrics.addr("metrics")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListenSection {
    pub listen: String,
}

impl ListenSection {
    fn app() -> Self {
        Self { listen: "0.0.0.0:5000".into() }
    }

    fn metrics() -> Self {
        Self { listen: "0.0.0.0:8000".into() }
    }

    fn addr(&self, section: &str) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            PromHelloError::BadRequest(format!(
                "{section}.listen must be a valid socket address ({:?}): {e}",
                self.listen
            ))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShutdownSection {
    /// Time between flipping `/readyz` to 503 and closing the listeners.
    #[serde(default = "default_drain_grace_ms")]
    pub drain_grace_ms: u64,
}

impl Default for ShutdownSection {
    fn default() -> Self {
        Self {
            drain_grace_ms: default_drain_grace_ms(),
        }
    }
}

impl ShutdownSection {
    pub fn validate(&self) -> Result<()> {
        if self.drain_grace_ms > 60000 {
            return Err(PromHelloError::BadRequest(
                "shutdown.drain_grace_ms must be at most 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn drain_grace(&self) -> Duration {
        Duration::from_millis(self.drain_grace_ms)
    }
}

fn default_drain_grace_ms() -> u64 {
    1000
}
