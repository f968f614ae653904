//! Service config loader (strict parsing).
//!
//! The config file is optional: when it does not exist the built-in
//! defaults (app on `0.0.0.0:5000`, metrics on `0.0.0.0:8000`) apply.

pub mod schema;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use promhello_core::error::{PromHelloError, Result};

pub use schema::{ListenSection, ServiceConfig, ShutdownSection};

/// File looked up in the working directory at startup.
pub const DEFAULT_CONFIG_PATH: &str = "promhello.yaml";

pub fn load_from_file(path: impl AsRef<Path>) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path.as_ref())
        .map_err(|e| PromHelloError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

/// Like [`load_from_file`], but a missing file yields the defaults.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ServiceConfig> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            Ok(ServiceConfig::default())
        }
        Err(e) => Err(PromHelloError::Internal(format!("read config failed: {e}"))),
    }
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| PromHelloError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
