//! Process families, in the shape Prometheus client libraries export them.
//!
//! Everything except the start time is read from `/proc/self` at scrape
//! time, so these families only exist on Linux.

use super::value::unix_now;
use super::Registry;
use crate::error::Result;

pub const PROCESS_START_TIME: &str = "process_start_time_seconds";
pub const PROCESS_CPU_SECONDS: &str = "process_cpu_seconds_total";
pub const PROCESS_VIRTUAL_MEMORY: &str = "process_virtual_memory_bytes";
pub const PROCESS_RESIDENT_MEMORY: &str = "process_resident_memory_bytes";
pub const PROCESS_OPEN_FDS: &str = "process_open_fds";
pub const PROCESS_MAX_FDS: &str = "process_max_fds";

pub(crate) fn register(registry: &Registry) -> Result<()> {
    let start = registry.register_gauge(
        PROCESS_START_TIME,
        "Start time of the process since unix epoch in seconds.",
    )?;
    start.set(unix_now() as i64);

    #[cfg(target_os = "linux")]
    procfs::register(registry)?;

    Ok(())
}

#[cfg(target_os = "linux")]
mod procfs {
    use std::fs;

    use super::*;
    use crate::metrics::MetricKind;

    /// Unit of the `utime`/`stime` fields in `/proc/<pid>/stat`.
    const USER_HZ: f64 = 100.0;

    pub(super) fn register(registry: &Registry) -> Result<()> {
        registry.register_sampled(
            PROCESS_CPU_SECONDS,
            "Total user and system CPU time spent in seconds.",
            MetricKind::Counter,
            cpu_seconds,
        )?;
        registry.register_sampled(
            PROCESS_VIRTUAL_MEMORY,
            "Virtual memory size in bytes.",
            MetricKind::Gauge,
            || status_bytes("VmSize:"),
        )?;
        registry.register_sampled(
            PROCESS_RESIDENT_MEMORY,
            "Resident memory size in bytes.",
            MetricKind::Gauge,
            || status_bytes("VmRSS:"),
        )?;
        registry.register_sampled(
            PROCESS_OPEN_FDS,
            "Number of open file descriptors.",
            MetricKind::Gauge,
            open_fds,
        )?;
        registry.register_sampled(
            PROCESS_MAX_FDS,
            "Maximum number of open file descriptors.",
            MetricKind::Gauge,
            max_fds,
        )?;
        Ok(())
    }

    fn cpu_seconds() -> Option<f64> {
        let stat = fs::read_to_string("/proc/self/stat").ok()?;
        // comm (field 2) may contain spaces; fields are counted after its ')'.
        let rest = &stat[stat.rfind(')')? + 1..];
        let mut fields = rest.split_whitespace().skip(11);
        let utime: f64 = fields.next()?.parse().ok()?;
        let stime: f64 = fields.next()?.parse().ok()?;
        Some((utime + stime) / USER_HZ)
    }

    /// `/proc/self/status` reports memory lines in kB.
    fn status_bytes(key: &str) -> Option<f64> {
        let status = fs::read_to_string("/proc/self/status").ok()?;
        let line = status.lines().find(|l| l.starts_with(key))?;
        let kib: f64 = line.split_whitespace().nth(1)?.parse().ok()?;
        Some(kib * 1024.0)
    }

    fn open_fds() -> Option<f64> {
        let entries = fs::read_dir("/proc/self/fd").ok()?;
        Some(entries.count() as f64)
    }

    /// Soft limit; `None` when unlimited.
    fn max_fds() -> Option<f64> {
        let limits = fs::read_to_string("/proc/self/limits").ok()?;
        let line = limits.lines().find(|l| l.starts_with("Max open files"))?;
        line.split_whitespace().nth(3)?.parse().ok()
    }
}
