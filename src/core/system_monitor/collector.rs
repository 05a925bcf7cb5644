use std::path::Path;
use std::time::Duration;

use chrono::{Local, SecondsFormat};

use crate::error::Result;

use super::metrics::*;
use super::provider::{MetricsProvider, ProcessSample};

/// Number of processes kept in the ranking
pub const TOP_PROCESSES: usize = 5;

/// Length of the aggregate CPU measurement
pub const CPU_WINDOW: Duration = Duration::from_secs(1);

const ROOT_MOUNT: &str = "/";

/// Produces `Metrics` snapshots from a `MetricsProvider`
pub struct Sampler<P> {
    provider: P,
}

impl<P: MetricsProvider> Sampler<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Run one collection cycle.
    ///
    /// Fails only when CPU, memory or disk figures are unavailable. Individual
    /// processes that cannot be read are left out of the ranking instead.
    pub fn sample(&mut self) -> Result<Metrics> {
        let cpu = self.provider.cpu_percent(CPU_WINDOW)?;
        let memory = self.provider.memory()?;
        let disk = self.provider.disk_usage(Path::new(ROOT_MOUNT))?;

        let mut processes = rank_processes(self.provider.processes(), TOP_PROCESSES);
        for process in &mut processes {
            process.command_line = self
                .provider
                .command_line(process.pid)
                .unwrap_or_default();
        }

        Ok(Metrics {
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            cpu_usage: round_percent(cpu),
            memory_used_mb: bytes_to_mb(memory.used),
            memory_total_mb: bytes_to_mb(memory.total),
            disk_used_gb: bytes_to_gb(disk.used),
            disk_total_gb: bytes_to_gb(disk.total),
            processes,
        })
    }
}

/// Sort processes by CPU usage, highest first, and keep at most `limit`.
///
/// Threads and samples missing a CPU or memory figure are dropped. A missing name becomes
/// an empty string. Command lines are left empty for the caller to fill in.
pub fn rank_processes<I>(samples: I, limit: usize) -> Vec<ProcessInfo>
where
    I: IntoIterator<Item = ProcessSample>,
{
    let mut processes: Vec<ProcessInfo> = samples
        .into_iter()
        .filter(|sample| !sample.is_thread)
        .filter_map(|sample| {
            let cpu_percent = sample.cpu_percent.filter(|v| v.is_finite())?;
            let memory_percent = sample.memory_percent.filter(|v| v.is_finite())?;
            Some(ProcessInfo {
                pid: sample.pid,
                name: sample.name.unwrap_or_default(),
                cpu_percent,
                memory_percent,
                command_line: String::new(),
            })
        })
        .collect();

    // Sort by CPU usage descending
    processes.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));

    processes.truncate(limit);
    processes
}
