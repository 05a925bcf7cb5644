//! OS metrics sources.
//!
//! `MetricsProvider` is the seam between the sampler and the operating
//! system. The production implementation is backed by `sysinfo`.

use std::path::Path;
use std::time::Duration;

use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, Pid, ProcessRefreshKind, ProcessesToUpdate,
    RefreshKind, System, UpdateKind,
};

use crate::error::{HostwatchError, Result};

use super::metrics::UsageBytes;

/// Raw per-process reading. `None` means the value could not be obtained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: Option<String>,
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
    /// Set for Linux tasks that share their parent's address space
    pub is_thread: bool,
}

pub trait MetricsProvider {
    /// Aggregate CPU usage in percent, measured over `window`. Blocks for
    /// the length of the window.
    fn cpu_percent(&mut self, window: Duration) -> Result<f64>;

    /// Virtual memory used/total in bytes
    fn memory(&mut self) -> Result<UsageBytes>;

    /// Filesystem used/total in bytes for the disk mounted at `mount_point`.
    /// Used is `total - available`, so root-reserved blocks count as used.
    fn disk_usage(&mut self, mount_point: &Path) -> Result<UsageBytes>;

    /// Every process currently visible. Threads may be included, flagged
    /// with `is_thread`.
    fn processes(&mut self) -> Vec<ProcessSample>;

    /// Full command line of `pid`, if it can still be resolved
    fn command_line(&mut self, pid: u32) -> Option<String>;
}

/// `MetricsProvider` backed by `sysinfo`
pub struct SysinfoProvider {
    system: System,
    disks: Disks,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
            .with_memory(MemoryRefreshKind::nothing().with_ram());

        Self {
            system: System::new_with_specifics(refresh_kind),
            disks: Disks::new_with_refreshed_list(),
        }
    }

    fn process_refresh_kind() -> ProcessRefreshKind {
        ProcessRefreshKind::nothing()
            .with_cpu()
            .with_memory()
            .with_cmd(UpdateKind::OnlyIfNotSet)
    }

    fn refresh_cpu_and_processes(&mut self) {
        self.system.refresh_cpu_usage();
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            Self::process_refresh_kind(),
        );
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for SysinfoProvider {
    fn cpu_percent(&mut self, window: Duration) -> Result<f64> {
        // Processes are refreshed on the same two ticks so their cpu usage
        // covers the same window as the global figure.
        let window = window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        self.refresh_cpu_and_processes();
        std::thread::sleep(window);
        self.refresh_cpu_and_processes();

        if self.system.cpus().is_empty() {
            return Err(HostwatchError::metric_collection("no CPUs reported"));
        }

        let usage = self.system.global_cpu_usage();
        if !usage.is_finite() {
            return Err(HostwatchError::metric_collection(format!(
                "invalid CPU usage reading: {}",
                usage
            )));
        }

        Ok(f64::from(usage))
    }

    fn memory(&mut self) -> Result<UsageBytes> {
        self.system.refresh_memory();

        let total = self.system.total_memory();
        if total == 0 {
            return Err(HostwatchError::metric_collection(
                "total memory reported as zero",
            ));
        }

        Ok(UsageBytes {
            used: self.system.used_memory(),
            total,
        })
    }

    fn disk_usage(&mut self, mount_point: &Path) -> Result<UsageBytes> {
        self.disks.refresh(true);

        let disk = self
            .disks
            .iter()
            .find(|disk| disk.mount_point() == mount_point)
            .ok_or_else(|| {
                HostwatchError::metric_collection(format!(
                    "no disk mounted at {}",
                    mount_point.display()
                ))
            })?;

        let total = disk.total_space();
        let available = disk.available_space();

        Ok(UsageBytes {
            used: total.saturating_sub(available),
            total,
        })
    }

    fn processes(&mut self) -> Vec<ProcessSample> {
        let total_memory = self.system.total_memory();

        self.system
            .processes()
            .values()
            .map(|proc| {
                let cpu = f64::from(proc.cpu_usage());
                ProcessSample {
                    pid: proc.pid().as_u32(),
                    name: Some(proc.name().to_string_lossy().to_string()),
                    cpu_percent: cpu.is_finite().then_some(cpu),
                    memory_percent: (total_memory > 0)
                        .then(|| proc.memory() as f64 / total_memory as f64 * 100.0),
                    is_thread: proc.thread_kind().is_some(),
                }
            })
            .collect()
    }

    fn command_line(&mut self, pid: u32) -> Option<String> {
        let proc = self.system.process(Pid::from_u32(pid))?;
        let parts: Vec<String> = proc
            .cmd()
            .iter()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect();
        Some(parts.join(" "))
    }
}
