use serde::{Deserialize, Serialize};

const BYTES_PER_MB: u64 = 1024 * 1024;
const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// Point-in-time snapshot produced by one sampling cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub timestamp: String, // RFC 3339, local time
    #[serde(rename = "cpuUsagePercent")]
    pub cpu_usage: f64,
    #[serde(rename = "memoryUsedMb")]
    pub memory_used_mb: u64,
    #[serde(rename = "memoryTotalMb")]
    pub memory_total_mb: u64,
    #[serde(rename = "diskUsedGb")]
    pub disk_used_gb: u64,
    #[serde(rename = "diskTotalGb")]
    pub disk_total_gb: u64,
    #[serde(rename = "processList")]
    pub processes: Vec<ProcessInfo>,
}

/// One entry of the top-N ranking. Only meaningful within its own cycle,
/// the OS is free to reuse the pid afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    #[serde(rename = "cpu")]
    pub cpu_percent: f64,
    #[serde(rename = "memory")]
    pub memory_percent: f64,
    pub command_line: String,
}

/// Used/total pair in bytes as reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageBytes {
    pub used: u64,
    pub total: u64,
}

/// Round a percentage to one decimal place, half away from zero
pub fn round_percent(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Whole megabytes, truncating
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes / BYTES_PER_MB
}

/// Whole gigabytes, truncating
pub fn bytes_to_gb(bytes: u64) -> u64 {
    bytes / BYTES_PER_GB
}
