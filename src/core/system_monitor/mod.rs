//! System monitoring core functionality.
//!
//! This module provides the business logic for sampling host metrics,
//! ranking processes by CPU usage and turning a snapshot into an alert.

pub mod alerts;
mod collector;
mod metrics;
pub mod provider;
mod runtime;

pub use alerts::{build_alert_payload, should_alert, AlertPayload, Block, TextObject};
pub use collector::{rank_processes, Sampler, CPU_WINDOW, TOP_PROCESSES};
pub use metrics::{bytes_to_gb, bytes_to_mb, round_percent, Metrics, ProcessInfo, UsageBytes};
pub use provider::{MetricsProvider, ProcessSample, SysinfoProvider};
pub use runtime::{CycleOutcome, Monitor};
