//! Sampling loop driver.
//!
//! Runs sample -> evaluate -> notify -> sleep, one cycle at a time on the
//! calling thread. A failed cycle is logged and skipped; it never stops the
//! loop.

use std::sync::mpsc::{Receiver, RecvTimeoutError};

use crate::core::config::Config;
use crate::core::notifier::Notifier;

use super::alerts::{build_alert_payload, should_alert};
use super::collector::Sampler;
use super::provider::MetricsProvider;

/// What happened during one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// CPU usage at or below the threshold, nothing sent
    Quiet { cpu_usage: f64 },
    /// Threshold crossed and the alert was delivered
    Alerted { cpu_usage: f64 },
    /// Threshold crossed but delivery failed
    AlertFailed { cpu_usage: f64 },
    /// Metrics could not be collected, cycle skipped
    SampleFailed,
}

pub struct Monitor<'a, P, N> {
    config: &'a Config,
    sampler: Sampler<P>,
    notifier: N,
}

impl<'a, P: MetricsProvider, N: Notifier> Monitor<'a, P, N> {
    pub fn new(config: &'a Config, sampler: Sampler<P>, notifier: N) -> Self {
        Self {
            config,
            sampler,
            notifier,
        }
    }

    /// Run a single sampling cycle without sleeping
    pub fn run_cycle(&mut self) -> CycleOutcome {
        let metrics = match self.sampler.sample() {
            Ok(metrics) => metrics,
            Err(e) => {
                log::error!("Skipping cycle, metric collection failed: {}", e);
                return CycleOutcome::SampleFailed;
            }
        };

        let cpu_usage = metrics.cpu_usage;
        log::debug!(
            "cpu={:.1}% mem={}/{}MB disk={}/{}GB",
            cpu_usage,
            metrics.memory_used_mb,
            metrics.memory_total_mb,
            metrics.disk_used_gb,
            metrics.disk_total_gb
        );

        if !should_alert(&metrics, self.config.threshold) {
            return CycleOutcome::Quiet { cpu_usage };
        }

        log::info!(
            "CPU usage {:.1}% above threshold {:.1}%, sending alert",
            cpu_usage,
            self.config.threshold
        );

        let payload = build_alert_payload(&self.config.cluster_id, &metrics);
        match self.notifier.notify(&payload) {
            Ok(()) => {
                log::info!("Alert delivered to {}", self.config.webhook_host());
                CycleOutcome::Alerted { cpu_usage }
            }
            Err(e) => {
                log::warn!("Failed to deliver alert: {}", e);
                CycleOutcome::AlertFailed { cpu_usage }
            }
        }
    }

    /// Run cycles until `shutdown` receives a message or its sender is
    /// dropped. Waits `config.interval` after each completed cycle.
    pub fn run(&mut self, shutdown: &Receiver<()>) -> usize {
        let mut cycles = 0;

        loop {
            self.run_cycle();
            cycles += 1;

            match shutdown.recv_timeout(self.config.interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        log::info!("Monitor stopped after {} cycle(s)", cycles);
        cycles
    }
}
