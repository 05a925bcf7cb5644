//! `hostwatch run`: the monitoring loop.

use std::sync::mpsc;

use anyhow::{anyhow, bail, Context, Result};
use clap::ArgMatches;

use crate::core::config::{Config, ProcessEnv};
use crate::core::notifier::{ConsoleNotifier, Notifier, WebhookNotifier};
use crate::core::system_monitor::{CycleOutcome, Monitor, Sampler, SysinfoProvider};

use super::config_overrides;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let once = matches.get_flag("once");
    let dry_run = matches.get_flag("dry-run");

    let config = Config::load(&ProcessEnv, &config_overrides(matches))
        .context("Failed to load configuration")?;

    log::info!(
        "Monitoring cluster '{}': alert above {:.1}% CPU, every {}s, webhook host {}",
        config.cluster_id,
        config.threshold,
        config.interval.as_secs(),
        config.webhook_host()
    );

    let notifier: Box<dyn Notifier> = if dry_run {
        log::info!("Dry run: alerts are printed instead of sent");
        Box::new(ConsoleNotifier)
    } else {
        Box::new(
            WebhookNotifier::new(config.webhook_url.clone(), config.request_timeout)
                .context("Failed to build webhook client")?,
        )
    };

    let sampler = Sampler::new(SysinfoProvider::new());
    let mut monitor = Monitor::new(&config, sampler, notifier);

    if once {
        return match monitor.run_cycle() {
            CycleOutcome::SampleFailed => bail!("Metric collection failed"),
            CycleOutcome::AlertFailed { .. } => bail!("Alert could not be delivered"),
            CycleOutcome::Quiet { cpu_usage } => {
                log::info!("CPU usage {:.1}%, below threshold", cpu_usage);
                Ok(())
            }
            CycleOutcome::Alerted { .. } => Ok(()),
        };
    }

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        log::info!("Shutdown requested, stopping after the current cycle");
        let _ = shutdown_tx.send(());
    })
    .map_err(|e| anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    monitor.run(&shutdown_rx);
    Ok(())
}
