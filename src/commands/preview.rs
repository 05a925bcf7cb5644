//! `hostwatch preview`: show the alert that would be sent right now.

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::{EnvSource, ProcessEnv, ENV_CLUSTER_ID};
use crate::core::system_monitor::{build_alert_payload, Sampler, SysinfoProvider};

const FALLBACK_CLUSTER_ID: &str = "local";

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let cluster_id = matches
        .get_one::<String>("cid")
        .cloned()
        .or_else(|| ProcessEnv.var(ENV_CLUSTER_ID))
        .unwrap_or_else(|| FALLBACK_CLUSTER_ID.to_string());

    let mut sampler = Sampler::new(SysinfoProvider::new());
    let metrics = sampler.sample().context("Failed to collect metrics")?;

    let payload = build_alert_payload(&cluster_id, &metrics);
    println!("{}", payload.to_json_pretty()?);

    Ok(())
}
