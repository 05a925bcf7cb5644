//! `hostwatch sample`: take one snapshot and print it.

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::parse_threshold;
use crate::core::system_monitor::{Sampler, SysinfoProvider};
use crate::ui::print_metrics;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let json_output = matches.get_flag("json");
    let threshold = matches
        .get_one::<String>("threshold")
        .map(|raw| parse_threshold(raw))
        .transpose()
        .context("Invalid --threshold")?;

    let mut sampler = Sampler::new(SysinfoProvider::new());
    let metrics = sampler.sample().context("Failed to collect metrics")?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        print_metrics(&metrics, threshold);
    }

    Ok(())
}
