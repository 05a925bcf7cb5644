// Command handlers module
pub mod preview;
pub mod run;
pub mod sample;
pub mod version;

use clap::ArgMatches;

use crate::core::config::ConfigOverrides;

// Re-exports for cleaner imports
pub use version::execute as version;

/// Collect `--cid`, `--webhook-url`, `--threshold` and `--interval` if the
/// subcommand defines them
pub fn config_overrides(matches: &ArgMatches) -> ConfigOverrides {
    let get = |id: &str| -> Option<String> {
        matches
            .try_get_one::<String>(id)
            .ok()
            .flatten()
            .cloned()
    };

    ConfigOverrides {
        cluster_id: get("cid"),
        webhook_url: get("webhook-url"),
        threshold: get("threshold"),
        interval_secs: get("interval"),
    }
}
