use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use hostwatch::commands;

fn override_args() -> [Arg; 4] {
    [
        Arg::new("cid")
            .long("cid")
            .value_name("ID")
            .help("Cluster identifier shown in alerts (overrides CID)"),
        Arg::new("webhook-url")
            .long("webhook-url")
            .value_name("URL")
            .help("Webhook that receives alerts (overrides WEBHOOK_URL)"),
        Arg::new("threshold")
            .short('t')
            .long("threshold")
            .value_name("PERCENT")
            .help("CPU usage percentage that triggers an alert (overrides MAX)"),
        Arg::new("interval")
            .short('i')
            .long("interval")
            .value_name("SECONDS")
            .help("Seconds to wait between cycles (overrides HOSTWATCH_INTERVAL_SECS)"),
    ]
}

fn cli() -> Command {
    Command::new("hostwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Samples CPU, memory, disk and processes, and alerts a chat webhook on high CPU")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Run the monitoring loop")
                .long_about("Run the monitoring loop\n\nConfiguration is read from the environment:\n    CID                       Cluster identifier shown in alerts\n    WEBHOOK_URL               Webhook that receives alerts\n    MAX                       CPU usage percentage that triggers an alert\n    HOSTWATCH_INTERVAL_SECS   Seconds between cycles (default 5)\n    HOSTWATCH_TIMEOUT_SECS    Webhook request timeout (default 10)")
                .args(override_args())
                .arg(
                    Arg::new("once")
                        .long("once")
                        .help("Run a single cycle and exit")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Print alerts to stdout instead of sending them")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("sample")
                .about("Take one snapshot and print it")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output as JSON")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("threshold")
                        .short('t')
                        .long("threshold")
                        .value_name("PERCENT")
                        .help("Highlight CPU usage above this percentage"),
                ),
        )
        .subcommand(
            Command::new("preview")
                .about("Print the alert payload for the current state without sending it")
                .arg(
                    Arg::new("cid")
                        .long("cid")
                        .value_name("ID")
                        .help("Cluster identifier shown in the alert (defaults to CID)"),
                ),
        )
        .subcommand(Command::new("version").about("Shows version information"))
}

fn main() -> Result<()> {
    hostwatch::init_logging();

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("run", sub_matches)) => commands::run::execute(sub_matches),
        Some(("sample", sub_matches)) => commands::sample::execute(sub_matches),
        Some(("preview", sub_matches)) => commands::preview::execute(sub_matches),
        Some(("version", _)) => commands::version(),
        _ => unreachable!("subcommand is required"),
    }
}
