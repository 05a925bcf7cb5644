use colored::*;

use crate::core::system_monitor::{Metrics, ProcessInfo};

const COMMAND_WIDTH: usize = 48;

/// Format a used/total pair with its percentage, e.g. `2048 / 8192 MB (25.0%)`
pub fn format_usage(used: u64, total: u64, unit: &str) -> String {
    let percent = if total > 0 {
        used as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    format!("{} / {} {} ({:.1}%)", used, total, unit, percent)
}

/// Shorten `text` to at most `max` characters, marking the cut with `…`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

fn colorize_cpu(percent: f64, threshold: Option<f64>) -> ColoredString {
    let text = format!("{:.1}%", percent);
    match threshold {
        Some(limit) if percent > limit => text.red().bold(),
        _ => text.green(),
    }
}

fn format_process_row(rank: usize, process: &ProcessInfo) -> String {
    format!(
        "{:>2}. {:>7}  {:<20} {:>7.2}% {:>7.2}%  {}",
        rank,
        process.pid,
        truncate(&process.name, 20),
        process.cpu_percent,
        process.memory_percent,
        truncate(&process.command_line, COMMAND_WIDTH).dimmed()
    )
}

/// Print a snapshot as a human readable report
pub fn print_metrics(metrics: &Metrics, threshold: Option<f64>) {
    println!("\n{}", "HOST SNAPSHOT".bold().bright_cyan());
    println!("{}", "=".repeat(80));
    println!("{:<10} {}", "Time:".bold(), metrics.timestamp);
    println!(
        "{:<10} {}",
        "CPU:".bold(),
        colorize_cpu(metrics.cpu_usage, threshold)
    );
    println!(
        "{:<10} {}",
        "Memory:".bold(),
        format_usage(metrics.memory_used_mb, metrics.memory_total_mb, "MB")
    );
    println!(
        "{:<10} {}",
        "Disk (/):".bold(),
        format_usage(metrics.disk_used_gb, metrics.disk_total_gb, "GB")
    );

    println!("\n{}", "TOP PROCESSES".bold().bright_cyan());
    println!("{}", "-".repeat(80));

    if metrics.processes.is_empty() {
        println!("{}", "No processes could be read".yellow());
        return;
    }

    println!(
        "{}",
        format!(
            "{:>2}  {:>7}  {:<20} {:>8} {:>8}  {}",
            "#", "PID", "NAME", "CPU", "MEM", "COMMAND"
        )
        .dimmed()
    );
    for (i, process) in metrics.processes.iter().enumerate() {
        println!("{}", format_process_row(i + 1, process));
    }
}
