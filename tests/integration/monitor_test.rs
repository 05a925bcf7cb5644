use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use hostwatch::core::notifier::Notifier;
use hostwatch::core::system_monitor::{
    AlertPayload, CycleOutcome, MetricsProvider, Monitor, ProcessSample, Sampler, UsageBytes,
};
use hostwatch::{Config, HostwatchError, Result};

/// Provider with a fixed CPU reading and a configurable process table
struct StaticProvider {
    cpu: f64,
    processes: Vec<ProcessSample>,
}

impl StaticProvider {
    fn with_processes(cpu: f64, count: u32) -> Self {
        let processes = (0..count)
            .map(|i| ProcessSample {
                pid: 1000 + i,
                name: Some(format!("worker-{}", i)),
                cpu_percent: Some(f64::from((i * 7) % 11)),
                memory_percent: Some(0.25),
                is_thread: false,
            })
            .collect();
        Self { cpu, processes }
    }
}

impl MetricsProvider for StaticProvider {
    fn cpu_percent(&mut self, _window: Duration) -> Result<f64> {
        Ok(self.cpu)
    }

    fn memory(&mut self) -> Result<UsageBytes> {
        Ok(UsageBytes {
            used: 2_147_483_648,
            total: 17_179_869_184,
        })
    }

    fn disk_usage(&mut self, mount_point: &Path) -> Result<UsageBytes> {
        if mount_point != Path::new("/") {
            return Err(HostwatchError::metric_collection("unexpected mount point"));
        }
        Ok(UsageBytes {
            used: 10_737_418_240,
            total: 107_374_182_400,
        })
    }

    fn processes(&mut self) -> Vec<ProcessSample> {
        self.processes.clone()
    }

    fn command_line(&mut self, pid: u32) -> Option<String> {
        (pid % 2 == 0).then(|| format!("/usr/bin/worker --id {}", pid))
    }
}

#[derive(Clone, Default)]
struct SharedNotifier {
    sent: Rc<RefCell<Vec<AlertPayload>>>,
}

impl Notifier for SharedNotifier {
    fn notify(&self, payload: &AlertPayload) -> Result<()> {
        self.sent.borrow_mut().push(payload.clone());
        Ok(())
    }
}

fn config(threshold: f64) -> Config {
    Config {
        cluster_id: "integration".to_string(),
        webhook_url: "http://127.0.0.1:9/hook".parse().unwrap(),
        threshold,
        interval: Duration::from_millis(1),
        request_timeout: Duration::from_secs(1),
    }
}

#[test]
fn test_sampler_ranks_top_five() {
    let mut sampler = Sampler::new(StaticProvider::with_processes(10.0, 12));
    let metrics = sampler.sample().unwrap();

    assert_eq!(metrics.processes.len(), 5);
    assert!(metrics
        .processes
        .windows(2)
        .all(|w| w[0].cpu_percent >= w[1].cpu_percent));
    assert_eq!(metrics.processes[0].cpu_percent, 10.0);
    assert_eq!(metrics.memory_used_mb, 2048);
    assert_eq!(metrics.memory_total_mb, 16384);
    assert_eq!(metrics.disk_used_gb, 10);
    assert_eq!(metrics.disk_total_gb, 100);
}

#[test]
fn test_sampler_with_few_processes() {
    let mut sampler = Sampler::new(StaticProvider::with_processes(10.0, 3));
    let metrics = sampler.sample().unwrap();

    assert_eq!(metrics.processes.len(), 3);
    for process in &metrics.processes {
        if process.pid % 2 == 0 {
            assert!(process.command_line.starts_with("/usr/bin/worker"));
        } else {
            assert!(process.command_line.is_empty());
        }
    }
}

#[test]
fn test_monitor_alerts_above_threshold() {
    let config = config(80.0);
    let notifier = SharedNotifier::default();
    let sampler = Sampler::new(StaticProvider::with_processes(81.2, 6));
    let mut monitor = Monitor::new(&config, sampler, notifier.clone());

    assert_eq!(monitor.run_cycle(), CycleOutcome::Alerted { cpu_usage: 81.2 });

    let sent = notifier.sent.borrow();
    assert_eq!(sent.len(), 1);
    // header, divider, guidance, divider, five process lines
    assert_eq!(sent[0].blocks.len(), 9);
    assert!(sent[0].blocks[0].text().unwrap().contains("[integration]"));
}

#[test]
fn test_monitor_quiet_below_threshold() {
    let config = config(80.0);
    let notifier = SharedNotifier::default();
    let sampler = Sampler::new(StaticProvider::with_processes(79.9, 6));
    let mut monitor = Monitor::new(&config, sampler, notifier.clone());

    assert_eq!(monitor.run_cycle(), CycleOutcome::Quiet { cpu_usage: 79.9 });
    assert!(notifier.sent.borrow().is_empty());
}

#[test]
fn test_monitor_rounds_before_comparing() {
    // 80.04 rounds to 80.0, which is not above 80.0
    let config = config(80.0);
    let notifier = SharedNotifier::default();
    let sampler = Sampler::new(StaticProvider::with_processes(80.04, 1));
    let mut monitor = Monitor::new(&config, sampler, notifier.clone());

    assert_eq!(monitor.run_cycle(), CycleOutcome::Quiet { cpu_usage: 80.0 });
    assert!(notifier.sent.borrow().is_empty());
}
