use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use hostwatch::core::notifier::{Notifier, WebhookNotifier};
use hostwatch::core::system_monitor::{build_alert_payload, Metrics, ProcessInfo};
use hostwatch::HostwatchError;
use url::Url;

/// Captured request: head (request line + headers) and body
struct Captured {
    head: String,
    body: String,
}

/// Accept one connection, record the request and answer with `status_line`
fn spawn_webhook(status_line: &'static str) -> (Url, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = Url::parse(&format!("http://{}/hook", listener.local_addr().unwrap())).unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let head_end = loop {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "connection closed before headers were read");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);

        while buf.len() < head_end + content_length {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let body = String::from_utf8_lossy(&buf[head_end..]).to_string();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
            status_line
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        tx.send(Captured { head, body }).unwrap();
    });

    (url, rx)
}

fn metrics() -> Metrics {
    Metrics {
        cpu_usage: 97.5,
        processes: vec![ProcessInfo {
            pid: 31337,
            name: "ffmpeg".to_string(),
            cpu_percent: 88.8,
            memory_percent: 12.0,
            command_line: "ffmpeg -i in.mp4 out.webm".to_string(),
        }],
        ..Default::default()
    }
}

#[test]
fn test_webhook_posts_json_payload() {
    let (url, rx) = spawn_webhook("200 OK");
    let notifier = WebhookNotifier::new(url, Duration::from_secs(5)).unwrap();
    let payload = build_alert_payload("edge-7", &metrics());

    notifier.notify(&payload).unwrap();

    let captured = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(captured.head.starts_with("POST /hook HTTP/1.1"));
    assert!(captured
        .head
        .to_ascii_lowercase()
        .contains("content-type: application/json"));

    let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    let blocks = body["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 5);
    assert!(blocks[0]["text"]["text"]
        .as_str()
        .unwrap()
        .contains("[edge-7]"));
    assert!(blocks[4]["text"]["text"]
        .as_str()
        .unwrap()
        .contains("`ffmpeg` CPU - *88.80%* | Memory - *12.00%*"));
}

#[test]
fn test_webhook_non_success_status_is_an_error() {
    let (url, _rx) = spawn_webhook("500 Internal Server Error");
    let notifier = WebhookNotifier::new(url, Duration::from_secs(5)).unwrap();

    let err = notifier
        .notify(&build_alert_payload("edge-7", &metrics()))
        .unwrap_err();

    assert!(matches!(err, HostwatchError::Notification(_)));
    assert!(err.to_string().contains("500"));
}

#[test]
fn test_webhook_unreachable_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{}/hook", addr)).unwrap();
    let notifier = WebhookNotifier::new(url, Duration::from_secs(2)).unwrap();

    let err = notifier
        .notify(&build_alert_payload("edge-7", &metrics()))
        .unwrap_err();
    assert!(matches!(err, HostwatchError::Http(_)));
}

#[test]
fn test_webhook_silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = Url::parse(&format!("http://{}/hook", listener.local_addr().unwrap())).unwrap();
    let (release, held) = mpsc::channel::<()>();

    // Accept and keep the connection open without ever answering
    thread::spawn(move || {
        let (_stream, _) = listener.accept().unwrap();
        let _ = held.recv_timeout(Duration::from_secs(5));
    });

    let notifier = WebhookNotifier::new(url, Duration::from_millis(200)).unwrap();
    let started = Instant::now();
    let err = notifier
        .notify(&build_alert_payload("edge-7", &metrics()))
        .unwrap_err();
    let elapsed = started.elapsed();
    drop(release);

    assert!(matches!(err, HostwatchError::Http(_)));
    assert!(elapsed < Duration::from_millis(1500), "took {:?}", elapsed);
}
