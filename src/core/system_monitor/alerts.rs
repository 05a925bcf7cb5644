//! Alert decision and payload formatting.
//!
//! Builds the block-based rich text message posted to the chat webhook.

use serde::{Deserialize, Serialize};

use super::metrics::Metrics;

pub const ALERT_TITLE: &str = "Top CPU Consuming Processes";
pub const ALERT_GUIDANCE: &str =
    "Please consider cleaning up or reviewing the following processes.";

/// Top-level webhook body: `{"blocks": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Section { text: TextObject },
    Divider,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl Block {
    /// Section block with markdown text
    pub fn markdown<S: Into<String>>(text: S) -> Self {
        Block::Section {
            text: TextObject {
                kind: "mrkdwn".to_string(),
                text: text.into(),
            },
        }
    }

    /// Text of a section block, `None` for dividers
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Section { text } => Some(&text.text),
            Block::Divider => None,
        }
    }
}

impl AlertPayload {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// An alert fires when CPU usage is strictly above the threshold
pub fn should_alert(metrics: &Metrics, threshold: f64) -> bool {
    metrics.cpu_usage > threshold
}

/// Build the alert message for `metrics`, labelled with `cluster_id`.
///
/// Only the process ranking is rendered; memory and disk figures are not
/// part of the message.
pub fn build_alert_payload(cluster_id: &str, metrics: &Metrics) -> AlertPayload {
    let mut blocks = vec![
        Block::markdown(format!("*🚨 [{}] {} 🚨*", cluster_id, ALERT_TITLE)),
        Block::Divider,
        Block::markdown(ALERT_GUIDANCE),
        Block::Divider,
    ];

    blocks.extend(metrics.processes.iter().enumerate().map(|(i, p)| {
        Block::markdown(format!(
            "*{}.* `{}` CPU - *{:.2}%* | Memory - *{:.2}%*",
            i + 1,
            p.name,
            p.cpu_percent,
            p.memory_percent
        ))
    }));

    AlertPayload { blocks }
}
