// Core business logic module

pub mod config;
pub mod notifier;
pub mod system_monitor;

// Re-export commonly used items
pub use config::{Config, ConfigOverrides};
pub use notifier::{ConsoleNotifier, Notifier, WebhookNotifier};
