//! Alerting System
//!
//! Decides when a change in driver advisory is worth telling the driver:
//! escalations immediately, everything else behind a cooldown.

mod notifier;

pub use notifier::{AdvisoryNotifier, AlertConfig, Notification};
