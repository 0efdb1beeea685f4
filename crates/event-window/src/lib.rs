//! Sliding Event Window
//!
//! Keeps the timestamps of discrete events (slow blinks, yawns) that fall
//! within a fixed retention period and reports their count as a rate.

mod window;

pub use window::EventWindow;

/// Default retention (60 s), so the window length reads as events per minute
pub const DEFAULT_RETENTION_MS: u64 = 60_000;
