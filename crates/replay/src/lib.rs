//! Vigilance Replay
//!
//! Feeds recorded frames (JSON lines) through the vigilance pipeline and
//! writes one analysis per frame, as an in-car host would consume them.

mod pipeline;
mod record;
mod settings;

pub use pipeline::{format_text, replay, OutputFormat, ReplaySummary, CHANNEL_CAPACITY};
pub use record::{EmptyFrame, FrameRecord, LandmarkFrame, RatioFrame};
pub use settings::{ReplaySettings, ENV_PREFIX};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging on stderr; stdout carries the frame output
pub fn init_logging(level: Level, json: bool) {
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())
            .expect("Failed to set tracing subscriber");
    } else {
        tracing::subscriber::set_global_default(builder.finish())
            .expect("Failed to set tracing subscriber");
    }
}
