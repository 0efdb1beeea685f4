//! Advisory classification and per-session state

use crate::config::DmsConfig;
use crate::detector::{EventDetector, SlowBlinkDetector, YawnDetector};
use crate::smoother::ScoreSmoother;
use crate::DmsError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Advisory state, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    ImmediateStop,
    PauseRecommended,
    VigilanceDeclining,
    NormalDriving,
}

impl Advisory {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Advisory::ImmediateStop => "IMMEDIATE STOP",
            Advisory::PauseRecommended => "PAUSE RECOMMENDED",
            Advisory::VigilanceDeclining => "VIGILANCE DECLINING",
            Advisory::NormalDriving => "NORMAL DRIVING",
        }
    }

    /// Get recommended action
    pub fn recommendation(&self) -> &'static str {
        match self {
            Advisory::ImmediateStop => "Stop immediately in a safe place.",
            Advisory::PauseRecommended => "Take a break as soon as possible.",
            Advisory::VigilanceDeclining => "Consider a coffee or some fresh air.",
            Advisory::NormalDriving => "Vigilance is adequate.",
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Advisory::ImmediateStop => "immediate_stop",
            Advisory::PauseRecommended => "pause_recommended",
            Advisory::VigilanceDeclining => "vigilance_declining",
            Advisory::NormalDriving => "normal_driving",
        }
    }

    /// True if `self` calls for more urgent action than `other`
    pub fn is_more_severe_than(&self, other: Advisory) -> bool {
        *self < other
    }
}

/// Score band boundaries (exclusive upper bounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryBands {
    pub immediate_stop_below: f64,
    pub pause_below: f64,
    pub declining_below: f64,
}

impl Default for AdvisoryBands {
    fn default() -> Self {
        Self {
            immediate_stop_below: 30.0,
            pause_below: 50.0,
            declining_below: 70.0,
        }
    }
}

impl AdvisoryBands {
    /// Map a score to its advisory. Total: NaN is treated as the worst case.
    pub fn classify(&self, score: f64) -> Advisory {
        if !(score >= self.immediate_stop_below) {
            Advisory::ImmediateStop
        } else if score < self.pause_below {
            Advisory::PauseRecommended
        } else if score < self.declining_below {
            Advisory::VigilanceDeclining
        } else {
            Advisory::NormalDriving
        }
    }

    /// Check boundaries are finite and strictly ascending
    pub fn validate(&self) -> Result<(), DmsError> {
        let bounds = [self.immediate_stop_below, self.pause_below, self.declining_below];
        if bounds.iter().all(|b| b.is_finite()) && bounds.windows(2).all(|w| w[0] < w[1]) {
            Ok(())
        } else {
            Err(DmsError::Config(format!(
                "advisory bands must be ascending, got {:?}",
                bounds
            )))
        }
    }
}

/// Mutable state of one monitoring session
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Slow-blink detector and its window
    pub blink: SlowBlinkDetector,
    /// Yawn detector and its window
    pub yawn: YawnDetector,
    /// Score smoother
    pub smoother: ScoreSmoother,
    /// Latest accepted timestamp
    pub last_timestamp_ms: Option<u64>,
    /// Frames processed with a face
    pub frames: u64,
    /// Consecutive inferences where no rule fired
    pub no_evidence_streak: u32,
    initial_score: f64,
}

impl SessionState {
    /// Fresh session for `config`
    pub fn new(config: &DmsConfig) -> Self {
        Self {
            blink: SlowBlinkDetector::new(config.blink.clone(), config.window_retention_ms),
            yawn: YawnDetector::new(config.yawn.clone(), config.window_retention_ms),
            smoother: ScoreSmoother::new(config.smoothing_alpha, config.initial_score),
            last_timestamp_ms: None,
            frames: 0,
            no_evidence_streak: 0,
            initial_score: config.initial_score,
        }
    }

    /// Accept a frame timestamp. A timestamp earlier than the last one is
    /// replaced by the last one so windows and cooldowns stay consistent.
    pub fn advance_clock(&mut self, now_ms: u64) -> u64 {
        let now_ms = match self.last_timestamp_ms {
            Some(last) if now_ms < last => {
                warn!("Timestamp went backwards: {}ms < {}ms, holding clock", now_ms, last);
                last
            }
            _ => now_ms,
        };
        self.last_timestamp_ms = Some(now_ms);
        now_ms
    }

    /// Current smoothed score
    pub fn score(&self) -> f64 {
        self.smoother.current()
    }

    /// Reset state (on driver change)
    pub fn reset(&mut self) {
        self.blink.reset();
        self.yawn.reset();
        self.smoother.reset(self.initial_score);
        self.last_timestamp_ms = None;
        self.frames = 0;
        self.no_evidence_streak = 0;
    }
}
