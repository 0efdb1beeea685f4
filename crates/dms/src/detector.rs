//! Debounced slow-blink and yawn detectors

use crate::config::{BlinkConfig, YawnConfig};
use event_window::EventWindow;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Edge-triggered detector state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorState {
    /// Condition currently held (eye closed / mouth open)
    pub active: bool,
    /// When the current activation began
    pub activated_at: Option<u64>,
    /// When the last activation ended
    pub deactivated_at: Option<u64>,
}

impl DetectorState {
    fn activate(&mut self, now_ms: u64) {
        self.active = true;
        self.activated_at = Some(now_ms);
    }

    /// End the activation, returning how long it lasted
    fn deactivate(&mut self, now_ms: u64) -> u64 {
        self.active = false;
        self.deactivated_at = Some(now_ms);
        self.activated_at
            .map_or(0, |started| now_ms.saturating_sub(started))
    }
}

/// Converts a per-frame signal into discrete events counted over a window
pub trait EventDetector {
    /// Feed one frame; returns the timestamp of an event emitted by this frame
    fn update(&mut self, signal: f64, now_ms: u64) -> Option<u64>;

    /// Events within the trailing window as of the last update
    fn rate(&self) -> usize {
        self.window().len()
    }

    /// Events within the trailing window at `now_ms`, without updating
    fn rate_at(&self, now_ms: u64) -> usize {
        self.window().count_at(now_ms)
    }

    /// Current state
    fn state(&self) -> &DetectorState;

    /// Event window
    fn window(&self) -> &EventWindow;

    /// Forget state and events
    fn reset(&mut self);
}

/// Counts eye closures longer than the minimum slow-blink duration.
///
/// The blink is emitted when the eye reopens; quick blinks are ignored.
#[derive(Debug, Clone)]
pub struct SlowBlinkDetector {
    config: BlinkConfig,
    state: DetectorState,
    window: EventWindow,
}

impl SlowBlinkDetector {
    pub fn new(config: BlinkConfig, retention_ms: u64) -> Self {
        Self {
            config,
            state: DetectorState::default(),
            window: EventWindow::new(retention_ms),
        }
    }
}

impl EventDetector for SlowBlinkDetector {
    fn update(&mut self, ear: f64, now_ms: u64) -> Option<u64> {
        // No measurement: a pending closure neither ends nor continues
        if !ear.is_finite() {
            self.window.prune(now_ms);
            return None;
        }

        let mut event = None;
        if ear < self.config.closed_ear_threshold {
            if !self.state.active {
                self.state.activate(now_ms);
            }
        } else if self.state.active {
            let closed_for = self.state.deactivate(now_ms);
            if closed_for > self.config.min_closure_ms {
                debug!("Slow blink: eyes closed for {}ms", closed_for);
                self.window.push(now_ms);
                event = Some(now_ms);
            }
        }

        self.window.prune(now_ms);
        event
    }

    fn state(&self) -> &DetectorState {
        &self.state
    }

    fn window(&self) -> &EventWindow {
        &self.window
    }

    fn reset(&mut self) {
        self.state = DetectorState::default();
        self.window.clear();
    }
}

/// Counts yawns, emitted as soon as the mouth opens past the threshold.
///
/// A new yawn can only start once the cooldown has elapsed since the end
/// of the previous one, so MAR jitter around the threshold counts once.
#[derive(Debug, Clone)]
pub struct YawnDetector {
    config: YawnConfig,
    state: DetectorState,
    window: EventWindow,
}

impl YawnDetector {
    pub fn new(config: YawnConfig, retention_ms: u64) -> Self {
        Self {
            config,
            state: DetectorState::default(),
            window: EventWindow::new(retention_ms),
        }
    }

    fn cooled_down(&self, now_ms: u64) -> bool {
        self.state
            .deactivated_at
            .map_or(true, |ended| now_ms.saturating_sub(ended) > self.config.cooldown_ms)
    }
}

impl EventDetector for YawnDetector {
    fn update(&mut self, mar: f64, now_ms: u64) -> Option<u64> {
        if !mar.is_finite() {
            self.window.prune(now_ms);
            return None;
        }

        let mut event = None;
        if mar > self.config.open_mar_threshold {
            if !self.state.active && self.cooled_down(now_ms) {
                debug!("Yawn started at {}ms (MAR {:.2})", now_ms, mar);
                self.state.activate(now_ms);
                self.window.push(now_ms);
                event = Some(now_ms);
            }
        } else if self.state.active {
            self.state.deactivate(now_ms);
        }

        self.window.prune(now_ms);
        event
    }

    fn state(&self) -> &DetectorState {
        &self.state
    }

    fn window(&self) -> &EventWindow {
        &self.window
    }

    fn reset(&mut self) {
        self.state = DetectorState::default();
        self.window.clear();
    }
}
