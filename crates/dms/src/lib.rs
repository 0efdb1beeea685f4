//! Driver Monitoring System (DMS)
//!
//! Driver vigilance estimation from facial landmarks:
//! - Eye and mouth aspect ratios
//! - Debounced slow-blink and yawn counting over a trailing minute
//! - Fuzzy vigilance score, smoothed over time
//! - Advisory classification with a fixed recommendation per level

pub mod analysis;
pub mod config;
pub mod detector;
pub mod geometry;
pub mod smoother;
pub mod state;

pub use analysis::{DmsEvent, VigilanceAnalysis};
pub use config::{BlinkConfig, DmsConfig, YawnConfig};
pub use detector::{DetectorState, EventDetector, SlowBlinkDetector, YawnDetector};
pub use geometry::{FaceLandmarks, LandmarkIndices, Point2};
pub use smoother::ScoreSmoother;
pub use state::{Advisory, AdvisoryBands, SessionState};

use fuzzy_engine::{FuzzyController, FuzzyError};
use metrics::{counter, gauge};
use thiserror::Error;
use tracing::{debug, info, warn};

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fuzzy controller error: {0}")]
    Fuzzy(#[from] FuzzyError),

    #[error("Landmark {index} missing (face has {available})")]
    KeypointsMissing { index: usize, available: usize },
}

/// Immutable vigilance pipeline: detectors settings, controller and bands.
///
/// All per-driver state lives in [`SessionState`], so one engine can serve
/// any number of sessions.
#[derive(Debug, Clone)]
pub struct VigilanceEngine {
    config: DmsConfig,
    controller: FuzzyController,
}

impl VigilanceEngine {
    /// Validate `config` and build the controller
    pub fn new(config: DmsConfig) -> Result<Self, DmsError> {
        config.validate()?;
        let controller = FuzzyController::new(&config.fuzzy)?;

        info!(
            alpha = config.smoothing_alpha,
            retention_ms = config.window_retention_ms,
            policy = ?config.fuzzy.policy,
            "Vigilance engine ready"
        );

        Ok(Self { config, controller })
    }

    /// Fresh session using this engine's settings
    pub fn new_session(&self) -> SessionState {
        SessionState::new(&self.config)
    }

    /// Run the pipeline for one frame with a visible face.
    ///
    /// Non-finite ratios carry no measurement; such a frame is reported
    /// like one without a face and leaves the session untouched.
    pub fn step(&self, session: &mut SessionState, ear: f64, mar: f64, now_ms: u64) -> VigilanceAnalysis {
        if !ear.is_finite() || !mar.is_finite() {
            warn!("Discarding frame at {}ms with non-finite ratios (EAR {}, MAR {})", now_ms, ear, mar);
            return self.absent(session, now_ms);
        }

        let now_ms = session.advance_clock(now_ms);
        session.frames += 1;

        let mut events = Vec::new();
        if let Some(at_ms) = session.blink.update(ear, now_ms) {
            counter!("dms_slow_blinks_total").increment(1);
            events.push(DmsEvent::SlowBlink { at_ms });
        }
        if let Some(at_ms) = session.yawn.update(mar, now_ms) {
            counter!("dms_yawns_total").increment(1);
            events.push(DmsEvent::Yawn { at_ms });
        }

        let yawns = session.yawn.rate();
        let blinks = session.blink.rate();
        let inference = self.controller.evaluate(ear, yawns as f64, blinks as f64);

        let no_evidence = inference.no_evidence();
        if no_evidence {
            session.no_evidence_streak += 1;
            counter!("dms_no_evidence_total").increment(1);
        } else {
            session.no_evidence_streak = 0;
        }

        let score = session.smoother.update(inference.score);
        gauge!("dms_vigilance_score").set(score);
        let advisory = self.classify(score);

        debug!(
            now_ms,
            ear,
            mar,
            yawns,
            blinks,
            raw = inference.score,
            score,
            advisory = advisory.as_str(),
            "Frame processed"
        );

        VigilanceAnalysis {
            timestamp_ms: now_ms,
            face_detected: true,
            ear: Some(ear),
            mar: Some(mar),
            yawns_per_minute: yawns,
            slow_blinks_per_minute: blinks,
            raw_score: Some(inference.score),
            score,
            advisory: Some(advisory),
            events,
            no_evidence,
        }
    }

    /// Report for a frame without a face. The session is left untouched;
    /// rates are counted at the frame time.
    pub fn absent(&self, session: &SessionState, now_ms: u64) -> VigilanceAnalysis {
        debug!(now_ms, "No face in frame");
        let now_ms = session.last_timestamp_ms.map_or(now_ms, |last| last.max(now_ms));
        VigilanceAnalysis {
            timestamp_ms: now_ms,
            face_detected: false,
            yawns_per_minute: session.yawn.rate_at(now_ms),
            slow_blinks_per_minute: session.blink.rate_at(now_ms),
            score: session.score(),
            ..Default::default()
        }
    }

    /// Advisory for a score
    pub fn classify(&self, score: f64) -> Advisory {
        self.config.bands.classify(score)
    }

    /// Get configuration
    pub fn config(&self) -> &DmsConfig {
        &self.config
    }

    /// Get the fuzzy controller
    pub fn controller(&self) -> &FuzzyController {
        &self.controller
    }
}

/// Driver monitoring module: one engine plus the state of the current driver
#[derive(Debug, Clone)]
pub struct VigilanceMonitor {
    engine: VigilanceEngine,
    session: SessionState,
}

impl VigilanceMonitor {
    /// Create a new monitor with configuration
    pub fn new(config: DmsConfig) -> Result<Self, DmsError> {
        let engine = VigilanceEngine::new(config)?;
        let session = engine.new_session();
        Ok(Self { engine, session })
    }

    /// Process precomputed EAR/MAR
    pub fn step(&mut self, ear: f64, mar: f64, now_ms: u64) -> VigilanceAnalysis {
        self.engine.step(&mut self.session, ear, mar, now_ms)
    }

    /// Process one frame's landmarks, or `None` when no face was found
    pub fn observe(&mut self, face: Option<&FaceLandmarks>, now_ms: u64) -> Result<VigilanceAnalysis, DmsError> {
        let Some(face) = face else {
            return Ok(self.engine.absent(&self.session, now_ms));
        };

        let indices = &self.engine.config().landmarks;
        let ear = face.average_ear(indices)?;
        let mar = face.mar(indices)?;
        Ok(self.step(ear, mar, now_ms))
    }

    /// Reset driver state (on driver change)
    pub fn reset_session(&mut self) {
        info!("Resetting vigilance session after {} frames", self.session.frames);
        self.session.reset();
    }

    /// Get engine
    pub fn engine(&self) -> &VigilanceEngine {
        &self.engine
    }

    /// Get session state
    pub fn session(&self) -> &SessionState {
        &self.session
    }
}
