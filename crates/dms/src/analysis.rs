//! DMS analysis results and events

use crate::state::Advisory;
use serde::{Deserialize, Serialize};

/// Discrete event emitted by a detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DmsEvent {
    /// Eye reopened after a closure longer than the slow-blink minimum
    SlowBlink { at_ms: u64 },

    /// Mouth opened past the yawn threshold
    Yawn { at_ms: u64 },
}

/// Result of one processed frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VigilanceAnalysis {
    /// Frame timestamp after clamping
    pub timestamp_ms: u64,

    /// Whether a face was detected
    pub face_detected: bool,

    /// Eye aspect ratio (if a face was seen)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ear: Option<f64>,

    /// Mouth aspect ratio (if a face was seen)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mar: Option<f64>,

    pub yawns_per_minute: usize,

    pub slow_blinks_per_minute: usize,

    /// Calibrated controller output for this frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_score: Option<f64>,

    /// Smoothed vigilance score (0-100)
    pub score: f64,

    /// Advisory for the smoothed score; `None` while no face is visible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Advisory>,

    /// Events emitted by this frame
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub events: Vec<DmsEvent>,

    /// No rule fired and the fallback score was used
    pub no_evidence: bool,
}

impl VigilanceAnalysis {
    /// Recommended action for the current advisory
    pub fn recommendation(&self) -> Option<&'static str> {
        self.advisory.map(|a| a.recommendation())
    }

    /// Score as a whole percentage
    pub fn percentage(&self) -> u8 {
        self.score.round().clamp(0.0, 100.0) as u8
    }

    /// Check if the driver should pull over or take a break
    pub fn needs_break(&self) -> bool {
        self.advisory
            .map_or(false, |a| a.is_more_severe_than(Advisory::VigilanceDeclining))
    }

    /// Check if this frame emitted any event
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers() {
        let analysis = VigilanceAnalysis {
            face_detected: true,
            score: 42.6,
            advisory: Some(Advisory::PauseRecommended),
            events: vec![DmsEvent::Yawn { at_ms: 10 }],
            ..Default::default()
        };

        assert_eq!(analysis.percentage(), 43);
        assert!(analysis.needs_break());
        assert!(analysis.has_events());
        assert_eq!(
            analysis.recommendation(),
            Some("Take a break as soon as possible.")
        );
    }

    #[test]
    fn test_no_face_serialization() {
        let analysis = VigilanceAnalysis {
            timestamp_ms: 5,
            score: 100.0,
            ..Default::default()
        };
        let json = serde_json::to_value(&analysis).unwrap();

        assert_eq!(json["face_detected"], false);
        assert!(json.get("advisory").is_none());
        assert!(json.get("events").is_none());
        assert!(!analysis.needs_break());
    }

    #[test]
    fn test_event_tagging() {
        let json = serde_json::to_string(&DmsEvent::SlowBlink { at_ms: 1_500 }).unwrap();
        assert_eq!(json, r#"{"kind":"slow_blink","at_ms":1500}"#);
    }
}
