//! Input frame records (one JSON object per line)

use dms::FaceLandmarks;
use serde::{Deserialize, Serialize};

/// Precomputed eye and mouth aspect ratios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioFrame {
    pub t_ms: u64,
    pub ear: f64,
    pub mar: f64,
}

/// Normalized landmarks of a `width` x `height` frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    pub t_ms: u64,
    pub width: f64,
    pub height: f64,
    pub landmarks: Vec<[f64; 2]>,
}

/// Frame in which no face was found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyFrame {
    pub t_ms: u64,
}

/// One recorded frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameRecord {
    Ratios(RatioFrame),
    Landmarks(LandmarkFrame),
    NoFace(EmptyFrame),
}

impl FrameRecord {
    /// Parse one input line
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Frame timestamp
    pub fn timestamp_ms(&self) -> u64 {
        match self {
            FrameRecord::Ratios(frame) => frame.t_ms,
            FrameRecord::Landmarks(frame) => frame.t_ms,
            FrameRecord::NoFace(frame) => frame.t_ms,
        }
    }
}

impl LandmarkFrame {
    pub fn face(&self) -> FaceLandmarks {
        FaceLandmarks::from_pairs(&self.landmarks, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        let ratios = FrameRecord::parse(r#"{"t_ms": 10, "ear": 0.3, "mar": 0.1}"#).unwrap();
        assert_eq!(
            ratios,
            FrameRecord::Ratios(RatioFrame {
                t_ms: 10,
                ear: 0.3,
                mar: 0.1
            })
        );

        let landmarks = FrameRecord::parse(
            r#"{"t_ms": 20, "width": 640, "height": 480, "landmarks": [[0.1, 0.2], [0.3, 0.4]]}"#,
        )
        .unwrap();
        match &landmarks {
            FrameRecord::Landmarks(frame) => assert_eq!(frame.face().len(), 2),
            other => panic!("unexpected record {:?}", other),
        }
        assert_eq!(landmarks.timestamp_ms(), 20);

        let empty = FrameRecord::parse(r#"{"t_ms": 30}"#).unwrap();
        assert_eq!(empty, FrameRecord::NoFace(EmptyFrame { t_ms: 30 }));
    }

    #[test]
    fn test_incomplete_records_rejected() {
        // Half a ratio frame must not pass as a faceless frame
        assert!(FrameRecord::parse(r#"{"t_ms": 10, "ear": 0.3}"#).is_err());
        assert!(FrameRecord::parse(r#"{"ear": 0.3, "mar": 0.1}"#).is_err());
        assert!(FrameRecord::parse("not json").is_err());
    }
}
