//! Eye and mouth aspect ratios from facial landmarks

use crate::DmsError;
use serde::{Deserialize, Serialize};

/// 2-D point (pixels once scaled)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance
    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Eye aspect ratio (EAR)
///
/// Points are ordered `[left_corner, top1, top2, right_corner, bottom2, bottom1]`:
/// `(|top1 - bottom1| + |top2 - bottom2|) / (2 |left - right|)`.
/// A degenerate eye (zero width) yields 0.0.
pub fn eye_aspect_ratio(points: &[Point2; 6]) -> f64 {
    let [left, top1, top2, right, bottom2, bottom1] = points;
    let horizontal = left.distance(right);
    if horizontal == 0.0 {
        return 0.0;
    }
    (top1.distance(bottom1) + top2.distance(bottom2)) / (2.0 * horizontal)
}

/// Mouth aspect ratio (MAR): `|top - bottom| / |left - right|`, 0.0 for a
/// zero-width mouth
pub fn mouth_aspect_ratio(top: Point2, bottom: Point2, left: Point2, right: Point2) -> f64 {
    let horizontal = left.distance(&right);
    if horizontal == 0.0 {
        return 0.0;
    }
    top.distance(&bottom) / horizontal
}

/// Landmark indices used for the ratios (face-mesh topology)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkIndices {
    pub left_eye: [usize; 6],
    pub right_eye: [usize; 6],
    pub mouth_top: usize,
    pub mouth_bottom: usize,
    pub mouth_left: usize,
    pub mouth_right: usize,
}

impl Default for LandmarkIndices {
    fn default() -> Self {
        Self {
            left_eye: [33, 160, 158, 133, 153, 144],
            right_eye: [362, 385, 387, 263, 373, 380],
            mouth_top: 13,
            mouth_bottom: 14,
            mouth_left: 61,
            mouth_right: 291,
        }
    }
}

/// Normalized landmarks of one face plus the frame size they refer to
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLandmarks {
    points: Vec<Point2>,
    width: f64,
    height: f64,
}

impl FaceLandmarks {
    /// Wrap normalized (0-1) landmarks of a `width` x `height` frame
    pub fn new(points: Vec<Point2>, width: f64, height: f64) -> Self {
        Self { points, width, height }
    }

    /// Build from `(x, y)` pairs
    pub fn from_pairs(pairs: &[[f64; 2]], width: f64, height: f64) -> Self {
        let points = pairs.iter().map(|[x, y]| Point2::new(*x, *y)).collect();
        Self::new(points, width, height)
    }

    /// Number of landmarks
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if there are no landmarks
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Landmark `index` scaled to pixels
    pub fn point(&self, index: usize) -> Result<Point2, DmsError> {
        self.points
            .get(index)
            .map(|p| Point2::new(p.x * self.width, p.y * self.height))
            .ok_or(DmsError::KeypointsMissing {
                index,
                available: self.points.len(),
            })
    }

    fn eye(&self, indices: &[usize; 6]) -> Result<[Point2; 6], DmsError> {
        let mut points = [Point2::default(); 6];
        for (slot, &index) in points.iter_mut().zip(indices) {
            *slot = self.point(index)?;
        }
        Ok(points)
    }

    /// EAR of the eye selected by `indices`
    pub fn ear(&self, indices: &[usize; 6]) -> Result<f64, DmsError> {
        Ok(eye_aspect_ratio(&self.eye(indices)?))
    }

    /// Mean EAR of both eyes
    pub fn average_ear(&self, indices: &LandmarkIndices) -> Result<f64, DmsError> {
        let left = self.ear(&indices.left_eye)?;
        let right = self.ear(&indices.right_eye)?;
        Ok((left + right) / 2.0)
    }

    /// MAR of the mouth
    pub fn mar(&self, indices: &LandmarkIndices) -> Result<f64, DmsError> {
        Ok(mouth_aspect_ratio(
            self.point(indices.mouth_top)?,
            self.point(indices.mouth_bottom)?,
            self.point(indices.mouth_left)?,
            self.point(indices.mouth_right)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eye(openness: f64) -> [Point2; 6] {
        [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, openness),
            Point2::new(3.0, openness),
            Point2::new(4.0, 0.0),
            Point2::new(3.0, -openness),
            Point2::new(1.0, -openness),
        ]
    }

    #[test]
    fn test_ear_formula() {
        // Vertical distances 2 * 0.6 each, horizontal 4
        let ear = eye_aspect_ratio(&eye(0.6));
        assert!((ear - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_geometry() {
        let p = Point2::new(2.0, 2.0);
        assert_eq!(eye_aspect_ratio(&[p; 6]), 0.0);
        assert_eq!(mouth_aspect_ratio(Point2::new(0.0, 1.0), Point2::new(0.0, -1.0), p, p), 0.0);
    }

    #[test]
    fn test_mar_formula() {
        let mar = mouth_aspect_ratio(
            Point2::new(5.0, 2.0),
            Point2::new(5.0, -2.0),
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
        );
        assert!((mar - 0.4).abs() < 1e-12);
    }

    fn synthetic_face(eye_open: f64, mouth_open: f64) -> (FaceLandmarks, LandmarkIndices) {
        let indices = LandmarkIndices {
            left_eye: [0, 1, 2, 3, 4, 5],
            right_eye: [6, 7, 8, 9, 10, 11],
            mouth_top: 12,
            mouth_bottom: 13,
            mouth_left: 14,
            mouth_right: 15,
        };
        // Normalized to a 100 x 100 frame
        let mut pairs: Vec<[f64; 2]> = Vec::new();
        for offset in [0.1, 0.6] {
            for p in eye(eye_open) {
                pairs.push([offset + p.x / 100.0, 0.4 + p.y / 100.0]);
            }
        }
        pairs.push([0.5, 0.8 - mouth_open / 200.0]);
        pairs.push([0.5, 0.8 + mouth_open / 200.0]);
        pairs.push([0.45, 0.8]);
        pairs.push([0.55, 0.8]);
        (FaceLandmarks::from_pairs(&pairs, 100.0, 100.0), indices)
    }

    #[test]
    fn test_landmarks_scaled_ratios() {
        let (face, indices) = synthetic_face(0.6, 5.0);

        assert!((face.average_ear(&indices).unwrap() - 0.3).abs() < 1e-9);
        assert!((face.mar(&indices).unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_landmark() {
        let face = FaceLandmarks::from_pairs(&[[0.1, 0.1]], 640.0, 480.0);
        let err = face.average_ear(&LandmarkIndices::default()).unwrap_err();
        assert!(matches!(err, DmsError::KeypointsMissing { index: 33, available: 1 }));
    }
}
