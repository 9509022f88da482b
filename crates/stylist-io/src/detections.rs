//! Detector output parsing.
//!
//! Face detection runs outside this program. Its result arrives as JSON,
//! either a bare array of faces or an object carrying the size of the image
//! the detector saw:
//!
//! ```json
//! { "inputSize": { "width": 640, "height": 480 },
//!   "faces": [ { "box": { "x": 210, "y": 96, "width": 180, "height": 220 },
//!                "score": 0.97, "age": 27.4, "gender": "male",
//!                "genderProbability": 0.91 } ] }
//! ```
//!
//! A face may instead nest its box and score under `"detection"`, and the
//! underscore-prefixed field names of a serialised face-api.js detection
//! (`_box`, `_x`, `_score`, ...) are accepted as well.

use serde::Deserialize;
use std::path::Path;
use stylist_core::{BoundingBox, Detection, PersonAttributes};

#[derive(Debug, thiserror::Error)]
pub enum DetectionsError {
    #[error("cannot read detections file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed detections JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("face {index}: {reason}")]
    InvalidFace { index: usize, reason: String },
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RawBox {
    #[serde(alias = "_x")]
    x: f32,
    #[serde(alias = "_y")]
    y: f32,
    #[serde(alias = "_width")]
    width: f32,
    #[serde(alias = "_height")]
    height: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct RawDetection {
    #[serde(rename = "box", alias = "_box")]
    bbox: RawBox,
    #[serde(alias = "_score")]
    score: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFace {
    #[serde(rename = "box")]
    bbox: Option<RawBox>,
    score: Option<f32>,
    detection: Option<RawDetection>,
    age: Option<f32>,
    gender: Option<String>,
    gender_probability: Option<f32>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RawSize {
    width: u32,
    height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawOutput {
    Faces(Vec<RawFace>),
    Wrapped {
        #[serde(rename = "inputSize")]
        input_size: Option<RawSize>,
        faces: Vec<RawFace>,
    },
}

/// One face with whatever attributes the detector estimated.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFace {
    pub detection: Detection,
    pub attributes: Option<PersonAttributes>,
}

/// All faces found in one photo.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectionSet {
    /// Size of the image the detector ran on, if it differs from the photo.
    pub input_size: Option<(u32, u32)>,
    pub faces: Vec<DetectedFace>,
}

impl DetectionSet {
    pub fn parse(json: &str) -> Result<Self, DetectionsError> {
        let (input_size, raw_faces) = match serde_json::from_str::<RawOutput>(json)? {
            RawOutput::Faces(faces) => (None, faces),
            RawOutput::Wrapped { input_size, faces } => {
                (input_size.map(|s| (s.width, s.height)), faces)
            }
        };

        let faces = raw_faces
            .into_iter()
            .enumerate()
            .map(|(index, raw)| convert_face(index, raw))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(faces = faces.len(), ?input_size, "detections parsed");
        Ok(Self { input_size, faces })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DetectionsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DetectionsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&json)
    }

    /// Map every box into the coordinate space of a `width × height` photo
    /// and clip it to the photo's bounds.
    pub fn to_frame_space(&self, width: u32, height: u32) -> Self {
        let to = (width as f32, height as f32);
        let from = self.input_size.map(|(w, h)| (w as f32, h as f32)).unwrap_or(to);

        let faces = self
            .faces
            .iter()
            .map(|face| {
                let bbox = face.detection.bbox.rescale(from, to).clamp_to(to.0, to.1);
                DetectedFace {
                    detection: Detection {
                        bbox,
                        score: face.detection.score,
                    },
                    attributes: face.attributes.clone(),
                }
            })
            .collect();

        Self {
            input_size: Some((width, height)),
            faces,
        }
    }

    pub fn detections(&self) -> Vec<Detection> {
        self.faces.iter().map(|f| f.detection.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

fn convert_face(index: usize, raw: RawFace) -> Result<DetectedFace, DetectionsError> {
    let invalid = |reason: String| DetectionsError::InvalidFace { index, reason };

    let (bbox, score) = match (raw.detection, raw.bbox, raw.score) {
        (Some(d), _, _) => (d.bbox, d.score),
        (None, Some(b), Some(s)) => (b, s),
        (None, Some(_), None) => return Err(invalid("missing score".into())),
        (None, None, _) => return Err(invalid("missing box".into())),
    };

    let coords = [bbox.x, bbox.y, bbox.width, bbox.height];
    if coords.iter().any(|v| !v.is_finite()) {
        return Err(invalid("box has non-finite coordinates".into()));
    }
    if bbox.width < 0.0 || bbox.height < 0.0 {
        return Err(invalid(format!(
            "negative box size {}x{}",
            bbox.width, bbox.height
        )));
    }
    if !(0.0..=1.0).contains(&score) {
        return Err(invalid(format!("score {score} outside [0, 1]")));
    }

    let attributes = match (raw.age, raw.gender) {
        (Some(age), Some(gender)) => Some(PersonAttributes {
            age: age.max(0.0).round() as u32,
            gender,
            gender_confidence: raw.gender_probability.unwrap_or(0.0).clamp(0.0, 1.0),
        }),
        _ => None,
    };

    Ok(DetectedFace {
        detection: Detection {
            bbox: BoundingBox::new(bbox.x, bbox.y, bbox.width, bbox.height),
            score,
        },
        attributes,
    })
}
