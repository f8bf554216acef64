// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Shape of the pose recordings the mobile client uploads.
//!
//! The relay forwards arbitrary JSON; this model is only used to describe
//! recordings on the command line.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingData {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub frames: Vec<FrameData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameData {
    /// Seconds from the start of the video.
    pub timestamp: f64,
    pub features: BTreeMap<String, Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<Landmark>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub value: f64,
    pub string_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub location: Point3D,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub camera_aspect_y: f64,
    pub z: f64,
    pub visibility: f64,
    pub presence: f64,
}

impl RecordingData {
    /// Span between first and last frame, in seconds.
    pub fn duration_secs(&self) -> f64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0.0,
        }
    }

    pub fn landmark_count(&self) -> usize {
        self.frames
            .iter()
            .filter_map(|f| f.landmarks.as_ref())
            .map(Vec::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_client_payload() {
        let text = r#"{
            "id": "test-recording-1",
            "timestamp": "2025-02-09T10:00:00Z",
            "frames": [{
                "timestamp": 1.5,
                "features": {"pose_quality": {"value": 0.95, "stringValue": "excellent"}},
                "landmarks": [{
                    "location": {"x": 0.5, "y": 0.5, "cameraAspectY": 1.0, "z": 0.1, "visibility": 1.0, "presence": 1.0},
                    "type": "body"
                }]
            }, {
                "timestamp": 3.0,
                "features": {}
            }]
        }"#;
        let rec: RecordingData = serde_json::from_str(text).unwrap();
        assert_eq!(rec.frames.len(), 2);
        assert_eq!(rec.landmark_count(), 1);
        assert_eq!(rec.duration_secs(), 1.5);
        assert_eq!(rec.frames[0].features["pose_quality"].string_value, "excellent");
    }
}
