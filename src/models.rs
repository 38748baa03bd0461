use serde::{Deserialize, Serialize};

/// Axis-aligned box in the uploaded image's pixel space.
/// Serialized as `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [f32; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x1, bbox.y1, bbox.x2, bbox.y2]
    }
}

/// One predicted object instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_name: String,
    /// Score in `[0, 1]`
    pub confidence: f32,
    pub bbox: BoundingBox,
    pub class_id: i64,
}

/// Body returned by `POST /detect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub success: bool,
    /// Path of the annotated image, relative to the backend origin
    pub image_url: String,
    /// Backend emission order, never re-sorted
    pub detections: Vec<Detection>,
    /// Seconds
    pub processing_time: f64,
    /// `(width, height)` of the uploaded image
    pub image_size: (u32, u32),
}

/// Result of a single submission.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    Success(DetectionResponse),
    Failure(String),
}

impl DetectionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DetectionOutcome::Success(_))
    }
}

/// Body returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub device: String,
}

impl HealthStatus {
    pub fn is_ready(&self) -> bool {
        self.status == "healthy" && self.model_loaded
    }
}
