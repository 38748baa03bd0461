//! Turns the page's `UiState` into a description of the results panel.
//!
//! Nothing here touches the GUI toolkit, so the same view drives the iced
//! results screen and the `detect` subcommand's table.

use time::OffsetDateTime;

use crate::{
    models::{Detection, DetectionResponse},
    page::UiState,
};

pub const LOADING_MESSAGE: &str = "Processing image...";
pub const EMPTY_MESSAGE: &str = "Upload an image to see detection results";
pub const FAILURE_TITLE: &str = "Failed to process image";
pub const FAILURE_HINT: &str = "Please try again with a different image";
pub const NO_DETECTIONS_MESSAGE: &str = "No objects detected in this image";
pub const LOWER_THRESHOLD_HINT: &str = "Try lowering the confidence threshold in settings";

/// Coarse fill level of a confidence bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    Full,
    FiveSixths,
    FourFifths,
    ThreeFifths,
    Half,
    TwoFifths,
    Third,
    Fifth,
    Sixth,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f32) -> Self {
        use ConfidenceBand::*;
        match confidence {
            c if c >= 0.9 => Full,
            c if c >= 0.8 => FiveSixths,
            c if c >= 0.7 => FourFifths,
            c if c >= 0.6 => ThreeFifths,
            c if c >= 0.5 => Half,
            c if c >= 0.4 => TwoFifths,
            c if c >= 0.3 => Third,
            c if c >= 0.2 => Fifth,
            _ => Sixth,
        }
    }

    /// `(filled, total)` portions of the bar.
    pub fn portions(self) -> (u16, u16) {
        use ConfidenceBand::*;
        match self {
            Full => (1, 1),
            FiveSixths => (5, 6),
            FourFifths => (4, 5),
            ThreeFifths => (3, 5),
            Half => (1, 2),
            TwoFifths => (2, 5),
            Third => (1, 3),
            Fifth => (1, 5),
            Sixth => (1, 6),
        }
    }

    pub fn fraction(self) -> f32 {
        let (filled, total) = self.portions();
        filled as f32 / total as f32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRow {
    pub label: String,
    pub class_id: i64,
    pub band: ConfidenceBand,
    pub percent: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl DetectionRow {
    pub fn from_detection(detection: &Detection) -> Self {
        let bbox = &detection.bbox;
        Self {
            label: detection.class_name.clone(),
            class_id: detection.class_id,
            band: ConfidenceBand::from_confidence(detection.confidence),
            percent: format!("{:.1}%", detection.confidence * 100.0),
            x: bbox.x1.round() as i64,
            y: bbox.y1.round() as i64,
            width: bbox.width().round() as i64,
            height: bbox.height().round() as i64,
        }
    }

    pub fn position(&self) -> String {
        format!("x: {}, y: {}", self.x, self.y)
    }

    pub fn size(&self) -> String {
        format!("w: {}, h: {}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub object_count: usize,
    pub processing_time: String,
    pub image_size: String,
}

impl Summary {
    pub fn from_response(response: &DetectionResponse) -> Self {
        Self {
            object_count: response.detections.len(),
            processing_time: format!("{:.2}s", response.processing_time),
            image_size: format!("{} × {}", response.image_size.0, response.image_size.1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub image_url: String,
    pub summary: Summary,
    /// Same order as the response
    pub rows: Vec<DetectionRow>,
}

impl ResultsView {
    pub fn heading(&self) -> String {
        format!("Detected Objects ({})", self.rows.len())
    }

    pub fn has_detections(&self) -> bool {
        !self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Loading,
    Empty,
    Failure { message: String },
    Results(ResultsView),
}

pub fn present(state: &UiState) -> ResultView {
    match state {
        UiState::Loading => ResultView::Loading,
        UiState::Idle => ResultView::Empty,
        UiState::Failure(message) => ResultView::Failure {
            message: message.clone(),
        },
        UiState::Success(response) => ResultView::Results(ResultsView {
            image_url: response.image_url.clone(),
            summary: Summary::from_response(response),
            rows: response
                .detections
                .iter()
                .map(DetectionRow::from_detection)
                .collect(),
        }),
    }
}

/// Name offered when saving the annotated image.
pub fn download_file_name(now: OffsetDateTime) -> String {
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    format!("detection_result_{}.jpg", millis)
}
