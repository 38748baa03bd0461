#![allow(dead_code, unused_imports)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from detectview for tests
pub use detectview::{
    Config, ConfidenceBand, DetectionClient, DetectionOutcome, DetectionPage, DetectionResponse,
    FileCandidate, ResultView, UiState, UploadController, UploadRequest, ValidationError,
};
