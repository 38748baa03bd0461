pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod page;
pub mod presenter;
pub mod upload;

pub use client::DetectionClient;
pub use config::Config;
pub use error::{ClientError, ValidationError};
pub use models::{BoundingBox, Detection, DetectionOutcome, DetectionResponse, HealthStatus};
pub use page::{DetectionPage, UiState};
pub use presenter::{ConfidenceBand, DetectionRow, ResultView, ResultsView, present};
pub use upload::{FileCandidate, UploadController, UploadRequest, UploadSelection};

#[cfg(feature = "gui")]
pub mod gui;
