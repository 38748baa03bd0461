use tracing::{debug, warn};

use crate::{
    error::ValidationError,
    models::{DetectionOutcome, DetectionResponse},
};

/// What the results panel shows at any instant.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success(DetectionResponse),
    Failure(String),
}

/// Page-level owner of the single `UiState`. The upload form and results
/// panel only reach it through `begin_submission` and `finish`.
#[derive(Debug, Clone, Default)]
pub struct DetectionPage {
    state: UiState,
}

impl DetectionPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, UiState::Loading)
    }

    /// Enters `Loading` and drops any previous result. Refused while a
    /// submission is already in flight.
    pub fn begin_submission(&mut self) -> Result<(), ValidationError> {
        if self.is_loading() {
            return Err(ValidationError::Busy);
        }
        debug!("submission started");
        self.state = UiState::Loading;
        Ok(())
    }

    pub fn finish(&mut self, outcome: DetectionOutcome) {
        if !self.is_loading() {
            warn!("ignoring detection outcome with no submission in flight");
            return;
        }
        self.state = match outcome {
            DetectionOutcome::Success(response) => UiState::Success(response),
            DetectionOutcome::Failure(message) => UiState::Failure(message),
        };
    }

    pub fn response(&self) -> Option<&DetectionResponse> {
        match &self.state {
            UiState::Success(response) => Some(response),
            _ => None,
        }
    }
}
