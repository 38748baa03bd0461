use std::path::PathBuf;

use crate::{
    HealthStatus,
    gui::screens::{ScreenMessage, results::ResultsScreen, upload_form::UploadFormScreen},
};

#[derive(Debug, Clone)]
pub enum Message {
    UploadForm(ScreenMessage<UploadFormScreen>),
    Results(ScreenMessage<ResultsScreen>),
    FileDropped(PathBuf),
    /// Image bytes fetched for the response with this `image_url`.
    ResultImageLoaded(String, Result<Vec<u8>, String>),
    CheckHealth,
    HealthChecked(Result<HealthStatus, String>),
}
