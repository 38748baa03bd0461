use iced::widget::image;

use crate::{DetectionClient, DetectionPage, HealthStatus};

#[derive(Debug)]
pub struct AppState {
    pub page: DetectionPage,
    pub client: DetectionClient,
    /// Annotated image for the current `Success` state, once fetched
    pub result_image: Option<image::Handle>,
    pub result_image_error: Option<String>,
    pub backend_health: Option<Result<HealthStatus, String>>,
}

impl AppState {
    pub fn new(client: DetectionClient) -> Self {
        Self {
            page: DetectionPage::new(),
            client,
            result_image: None,
            result_image_error: None,
            backend_health: None,
        }
    }
}
