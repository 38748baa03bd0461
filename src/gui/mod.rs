mod app;
mod message;
mod screens;
mod state;
mod widgets;

pub use app::DetectViewApp;
pub use message::Message;
pub use state::AppState;

use crate::{Config, DetectionClient};

/// Opens the desktop client and blocks until its window is closed.
pub fn run(config: Config) -> anyhow::Result<()> {
    let client = DetectionClient::new(&config)?;
    let default_confidence = config.upload.default_confidence;

    iced::application(
        move || DetectViewApp::new(client.clone(), default_confidence),
        DetectViewApp::update,
        DetectViewApp::view,
    )
    .title(DetectViewApp::title)
    .subscription(DetectViewApp::subscription)
    .window_size((1100.0, 760.0))
    .run()?;

    Ok(())
}
