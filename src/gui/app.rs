use iced::{
    Alignment::Center,
    Element, Event, Length, Subscription, Task, event,
    widget::{button, column, container, image, row, scrollable, text},
    window,
};
use tracing::{debug, info, warn};

use super::{AppState, Message};
use crate::{
    DetectionClient, DetectionOutcome,
    gui::{
        screens::{
            Screen, ScreenMessage,
            results::ResultsScreen,
            upload_form::{UploadFormMessage, UploadFormParentMessage, UploadFormScreen},
        },
        widgets::{card, summary_line},
    },
    presenter::{self, ResultView},
};

pub struct DetectViewApp {
    state: AppState,
    upload_form: UploadFormScreen,
    results: ResultsScreen,
}

impl DetectViewApp {
    pub fn new(client: DetectionClient, default_confidence: f32) -> (Self, Task<Message>) {
        (
            Self {
                state: AppState::new(client),
                upload_form: UploadFormScreen::new(default_confidence),
                results: ResultsScreen::default(),
            },
            Task::done(Message::CheckHealth),
        )
    }

    pub fn title(&self) -> String {
        "DetectView - Object Detection".to_string()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(file_dropped)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UploadForm(ScreenMessage::ScreenMessage(msg)) => self
                .upload_form
                .update(msg, &mut self.state)
                .map(Message::UploadForm),
            Message::UploadForm(ScreenMessage::ParentMessage(parent_msg)) => match parent_msg {
                UploadFormParentMessage::DetectionStarted => {
                    if let Err(err) = self.state.page.begin_submission() {
                        warn!(%err, "submission refused");
                    }
                    self.state.result_image = None;
                    self.state.result_image_error = None;
                    self.results.reset();
                    Task::none()
                }
                UploadFormParentMessage::DetectionCompleted(outcome) => {
                    let image_url = match &outcome {
                        DetectionOutcome::Success(response) => Some(response.image_url.clone()),
                        DetectionOutcome::Failure(_) => None,
                    };
                    self.state.page.finish(outcome);
                    match image_url {
                        Some(image_url) => {
                            let client = self.state.client.clone();
                            Task::perform(
                                async move {
                                    let result = client
                                        .fetch_image(&image_url)
                                        .await
                                        .map_err(|e| e.to_string());
                                    (image_url, result)
                                },
                                |(image_url, result)| Message::ResultImageLoaded(image_url, result),
                            )
                        }
                        None => Task::none(),
                    }
                }
            },
            Message::Results(ScreenMessage::ScreenMessage(msg)) => self
                .results
                .update(msg, &mut self.state)
                .map(Message::Results),
            Message::Results(ScreenMessage::ParentMessage(never)) => match never {},
            Message::FileDropped(path) => self
                .upload_form
                .update(UploadFormMessage::FileDropped(path), &mut self.state)
                .map(Message::UploadForm),
            Message::ResultImageLoaded(image_url, result) => {
                let current = self.state.page.response().map(|r| r.image_url.as_str());
                if current != Some(image_url.as_str()) {
                    debug!(%image_url, "dropping image for a superseded response");
                    return Task::none();
                }
                match result {
                    Ok(bytes) => {
                        self.state.result_image = Some(image::Handle::from_bytes(bytes));
                        self.state.result_image_error = None;
                    }
                    Err(error) => {
                        warn!(%error, "could not fetch result image");
                        self.state.result_image_error = Some(error);
                    }
                }
                Task::none()
            }
            Message::CheckHealth => {
                self.state.backend_health = None;
                let client = self.state.client.clone();
                Task::perform(
                    async move { client.health().await.map_err(|e| e.to_string()) },
                    Message::HealthChecked,
                )
            }
            Message::HealthChecked(result) => {
                match &result {
                    Ok(status) => info!(
                        status = %status.status,
                        model_loaded = status.model_loaded,
                        device = %status.device,
                        "detection service health"
                    ),
                    Err(error) => warn!(%error, "detection service unreachable"),
                }
                self.state.backend_health = Some(result);
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = column![
            text("Object Detection").size(36),
            text("Upload an image and detect objects with the remote detection service"),
            self.backend_line(),
        ]
        .spacing(8)
        .align_x(Center);

        let mut left = column![self.upload_form.view(&self.state).map(Message::UploadForm)]
            .spacing(24)
            .width(Length::FillPortion(1));
        if let ResultView::Results(view) = presenter::present(self.state.page.state()) {
            left = left.push(card(
                column![
                    text("Detection Summary").size(18),
                    summary_line("Objects detected:", view.summary.object_count.to_string()),
                    summary_line("Processing time:", view.summary.processing_time),
                    summary_line("Image size:", view.summary.image_size),
                ]
                .spacing(8),
            ));
        }

        let right = container(self.results.view(&self.state).map(Message::Results))
            .width(Length::FillPortion(1));

        let content = column![header, row![left, right].spacing(32)]
            .spacing(32)
            .padding(32)
            .max_width(1200);

        scrollable(container(content).center_x(Length::Fill)).into()
    }

    fn backend_line(&self) -> Element<'_, Message> {
        let origin = self.state.client.origin().as_str();
        let status = match &self.state.backend_health {
            None => text(format!("Checking {}...", origin)).size(14),
            Some(Ok(health)) if health.is_ready() => {
                text(format!("{} is ready ({})", origin, health.device)).size(14)
            }
            Some(Ok(health)) => text(format!(
                "{} reports {} (model loaded: {})",
                origin, health.status, health.model_loaded
            ))
            .size(14)
            .style(text::danger),
            Some(Err(error)) => text(format!("{} unreachable: {}", origin, error))
                .size(14)
                .style(text::danger),
        };
        row![status, button(text("Recheck").size(14)).on_press(Message::CheckHealth)]
            .spacing(12)
            .align_y(Center)
            .into()
    }
}

fn file_dropped(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        _ => None,
    }
}
