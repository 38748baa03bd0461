use std::path::PathBuf;

use iced::{
    Alignment::Center,
    Element, Length, Task,
    widget::{button, column, container, image, row, slider, text},
};
use rfd::AsyncFileDialog;
use tracing::debug;

use crate::{
    DetectionOutcome, FileCandidate, UploadController, ValidationError,
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
        widgets::{card, drop_zone},
    },
    upload::{MAX_CONFIDENCE, MIN_CONFIDENCE},
};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];
const THRESHOLD_STEP: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct UploadFormScreen {
    controller: UploadController,
    preview: Option<image::Handle>,
    show_settings: bool,
}

#[derive(Debug, Clone)]
pub enum UploadFormMessage {
    ToggleSettings,
    ConfidenceChanged(f32),
    BrowseFile,
    FileChosen(Option<PathBuf>),
    FileDropped(PathBuf),
    CandidateLoaded(Result<FileCandidate, ValidationError>),
    ClearFile,
    Submit,
    Completed(DetectionOutcome),
}

#[derive(Debug, Clone)]
pub enum UploadFormParentMessage {
    DetectionStarted,
    DetectionCompleted(DetectionOutcome),
}

impl UploadFormScreen {
    pub fn new(default_confidence: f32) -> Self {
        Self {
            controller: UploadController::new(default_confidence),
            preview: None,
            show_settings: false,
        }
    }

    fn load(path: PathBuf) -> Task<ScreenMessage<Self>> {
        Task::perform(FileCandidate::from_path(path), |result| {
            ScreenMessage::ScreenMessage(UploadFormMessage::CandidateLoaded(result))
        })
    }

    fn settings(&self) -> Element<'_, ScreenMessage<Self>> {
        let threshold = self.controller.confidence_threshold();
        column![
            text(format!("Confidence Threshold: {:.2}", threshold)).size(14),
            slider(MIN_CONFIDENCE..=MAX_CONFIDENCE, threshold, |value| {
                ScreenMessage::ScreenMessage(UploadFormMessage::ConfidenceChanged(value))
            })
            .step(THRESHOLD_STEP),
            row![
                container(text(format!("{:.1}", MIN_CONFIDENCE)).size(12)).width(Length::Fill),
                text(format!("{:.1}", MAX_CONFIDENCE)).size(12),
            ],
        ]
        .spacing(8)
        .into()
    }

    fn selected_file(&self) -> Element<'_, ScreenMessage<Self>> {
        match (self.controller.selection(), &self.preview) {
            (Some(selection), preview) => {
                let mut details = row![].spacing(16).align_y(Center);
                if let Some(handle) = preview {
                    details = details.push(
                        image(handle.clone())
                            .width(Length::Fixed(128.0))
                            .height(Length::Fixed(128.0)),
                    );
                }
                details
                    .push(column![
                        text(selection.file.name.as_str()),
                        text(format!("{:.2} MB", selection.file.size_mb())).size(14),
                    ])
                    .push(button("Remove").on_press(ScreenMessage::ScreenMessage(
                        UploadFormMessage::ClearFile,
                    )))
                    .into()
            }
            (None, _) => column![
                text("Drop an image here or click to browse").size(18),
                text("PNG, JPG, GIF up to 10MB").size(14),
                button("Select File").on_press(ScreenMessage::ScreenMessage(
                    UploadFormMessage::BrowseFile
                )),
            ]
            .spacing(12)
            .align_x(Center)
            .into(),
        }
    }
}

impl Screen for UploadFormScreen {
    type Message = UploadFormMessage;
    type ParentMessage = UploadFormParentMessage;

    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        let loading = state.page.is_loading();

        let header = row![
            container(text("Upload Image").size(22)).width(Length::Fill),
            button(if self.show_settings { "Hide settings" } else { "Settings" })
                .on_press(ScreenMessage::ScreenMessage(UploadFormMessage::ToggleSettings)),
        ]
        .align_y(Center);

        let mut content = column![header].spacing(16);
        if self.show_settings {
            content = content.push(self.settings());
        }
        content = content.push(drop_zone(self.selected_file(), loading));

        if let Some(error) = self.controller.error() {
            content = content.push(text(error).size(14).style(text::danger));
        }

        let can_submit = self.controller.selection().is_some() && !loading;
        content = content.push(
            button(
                container(text(if loading {
                    "Detecting Objects..."
                } else {
                    "Detect Objects"
                }))
                .center_x(Length::Fill),
            )
            .width(Length::Fill)
            .on_press_maybe(
                can_submit.then_some(ScreenMessage::ScreenMessage(UploadFormMessage::Submit)),
            ),
        );

        card(content)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            UploadFormMessage::ToggleSettings => {
                self.show_settings = !self.show_settings;
                Task::none()
            }
            UploadFormMessage::ConfidenceChanged(value) => {
                self.controller.set_confidence_threshold(value);
                Task::none()
            }
            UploadFormMessage::BrowseFile => Task::perform(
                AsyncFileDialog::new()
                    .set_title("Select an image file")
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_file(),
                |handle| {
                    ScreenMessage::ScreenMessage(UploadFormMessage::FileChosen(
                        handle.map(|data| data.path().to_path_buf()),
                    ))
                },
            ),
            UploadFormMessage::FileChosen(Some(path)) | UploadFormMessage::FileDropped(path) => {
                debug!(path = %path.display(), "loading upload candidate");
                Self::load(path)
            }
            UploadFormMessage::FileChosen(None) => Task::none(),
            UploadFormMessage::CandidateLoaded(Ok(candidate)) => {
                if let Ok(selection) = self.controller.select_file(candidate) {
                    self.preview = Some(image::Handle::from_bytes(selection.file.bytes.clone()));
                }
                Task::none()
            }
            UploadFormMessage::CandidateLoaded(Err(err)) => {
                self.controller.reject(err);
                Task::none()
            }
            UploadFormMessage::ClearFile => {
                self.controller.clear_file();
                self.preview = None;
                Task::none()
            }
            UploadFormMessage::Submit => {
                if state.page.is_loading() {
                    return Task::none();
                }
                let Ok(request) = self.controller.prepare_submission() else {
                    return Task::none();
                };
                let client = state.client.clone();
                Task::done(ScreenMessage::ParentMessage(
                    UploadFormParentMessage::DetectionStarted,
                ))
                .chain(Task::perform(
                    async move { client.detect(request).await },
                    |outcome| ScreenMessage::ScreenMessage(UploadFormMessage::Completed(outcome)),
                ))
            }
            UploadFormMessage::Completed(outcome) => {
                if let DetectionOutcome::Failure(message) = &outcome {
                    self.controller.report_failure(message.as_str());
                }
                Task::done(ScreenMessage::ParentMessage(
                    UploadFormParentMessage::DetectionCompleted(outcome),
                ))
            }
        }
    }
}
