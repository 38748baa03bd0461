use std::{convert::Infallible, path::PathBuf};

use anyhow::Context;
use iced::{
    Alignment::Center,
    Element, Length, Task,
    widget::{button, column, container, image, row, scrollable, text},
};
use rfd::AsyncFileDialog;
use time::OffsetDateTime;
use tracing::info;

use crate::{
    DetectionClient,
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
        widgets::{card, confidence_bar},
    },
    presenter::{
        self, DetectionRow, EMPTY_MESSAGE, FAILURE_HINT, FAILURE_TITLE, LOADING_MESSAGE,
        LOWER_THRESHOLD_HINT, NO_DETECTIONS_MESSAGE, ResultView, ResultsView,
    },
};

#[derive(Debug, Clone, Default)]
pub struct ResultsScreen {
    download_status: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ResultsMessage {
    Download,
    Downloaded(Result<Option<PathBuf>, String>),
}

impl ResultsScreen {
    /// Forgets per-result UI state when a new submission starts.
    pub fn reset(&mut self) {
        self.download_status = None;
    }

    fn placeholder<'a>(
        content: impl Into<Element<'a, ScreenMessage<Self>>>,
    ) -> Element<'a, ScreenMessage<Self>> {
        card(
            container(content)
                .center_x(Length::Fill)
                .center_y(Length::Fixed(256.0)),
        )
    }

    fn results<'a>(
        &'a self,
        view: ResultsView,
        state: &'a AppState,
    ) -> Element<'a, ScreenMessage<Self>> {
        let image_panel: Element<'_, ScreenMessage<Self>> = match &state.result_image {
            Some(handle) => image(handle.clone()).width(Length::Fill).into(),
            None => match &state.result_image_error {
                Some(error) => text(format!("Could not load result image: {}", error))
                    .size(14)
                    .style(text::danger)
                    .into(),
                None => text("Loading result image...").size(14).into(),
            },
        };

        let mut image_card = column![
            row![
                container(text("Detection Results").size(20)).width(Length::Fill),
                button("Download")
                    .on_press(ScreenMessage::ScreenMessage(ResultsMessage::Download)),
            ]
            .align_y(Center),
            image_panel,
        ]
        .spacing(16);
        if let Some(status) = &self.download_status {
            image_card = image_card.push(text(status.as_str()).size(14));
        }

        let detections: Element<'_, ScreenMessage<Self>> = if view.has_detections() {
            let mut table = column![table_row(
                text("OBJECT").size(12),
                text("CONFIDENCE").size(12),
                text("BOUNDING BOX").size(12),
            )]
            .spacing(10);
            for detection in view.rows.iter().map(detection_row) {
                table = table.push(detection);
            }
            scrollable(table).height(Length::Shrink).into()
        } else {
            column![
                text(NO_DETECTIONS_MESSAGE),
                text(LOWER_THRESHOLD_HINT).size(14),
            ]
            .spacing(8)
            .align_x(Center)
            .width(Length::Fill)
            .into()
        };

        column![
            card(image_card),
            card(column![text(view.heading()).size(20), detections].spacing(16)),
        ]
        .spacing(24)
        .into()
    }
}

fn table_row<'a, Message: 'a>(
    object: impl Into<Element<'a, Message>>,
    confidence: impl Into<Element<'a, Message>>,
    bbox: impl Into<Element<'a, Message>>,
) -> Element<'a, Message> {
    row![
        container(object).width(Length::FillPortion(2)),
        container(confidence).width(Length::FillPortion(2)),
        container(bbox).width(Length::FillPortion(2)),
    ]
    .align_y(Center)
    .into()
}

fn detection_row<'a, Message: 'a>(detection: &DetectionRow) -> Element<'a, Message> {
    table_row(
        text(detection.label.clone()),
        row![
            confidence_bar(detection.band),
            text(detection.percent.clone()).size(14)
        ]
        .spacing(8)
        .align_y(Center),
        column![
            text(detection.position()).size(12),
            text(detection.size()).size(12)
        ],
    )
}

async fn save_result_image(
    client: DetectionClient,
    image_url: String,
) -> anyhow::Result<Option<PathBuf>> {
    let Some(handle) = AsyncFileDialog::new()
        .set_title("Save detection result")
        .set_file_name(presenter::download_file_name(OffsetDateTime::now_utc()))
        .add_filter("JPEG image", &["jpg", "jpeg"])
        .save_file()
        .await
    else {
        return Ok(None);
    };
    let path = handle.path().to_path_buf();

    let bytes = client.fetch_image(&image_url).await?;
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "saved result image");
    Ok(Some(path))
}

impl Screen for ResultsScreen {
    type Message = ResultsMessage;
    type ParentMessage = Infallible;

    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        match presenter::present(state.page.state()) {
            ResultView::Loading => {
                Self::placeholder(column![text(LOADING_MESSAGE)].align_x(Center))
            }
            ResultView::Empty => Self::placeholder(column![text(EMPTY_MESSAGE)].align_x(Center)),
            ResultView::Failure { message } => Self::placeholder(
                column![
                    text(FAILURE_TITLE).size(20),
                    text(message).size(14).style(text::danger),
                    text(FAILURE_HINT).size(14),
                ]
                .spacing(8)
                .align_x(Center),
            ),
            ResultView::Results(view) => self.results(view, state),
        }
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            ResultsMessage::Download => {
                let Some(response) = state.page.response() else {
                    return Task::none();
                };
                let client = state.client.clone();
                let image_url = response.image_url.clone();
                self.download_status = Some("Downloading...".to_string());
                Task::perform(
                    async move {
                        save_result_image(client, image_url)
                            .await
                            .map_err(|e| format!("{:#}", e))
                    },
                    |result| ScreenMessage::ScreenMessage(ResultsMessage::Downloaded(result)),
                )
            }
            ResultsMessage::Downloaded(Ok(Some(path))) => {
                self.download_status = Some(format!("Saved to {}", path.display()));
                Task::none()
            }
            ResultsMessage::Downloaded(Ok(None)) => {
                self.download_status = None;
                Task::none()
            }
            ResultsMessage::Downloaded(Err(error)) => {
                self.download_status = Some(format!("Download failed: {}", error));
                Task::none()
            }
        }
    }
}
