use iced::{
    Color, Element, Length, Theme, border,
    widget::{container, container::Style, row, text},
};
use iced_widget::container::bordered_box;

use crate::ConfidenceBand;

const BAR_WIDTH: f32 = 64.0;
const BAR_HEIGHT: f32 = 8.0;

/// Bordered panel every section of the page sits in.
pub fn card<'a, Message>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message>
where
    Message: 'a,
{
    container(content)
        .padding(20)
        .width(Length::Fill)
        .style(|theme: &Theme| bordered_box(theme).border(border::width(1).rounded(8)))
        .into()
}

/// Drop target around the file picker. Dimmed while a submission is in flight.
pub fn drop_zone<'a, Message>(
    content: impl Into<Element<'a, Message>>,
    busy: bool,
) -> Element<'a, Message>
where
    Message: 'a,
{
    container(content)
        .padding(32)
        .center_x(Length::Fill)
        .style(move |theme: &Theme| {
            let style = bordered_box(theme).border(border::width(2).rounded(8));
            if busy {
                let mut color_rgba = theme.palette().background.into_rgba8();
                color_rgba[0] /= 2;
                color_rgba[1] /= 2;
                color_rgba[2] /= 2;
                style.background(Color::from_rgb8(color_rgba[0], color_rgba[1], color_rgba[2]))
            } else {
                style.background(theme.palette().background)
            }
        })
        .into()
}

/// Fixed-width bar filled to the band's portion, not to the exact score.
pub fn confidence_bar<'a, Message>(band: ConfidenceBand) -> Element<'a, Message>
where
    Message: 'a,
{
    let (filled, total) = band.portions();
    let fill = container(text(""))
        .width(Length::FillPortion(filled))
        .height(Length::Fixed(BAR_HEIGHT))
        .style(|theme: &Theme| {
            Style::default()
                .background(theme.palette().success)
                .border(border::rounded(4))
        });

    let mut bar = row![fill];
    if total > filled {
        bar = bar.push(
            container(text(""))
                .width(Length::FillPortion(total - filled))
                .height(Length::Fixed(BAR_HEIGHT)),
        );
    }

    container(bar)
        .width(Length::Fixed(BAR_WIDTH))
        .height(Length::Fixed(BAR_HEIGHT))
        .style(|theme: &Theme| {
            let mut track = theme.palette().text;
            track.a = 0.15;
            Style::default().background(track).border(border::rounded(4))
        })
        .into()
}

/// One `label ........ value` line of the summary card.
pub fn summary_line<'a, Message>(label: &'a str, value: String) -> Element<'a, Message>
where
    Message: 'a,
{
    row![
        container(text(label).size(14)).width(Length::Fill),
        text(value).size(14),
    ]
    .into()
}
