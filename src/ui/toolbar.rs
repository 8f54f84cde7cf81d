use iced::widget::{button, column, horizontal_space, progress_bar, row, text, Row};
use iced::{Alignment, Color, Element, Length};
use iced_aw::Wrap;

use super::{category_color, MUTED};
use crate::config::QuickTag;
use crate::state::data::Filter;
use crate::state::session::FilterCounts;
use crate::Message;

/// Top bar of the tagging screen
pub fn toolbar<'a>(
    counts: &FilterCounts,
    active: Filter,
    progress: f32,
    quick_tags: &[QuickTag],
    status: &str,
) -> Element<'a, Message> {
    let header = row![
        text("BJN TAGGER").size(14),
        button(text("Preview gallery").size(11))
            .on_press(Message::ShowGallery)
            .style(button::text),
        horizontal_space(),
        button(text("RESCAN").size(11))
            .on_press(Message::RescanManifest)
            .style(button::secondary),
        button(text("RESET").size(11))
            .on_press(Message::ResetAll)
            .style(button::danger),
        button(text("COPY TS").size(11))
            .on_press(Message::CopySource)
            .style(button::secondary),
        button(text(format!("EXPORT JSON ({})", counts.tagged())).size(11))
            .on_press(Message::ExportJson)
            .style(button::primary),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let pills = Wrap::with_elements(
        Filter::options()
            .into_iter()
            .map(|filter| filter_pill(filter, counts.get(filter), filter == active))
            .collect(),
    )
    .spacing(6.0)
    .line_spacing(6.0);

    let quick = quick_tags.iter().fold(
        Row::new().spacing(6).push(text("QUICK:").size(10).color(MUTED)),
        |quick, tag| {
            quick.push(
                button(text(format!("/{} → {}", tag.folder, tag.category)).size(10))
                    .on_press(Message::QuickTag(tag.folder.clone(), tag.category))
                    .style(button::secondary),
            )
        },
    );

    let footer = row![
        progress_bar(0.0..=1.0, progress).height(4),
        text(format!("{}/{} tagged", counts.tagged(), counts.total)).size(10).color(MUTED),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    column![
        header,
        pills,
        quick.align_y(Alignment::Center),
        footer,
        text(status.to_string()).size(11).color(MUTED),
    ]
    .spacing(10)
    .padding(12)
    .width(Length::Fill)
    .into()
}

fn filter_pill<'a>(filter: Filter, count: usize, is_active: bool) -> Element<'a, Message> {
    let accent = match filter {
        Filter::Category(category) => category_color(category),
        Filter::All | Filter::Untagged => Color::WHITE,
    };

    button(text(format!("{} ({})", filter, count)).size(10))
        .on_press(Message::FilterSelected(filter))
        .style(move |theme, status| {
            let mut style = button::secondary(theme, status);
            if is_active {
                style.background = Some(accent.into());
                style.text_color = Color::BLACK;
            }
            style
        })
        .into()
}
