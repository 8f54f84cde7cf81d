use iced::widget::{button, column, container, horizontal_space, row, scrollable, text};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;
use std::path::{Path, PathBuf};

use super::card::picture;
use super::MUTED;
use crate::gallery::{is_tall_layout, CategoryGroup, Lightbox};
use crate::state::data::ImageId;
use crate::Message;

const TILE_WIDTH: f32 = 240.0;

/// Maps an image path to a displayable file
pub type Resolve<'r> = dyn Fn(&ImageId) -> Option<PathBuf> + 'r;

/// 3:4 for tall layouts, 4:3 otherwise
fn tile_height(tall: bool) -> f32 {
    if tall {
        TILE_WIDTH * 4.0 / 3.0
    } else {
        TILE_WIDTH * 3.0 / 4.0
    }
}

/// Collection cover cards, one per non-empty category.
///
/// `source` is the data file being previewed, `None` for the live tags.
pub fn overview<'a>(groups: &[CategoryGroup], source: Option<&Path>, resolve: &Resolve<'_>) -> Element<'a, Message> {
    let source_switch = match source {
        Some(path) => row![
            text(path.display().to_string()).size(10).color(MUTED),
            button(text("Live tags").size(11))
                .on_press(Message::UseLiveGallery)
                .style(button::secondary),
        ],
        None => row![button(text("Open data file...").size(11))
            .on_press(Message::OpenGalleryFile)
            .style(button::secondary)],
    }
    .spacing(8)
    .align_y(Alignment::Center);

    let header = row![
        button(text("← Back to tagger").size(11))
            .on_press(Message::ShowTagging)
            .style(button::text),
        horizontal_space(),
        source_switch,
        text(format!("({:02}) COLLECTIONS", groups.len())).size(11).color(MUTED),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    if groups.is_empty() {
        let placeholder = column![
            text("Gallery images not yet tagged.").size(14).color(MUTED),
            text("Tag images in the tagger, then come back here.").size(11).color(MUTED),
        ]
        .spacing(8)
        .align_x(Alignment::Center);

        return column![header, container(placeholder).center_x(Length::Fill).padding(96)]
            .spacing(24)
            .padding(24)
            .into();
    }

    let cards: Vec<Element<'a, Message>> = groups
        .iter()
        .filter_map(|group| {
            let cover = group.cover()?;
            let frame = picture(resolve(&cover.src), Length::Fixed(tile_height(is_tall_layout(cover))), ContentFit::Cover);

            let card = column![
                frame,
                text(format!("{:02} WORKS", group.len())).size(9).color(MUTED),
                text(group.category.label()).size(22),
            ]
            .spacing(6)
            .width(Length::Fixed(TILE_WIDTH));

            Some(
                button(card)
                    .on_press(Message::OpenCollection(group.category))
                    .style(button::text)
                    .into(),
            )
        })
        .collect();

    let grid = Wrap::with_elements(cards).spacing(32.0).line_spacing(32.0);

    column![
        header,
        text("THE GALLERY").size(40),
        scrollable(grid).height(Length::Fill),
    ]
    .spacing(16)
    .padding(24)
    .into()
}

/// Masonry-style grid of one collection, or its lightbox when open
pub fn collection<'a>(group: &CategoryGroup, lightbox: &Lightbox, resolve: &Resolve<'_>) -> Element<'a, Message> {
    if let Some(index) = lightbox.current() {
        if let Some(image) = group.images.get(index) {
            return lightbox_view(group, image.src.clone(), &image.title, lightbox, resolve);
        }
    }

    let header = row![
        button(text("‹ BACK").size(11))
            .on_press(Message::CloseCollection)
            .style(button::text),
        text(group.category.label().to_uppercase()).size(18),
        horizontal_space(),
        text(format!("{} PHOTOS", group.len())).size(10).color(MUTED),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let tiles: Vec<Element<'a, Message>> = group
        .images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let tile = column![
                picture(resolve(&image.src), Length::Fixed(tile_height(is_tall_layout(image))), ContentFit::Cover),
                text(image.title.to_uppercase()).size(10).color(MUTED),
            ]
            .spacing(4)
            .width(Length::Fixed(TILE_WIDTH));

            button(tile)
                .on_press(Message::OpenLightbox(index))
                .padding(0)
                .style(button::text)
                .into()
        })
        .collect();

    column![
        header,
        scrollable(Wrap::with_elements(tiles).spacing(12.0).line_spacing(12.0)).height(Length::Fill),
    ]
    .spacing(16)
    .padding(24)
    .into()
}

fn lightbox_view<'a>(
    group: &CategoryGroup,
    src: ImageId,
    title: &str,
    lightbox: &Lightbox,
    resolve: &Resolve<'_>,
) -> Element<'a, Message> {
    let position = lightbox.position_label(group.len()).unwrap_or_default();

    let stage = row![
        button(text("‹").size(32)).on_press(Message::PrevImage).style(button::text),
        container(picture(resolve(&src), Length::Fill, ContentFit::Contain)).width(Length::Fill).height(Length::Fill),
        button(text("›").size(32)).on_press(Message::NextImage).style(button::text),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .height(Length::Fill);

    let caption = row![
        column![
            text(title.to_string()).size(20),
            text(group.category.label().to_uppercase()).size(11).color(MUTED),
        ]
        .spacing(4),
        horizontal_space(),
        text(position).size(11).color(MUTED),
        button(text("✕").size(16)).on_press(Message::CloseLightbox).style(button::secondary),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    column![stage, caption].spacing(16).padding(24).into()
}
