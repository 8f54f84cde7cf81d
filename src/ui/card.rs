use iced::widget::image::Handle;
use iced::widget::{button, column, container, pick_list, row, text, text_input, Image};
use iced::{Border, ContentFit, Element, Length, Theme};
use std::path::PathBuf;

use super::{category_color, CategoryChoice, MUTED};
use crate::state::data::{Annotation, ImageId, SizeClass};
use crate::Message;

const CARD_WIDTH: f32 = 220.0;
const THUMB_HEIGHT: f32 = 150.0;

/// Preview area of a card or modal: the image, or a placeholder when the
/// file is not available
pub fn picture<'a>(path: Option<PathBuf>, height: Length, fit: ContentFit) -> Element<'a, Message> {
    match path {
        Some(path) => {
            let image: Image<Handle> = Image::new(Handle::from_path(path));
            image
                .width(Length::Fill)
                .height(height)
                .content_fit(fit)
                .into()
        }
        None => container(text("no preview").size(11).color(MUTED))
            .width(Length::Fill)
            .height(height)
            .center_x(Length::Fill)
            .center_y(height)
            .into(),
    }
}

/// One grid card: thumbnail, badges and the annotation editors
pub fn image_card<'a>(id: &ImageId, annotation: &Annotation, thumbnail: Option<PathBuf>) -> Element<'a, Message> {
    let accent = annotation.category.map(category_color);

    let preview = button(picture(thumbnail, Length::Fixed(THUMB_HEIGHT), ContentFit::Cover))
        .on_press(Message::Preview(id.clone()))
        .padding(0)
        .style(button::text);

    let category_badge = match annotation.category {
        Some(category) => text(category.label().to_uppercase()).size(10).color(category_color(category)),
        None => text("UNTAGGED").size(10).color(MUTED),
    };
    let mut badges = row![category_badge, text(annotation.size.badge()).size(10)].spacing(6);
    if annotation.is_cover {
        badges = badges.push(text("★").size(10));
    }

    let category_picker = {
        let id = id.clone();
        pick_list(
            CategoryChoice::all(),
            Some(CategoryChoice::from(annotation.category)),
            move |choice| Message::CategoryPicked(id.clone(), choice),
        )
        .text_size(12)
        .width(Length::Fill)
    };

    let size_picker = {
        let id = id.clone();
        pick_list(SizeClass::ALL, Some(annotation.size), move |size| {
            Message::SizePicked(id.clone(), size)
        })
        .text_size(12)
        .width(Length::Fill)
    };

    let title = {
        let id = id.clone();
        text_input("Title...", &annotation.title)
            .on_input(move |value| Message::TitleChanged(id.clone(), value))
            .size(12)
            .padding(4)
    };

    let alt = {
        let id = id.clone();
        text_input("Alt text...", &annotation.alt)
            .on_input(move |value| Message::AltChanged(id.clone(), value))
            .size(12)
            .padding(4)
    };

    let anchor = {
        let id = id.clone();
        text_input("Crop anchor (center)", &annotation.crop_anchor)
            .on_input(move |value| Message::CropAnchorChanged(id.clone(), value))
            .size(12)
            .padding(4)
    };

    let cover_label = if annotation.is_cover { "★ Cover Photo" } else { "☆ Set as Cover" };
    let cover = button(text(cover_label).size(11))
        .on_press(Message::ToggleCover(id.clone()))
        .width(Length::Fill)
        .style(if annotation.is_cover { button::success } else { button::secondary });

    let content = column![
        preview,
        badges,
        text(id.stem().to_string()).size(11).color(MUTED),
        text(format!("/{}", id.folder())).size(9).color(MUTED),
        category_picker,
        size_picker,
        title,
        alt,
        anchor,
        cover,
    ]
    .spacing(6);

    container(content)
        .width(Length::Fixed(CARD_WIDTH))
        .padding(8)
        .style(move |theme: &Theme| {
            let mut style = container::bordered_box(theme);
            if let Some(color) = accent {
                style.border = Border { color, width: 2.0, radius: 4.0.into() };
            }
            style
        })
        .into()
}
