/// UI building blocks
///
/// - Image cards for the tagging grid (card.rs)
/// - Header with filters, quick tags and export (toolbar.rs)
/// - Gallery preview: cover cards, collection viewer, lightbox (gallery.rs)

pub mod card;
pub mod gallery;
pub mod toolbar;

use iced::Color;
use std::fmt;

use crate::state::data::Category;

/// Accent color of a category, used for pills, card borders and badges
pub fn category_color(category: Category) -> Color {
    match category {
        Category::Portraits => Color::from_rgb8(0x3b, 0x82, 0xf6),
        Category::CorporateEvents => Color::from_rgb8(0xf5, 0x9e, 0x0b),
        Category::CreativeEditorial => Color::from_rgb8(0xec, 0x48, 0x99),
        Category::NonProfitEvents => Color::from_rgb8(0x8b, 0x5c, 0xf6),
        Category::SocialEvents => Color::from_rgb8(0xf9, 0x73, 0x16),
        Category::Community => Color::from_rgb8(0x10, 0xb9, 0x81),
    }
}

/// Muted text color for secondary labels
pub const MUTED: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 0.4 };

/// Category picker entry; `Unset` clears the category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryChoice {
    Unset,
    Set(Category),
}

impl CategoryChoice {
    pub fn all() -> Vec<CategoryChoice> {
        let mut choices = vec![CategoryChoice::Unset];
        choices.extend(Category::ALL.iter().copied().map(CategoryChoice::Set));
        choices
    }

    pub fn category(self) -> Option<Category> {
        match self {
            CategoryChoice::Unset => None,
            CategoryChoice::Set(category) => Some(category),
        }
    }
}

impl From<Option<Category>> for CategoryChoice {
    fn from(category: Option<Category>) -> Self {
        category.map_or(CategoryChoice::Unset, CategoryChoice::Set)
    }
}

impl fmt::Display for CategoryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryChoice::Unset => f.write_str("-- Category --"),
            CategoryChoice::Set(category) => f.write_str(category.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_choice_roundtrip() {
        let choices = CategoryChoice::all();
        assert_eq!(choices.len(), Category::ALL.len() + 1);
        assert_eq!(choices[0].category(), None);
        for choice in choices {
            assert_eq!(CategoryChoice::from(choice.category()), choice);
        }
    }
}
