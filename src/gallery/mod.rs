/// Gallery projection module
///
/// Turns an exported image list into what the public gallery renders:
/// - Category groups, covers and layout hints (projection.rs)
/// - The lightbox cursor of a collection viewer (viewer.rs)

pub mod projection;
pub mod viewer;

pub use projection::{group_by_category, is_tall_layout, CategoryGroup};
pub use viewer::Lightbox;
