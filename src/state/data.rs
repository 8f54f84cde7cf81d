/// Shared data structures for the tagging pipeline
///
/// These types flow between the annotation store, the tagging session,
/// the export writer and the gallery projection.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Crop anchor used when an image has no explicit one
pub const DEFAULT_CROP_ANCHOR: &str = "center";

/// Path of an image inside the site, e.g. `/portraits/M_PG0660.jpg`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parent folder segment of the path.
    ///
    /// `/portraits/a.jpg` -> `portraits`, `a.jpg` -> `""`, `/a.jpg` -> `""`
    pub fn folder(&self) -> &str {
        self.0.rsplit('/').nth(1).unwrap_or("")
    }

    /// File name with a `.jpg` or `.png` extension removed, e.g. `PPGS5426_2`.
    /// Other extensions are kept.
    pub fn stem(&self) -> &str {
        let name = self.0.rsplit('/').next().unwrap_or(&self.0);
        name.strip_suffix(".jpg")
            .or_else(|| name.strip_suffix(".png"))
            .unwrap_or(name)
    }
}

impl Borrow<str> for ImageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for ImageId {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// Gallery category
///
/// Declaration order is the display order of collections in the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Portraits")]
    Portraits,
    #[serde(rename = "Corporate Events")]
    CorporateEvents,
    #[serde(rename = "Creative/Editorial")]
    CreativeEditorial,
    #[serde(rename = "Non-Profit Events")]
    NonProfitEvents,
    #[serde(rename = "Social Events")]
    SocialEvents,
    #[serde(rename = "Community")]
    Community,
}

impl Category {
    /// Every category, in display order
    pub const ALL: &'static [Category] = &[
        Category::Portraits,
        Category::CorporateEvents,
        Category::CreativeEditorial,
        Category::NonProfitEvents,
        Category::SocialEvents,
        Category::Community,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Portraits => "Portraits",
            Category::CorporateEvents => "Corporate Events",
            Category::CreativeEditorial => "Creative/Editorial",
            Category::NonProfitEvents => "Non-Profit Events",
            Category::SocialEvents => "Social Events",
            Category::Community => "Community",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }

    /// Position in the display order
    pub fn rank(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(Self::ALL.len())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Layout hint for an image in the gallery grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Hero,
    Feature,
    Wide,
    Tall,
    #[default]
    Standard,
}

impl SizeClass {
    pub const ALL: &'static [SizeClass] = &[
        SizeClass::Hero,
        SizeClass::Feature,
        SizeClass::Wide,
        SizeClass::Tall,
        SizeClass::Standard,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SizeClass::Hero => "hero",
            SizeClass::Feature => "feature",
            SizeClass::Wide => "wide",
            SizeClass::Tall => "tall",
            SizeClass::Standard => "standard",
        }
    }

    /// One-letter badge shown on grid cards
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|size| size.label() == label)
    }

    pub fn badge(self) -> &'static str {
        match self {
            SizeClass::Hero => "H",
            SizeClass::Feature => "F",
            SizeClass::Wide => "W",
            SizeClass::Tall => "T",
            SizeClass::Standard => "S",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-image metadata entered by the operator
///
/// Stored with the same field names the gallery data file uses. An unset
/// category is stored as `""`. A missing, null or mistyped field reads back
/// as its default, so one bad value never costs the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Annotation {
    #[serde(with = "category_slot")]
    pub category: Option<Category>,
    #[serde(deserialize_with = "lenient::size")]
    pub size: SizeClass,
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub alt: String,
    #[serde(rename = "objectPosition", deserialize_with = "lenient::crop_anchor")]
    pub crop_anchor: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_cover: bool,
}

impl Default for Annotation {
    fn default() -> Self {
        Self {
            category: None,
            size: SizeClass::Standard,
            title: String::new(),
            alt: String::new(),
            crop_anchor: DEFAULT_CROP_ANCHOR.to_string(),
            is_cover: false,
        }
    }
}

/// A partial update to an [`Annotation`]
///
/// Each `Some` field overwrites the matching annotation field; `None`
/// leaves it alone. `category: Some(None)` clears the category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationPatch {
    pub category: Option<Option<Category>>,
    pub size: Option<SizeClass>,
    pub title: Option<String>,
    pub alt: Option<String>,
    pub crop_anchor: Option<String>,
    pub is_cover: Option<bool>,
}

impl AnnotationPatch {
    pub fn category(category: Option<Category>) -> Self {
        Self { category: Some(category), ..Self::default() }
    }

    pub fn size(size: SizeClass) -> Self {
        Self { size: Some(size), ..Self::default() }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Self::default() }
    }

    pub fn alt(alt: impl Into<String>) -> Self {
        Self { alt: Some(alt.into()), ..Self::default() }
    }

    pub fn crop_anchor(anchor: impl Into<String>) -> Self {
        Self { crop_anchor: Some(anchor.into()), ..Self::default() }
    }

    pub fn cover(is_cover: bool) -> Self {
        Self { is_cover: Some(is_cover), ..Self::default() }
    }

    /// Shallow merge onto `base`
    pub fn apply_to(self, mut base: Annotation) -> Annotation {
        if let Some(category) = self.category {
            base.category = category;
        }
        if let Some(size) = self.size {
            base.size = size;
        }
        if let Some(title) = self.title {
            base.title = title;
        }
        if let Some(alt) = self.alt {
            base.alt = alt;
        }
        if let Some(anchor) = self.crop_anchor {
            base.crop_anchor = anchor;
        }
        if let Some(is_cover) = self.is_cover {
            base.is_cover = is_cover;
        }
        base
    }
}

/// One record of the exported gallery data file
///
/// `objectPosition` and `isCover` are only written when they differ from
/// their defaults (`"center"` and `false`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedImage {
    pub src: ImageId,
    pub category: Category,
    #[serde(default)]
    pub size: SizeClass,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_position: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_cover: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Which subset of the manifest the tagger grid shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    #[default]
    All,
    Untagged,
    Category(Category),
}

impl Filter {
    /// Filter pills in display order: All, Untagged, then every category
    pub fn options() -> Vec<Filter> {
        let mut options = vec![Filter::All, Filter::Untagged];
        options.extend(Category::ALL.iter().copied().map(Filter::Category));
        options
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("All"),
            Filter::Untagged => f.write_str("Untagged"),
            Filter::Category(category) => f.write_str(category.label()),
        }
    }
}

/// Serde adapter storing `Option<Category>` as a label or `""`.
///
/// Unknown labels read back as unset rather than failing the whole map.
mod category_slot {
    use super::Category;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Category>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.map(Category::label).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Category>, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw.as_str().and_then(Category::from_label))
    }
}

/// Field readers for stored annotations that fall back to the field default
/// on null or mistyped values.
mod lenient {
    use super::{SizeClass, DEFAULT_CROP_ANCHOR};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SizeClass, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(raw.as_str().and_then(SizeClass::from_label).unwrap_or_default())
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(raw.as_str().unwrap_or_default().to_string())
    }

    pub fn crop_anchor<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(raw.as_str().unwrap_or(DEFAULT_CROP_ANCHOR).to_string())
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(raw.as_bool().unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_and_stem() {
        let id = ImageId::from("/portraits/M_PG0660.jpg");
        assert_eq!(id.folder(), "portraits");
        assert_eq!(id.stem(), "M_PG0660");

        let nested = ImageId::from("/events/2024/SEAN0004.png");
        assert_eq!(nested.folder(), "2024");

        assert_eq!(ImageId::from("loose.jpg").folder(), "");
        assert_eq!(ImageId::from("/loose.jpg").folder(), "");
        assert_eq!(ImageId::from("/a/noext").stem(), "noext");
        assert_eq!(ImageId::from("/a/PPGS5426_2.jpg").stem(), "PPGS5426_2");
        assert_eq!(ImageId::from("/a/cover.png").stem(), "cover");
        assert_eq!(ImageId::from("/a/loft.webp").stem(), "loft.webp");
    }

    #[test]
    fn test_default_annotation() {
        let annotation = Annotation::default();
        assert_eq!(annotation.category, None);
        assert_eq!(annotation.size, SizeClass::Standard);
        assert_eq!(annotation.crop_anchor, "center");
        assert!(!annotation.is_cover);
    }

    #[test]
    fn test_annotation_reads_stored_blob_layout() {
        let json = r#"{"category":"","size":"tall","title":"","alt":"","objectPosition":"top","isCover":true}"#;
        let annotation: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(annotation.category, None);
        assert_eq!(annotation.size, SizeClass::Tall);
        assert_eq!(annotation.crop_anchor, "top");
        assert!(annotation.is_cover);

        let partial: Annotation = serde_json::from_str(r#"{"category":"Social Events"}"#).unwrap();
        assert_eq!(partial.category, Some(Category::SocialEvents));
        assert_eq!(partial.crop_anchor, "center");
    }

    #[test]
    fn test_unknown_category_reads_as_unset() {
        let annotation: Annotation = serde_json::from_str(r#"{"category":"Weddings"}"#).unwrap();
        assert_eq!(annotation.category, None);
    }

    #[test]
    fn test_bad_field_falls_back_to_its_default() {
        let json = r#"{"category":"Portraits","size":"giant","title":null,"alt":7,"objectPosition":null,"isCover":"yes"}"#;
        let annotation: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(annotation.category, Some(Category::Portraits));
        assert_eq!(annotation.size, SizeClass::Standard);
        assert_eq!(annotation.title, "");
        assert_eq!(annotation.alt, "");
        assert_eq!(annotation.crop_anchor, "center");
        assert!(!annotation.is_cover);

        let numeric: Annotation = serde_json::from_str(r#"{"category":3,"size":"wide"}"#).unwrap();
        assert_eq!(numeric.category, None);
        assert_eq!(numeric.size, SizeClass::Wide);
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let base = Annotation {
            category: Some(Category::Portraits),
            title: "Executive Portrait".to_string(),
            ..Annotation::default()
        };

        let patched = AnnotationPatch::size(SizeClass::Tall).apply_to(base.clone());
        assert_eq!(patched.size, SizeClass::Tall);
        assert_eq!(patched.title, "Executive Portrait");
        assert_eq!(patched.category, Some(Category::Portraits));

        let cleared = AnnotationPatch::category(None).apply_to(base);
        assert_eq!(cleared.category, None);
        assert_eq!(cleared.title, "Executive Portrait");
    }

    #[test]
    fn test_exported_image_omits_defaults() {
        let image = ExportedImage {
            src: ImageId::from("/a/1.jpg"),
            category: Category::Portraits,
            size: SizeClass::Standard,
            title: "1".to_string(),
            alt: "Portraits photography by BJN".to_string(),
            object_position: None,
            is_cover: false,
        };
        let json = serde_json::to_string(&image).unwrap();
        assert!(!json.contains("objectPosition"));
        assert!(!json.contains("isCover"));

        let restored: ExportedImage = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.object_position, None);
        assert!(!restored.is_cover);
    }

    #[test]
    fn test_category_order_and_labels() {
        assert_eq!(Category::Portraits.rank(), 0);
        assert_eq!(Category::Community.rank(), 5);
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(*category));
        }
        assert_eq!(Filter::options().len(), 2 + Category::ALL.len());
    }
}
