/// Export artifacts for the public gallery
///
/// Two forms of the same snapshot: a JSON data file, and a TypeScript
/// module snippet that can be pasted over the site's gallery data.

use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use super::data::{Category, ExportedImage, ImageId, SizeClass};
use crate::error::Result;

/// Default file name offered by the save dialog
pub const DEFAULT_EXPORT_FILE: &str = "galleryImages.json";

/// Pretty-printed JSON array with two-space indent
pub fn to_json(images: &[ExportedImage]) -> Result<String> {
    Ok(serde_json::to_string_pretty(images)?)
}

/// Source-level constant declaration for the site's data module
pub fn to_source_snippet(images: &[ExportedImage]) -> Result<String> {
    Ok(format!(
        "import type {{ GalleryImage }} from './galleryImages';\n\nexport const galleryImages: GalleryImage[] = {};\n",
        to_json(images)?
    ))
}

pub fn write_json(path: &Path, images: &[ExportedImage]) -> Result<()> {
    std::fs::write(path, to_json(images)?)?;
    info!(path = %path.display(), images = images.len(), "gallery data exported");
    Ok(())
}

/// Gallery record as found in a data file, before the category is checked
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawImage {
    src: ImageId,
    category: String,
    #[serde(default)]
    size: SizeClass,
    #[serde(default)]
    title: String,
    #[serde(default)]
    alt: String,
    #[serde(default)]
    object_position: Option<String>,
    #[serde(default)]
    is_cover: bool,
}

/// Read a gallery data file back.
///
/// Records with a category outside the enumeration are dropped, so a
/// stale data file renders as fewer images rather than failing.
pub fn parse_json(text: &str) -> Result<Vec<ExportedImage>> {
    let raw: Vec<RawImage> = serde_json::from_str(text)?;

    Ok(raw
        .into_iter()
        .filter_map(|image| {
            let Some(category) = Category::from_label(&image.category) else {
                warn!(image = %image.src, category = %image.category, "unknown category, record skipped");
                return None;
            };
            Some(ExportedImage {
                src: image.src,
                category,
                size: image.size,
                title: image.title,
                alt: image.alt,
                object_position: image.object_position,
                is_cover: image.is_cover,
            })
        })
        .collect())
}

pub fn read_json(path: &Path) -> Result<Vec<ExportedImage>> {
    parse_json(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::annotations::AnnotationMap;
    use crate::state::data::AnnotationPatch;
    use crate::state::manifest::Manifest;
    use crate::state::session::{export_snapshot, ExportOptions};

    fn snapshot() -> Vec<ExportedImage> {
        let manifest = Manifest::from_paths(["/a/1.jpg", "/a/2.jpg", "/b/3.jpg"]);
        let map = AnnotationMap::new()
            .update(&ImageId::from("/a/1.jpg"), AnnotationPatch::category(Some(Category::Portraits)))
            .update(&ImageId::from("/a/1.jpg"), AnnotationPatch::crop_anchor("50% 20%"))
            .update(&ImageId::from("/a/2.jpg"), AnnotationPatch::category(Some(Category::Portraits)))
            .update(&ImageId::from("/a/2.jpg"), AnnotationPatch::cover(true))
            .update(&ImageId::from("/b/3.jpg"), AnnotationPatch::category(Some(Category::Community)))
            .update(&ImageId::from("/b/3.jpg"), AnnotationPatch::size(SizeClass::Wide));
        export_snapshot(&map, &manifest, &ExportOptions::default())
    }

    #[test]
    fn test_json_roundtrip() {
        let images = snapshot();
        let json = to_json(&images).unwrap();
        assert_eq!(parse_json(&json).unwrap(), images);
    }

    #[test]
    fn test_json_is_stable_and_compact() {
        let images = snapshot();
        let first = to_json(&images).unwrap();
        assert_eq!(first, to_json(&images).unwrap());

        assert_eq!(first.matches("isCover").count(), 1);
        assert_eq!(first.matches("objectPosition").count(), 1);
        assert!(first.contains("\n  {\n    \"src\": \"/a/1.jpg\",\n    \"category\": \"Portraits\","));
    }

    #[test]
    fn test_source_snippet() {
        let snippet = to_source_snippet(&snapshot()).unwrap();
        assert!(snippet.starts_with("import type { GalleryImage } from './galleryImages';\n\n"));
        assert!(snippet.contains("export const galleryImages: GalleryImage[] = [\n"));
        assert!(snippet.ends_with("];\n"));
    }

    #[test]
    fn test_parse_fills_defaults_and_skips_unknown_categories() {
        let text = r#"[
            {"src": "/a/1.jpg", "category": "Portraits", "size": "tall", "title": "t", "alt": "a"},
            {"src": "/a/2.jpg", "category": "Weddings", "size": "tall", "title": "t", "alt": "a"}
        ]"#;
        let images = parse_json(text).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].object_position, None);
        assert!(!images[0].is_cover);
        assert_eq!(images[0].size, SizeClass::Tall);
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);
        let images = snapshot();

        write_json(&path, &images).unwrap();
        assert_eq!(read_json(&path).unwrap(), images);
    }
}
