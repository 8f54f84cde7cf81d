/// Thumbnail cache for the tagger grid
///
/// Site images are full-size JPEGs; decoding 50+ of them for every redraw
/// is too slow, so each one is downscaled once into the user cache dir.

use image::{imageops::FilterType, DynamicImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, TaggerError};
use crate::state::data::ImageId;

/// Size of generated thumbnails (square bound)
const THUMBNAIL_SIZE: u32 = 256;

/// Thumbnail cache directory
/// Returns ~/.cache/bjn-tagger/thumbnails on Linux
pub fn cache_dir() -> Result<PathBuf> {
    let mut path = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .ok_or(TaggerError::NoDataDir)?;

    path.push("bjn-tagger");
    path.push("thumbnails");

    fs::create_dir_all(&path)?;
    Ok(path)
}

/// Cache file name for an image path: `/events/a.jpg` -> `%2Fevents%2Fa.jpg.jpg`
///
/// Every byte outside `[A-Za-z0-9._-]` is percent-escaped, so distinct paths
/// never share a cache file.
pub fn thumbnail_name(id: &ImageId) -> String {
    let mut name = String::with_capacity(id.as_str().len() + 8);
    for byte in id.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
            name.push(char::from(byte));
        } else {
            name.push_str(&format!("%{:02X}", byte));
        }
    }
    name.push_str(".jpg");
    name
}

/// Return the cached thumbnail for `source`, generating it if missing
pub fn ensure_thumbnail(source: &Path, id: &ImageId, cache: &Path) -> Result<PathBuf> {
    let target = cache.join(thumbnail_name(id));
    if target.exists() {
        return Ok(target);
    }

    let img = image::open(source)?;
    let thumbnail = img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3);

    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(thumbnail.to_rgb8()).save(&target)?;

    debug!(thumbnail = %target.display(), "thumbnail generated");
    Ok(target)
}

/// Generate a batch of thumbnails off the UI thread.
///
/// Failures are logged and left out of the result; the grid then shows a
/// placeholder for that image.
pub async fn generate_batch(jobs: Vec<(ImageId, PathBuf)>, cache: PathBuf) -> Vec<(ImageId, PathBuf)> {
    tokio::task::spawn_blocking(move || {
        jobs.into_iter()
            .filter_map(|(id, source)| match ensure_thumbnail(&source, &id, &cache) {
                Ok(path) => Some((id, path)),
                Err(err) => {
                    warn!(image = %id, error = %err, "thumbnail failed");
                    None
                }
            })
            .collect()
    })
    .await
    .unwrap_or_else(|err| {
        warn!(error = %err, "thumbnail task join error");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_thumbnail_name() {
        assert_eq!(thumbnail_name(&ImageId::from("/events/SEAN0004.jpg")), "%2Fevents%2FSEAN0004.jpg.jpg");
        assert_eq!(thumbnail_name(&ImageId::from("/creative/logo.png")), "%2Fcreative%2Flogo.png.jpg");
    }

    #[test]
    fn test_thumbnail_names_do_not_collide() {
        let pairs = [
            ("/a__b/c.jpg", "/a/b__c.jpg"),
            ("/a/b.jpg", "/a/b"),
            ("/a/b.jpg", "a/b.jpg"),
            ("/a%2Fb.jpg", "/a/b.jpg"),
        ];
        for (left, right) in pairs {
            assert_ne!(thumbnail_name(&ImageId::from(left)), thumbnail_name(&ImageId::from(right)));
        }
    }

    #[test]
    fn test_ensure_thumbnail_downscales_once() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("big.png");
        RgbImage::from_pixel(1024, 512, Rgb([200, 10, 10])).save(&source).unwrap();

        let id = ImageId::from("/portraits/big.png");
        let thumb = ensure_thumbnail(&source, &id, dir.path()).unwrap();
        let decoded = image::open(&thumb).unwrap();
        assert_eq!(decoded.width(), THUMBNAIL_SIZE);
        assert_eq!(decoded.height(), THUMBNAIL_SIZE / 2);

        // Cached: a missing source no longer matters
        fs::remove_file(&source).unwrap();
        assert_eq!(ensure_thumbnail(&source, &id, dir.path()).unwrap(), thumb);
    }

    #[tokio::test]
    async fn test_generate_batch_skips_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![(ImageId::from("/portraits/missing.jpg"), dir.path().join("missing.jpg"))];
        let done = generate_batch(jobs, dir.path().to_path_buf()).await;
        assert!(done.is_empty());
    }
}
