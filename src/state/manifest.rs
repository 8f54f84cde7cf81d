/// The image manifest
///
/// A fixed, ordered list of image paths supplied at build time. Manifest
/// order is folder-then-filename and is the order every view and export
/// uses. The category list is the `Category` enum itself.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

use super::data::ImageId;
use crate::error::{Result, TaggerError};

/// Image extensions picked up by a folder scan
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// All gallery-eligible images on the site (headshots excluded)
const BUILTIN_MANIFEST: &[&str] = &[
    // Portraits
    "/portraits/M_PG0660.jpg",
    "/portraits/M_PG0838.jpg",
    "/portraits/M_PG0935.jpg",
    "/portraits/M_PG1067.jpg",
    "/portraits/M_PG1323.jpg",
    "/portraits/M_PG1387.jpg",
    "/portraits/M_PG1445.jpg",
    "/portraits/PPGB0253.jpg",
    "/portraits/PPGB0342.jpg",
    "/portraits/PPGB0487.jpg",
    "/portraits/PPGB0710.jpg",
    "/portraits/PPGB0788.jpg",
    // Creative
    "/creative/PPGS5140.jpg",
    "/creative/PPGS5240.jpg",
    "/creative/PPGS5242.jpg",
    "/creative/PPGS5426_2.jpg",
    "/creative/PPGS5442.jpg",
    "/creative/PPGS5490.jpg",
    "/creative/PPGS5541.jpg",
    // Events
    "/events/11-SSUC9688.jpg",
    "/events/118-SSUC8221.jpg",
    "/events/148-SSUC7538.jpg",
    "/events/167-SSUC7330.jpg",
    "/events/193-SSUC7178.jpg",
    "/events/273-SSUC6920.jpg",
    "/events/28-SSUC9532.jpg",
    "/events/28-SSUC95321.jpg",
    "/events/SEAN0004.jpg",
    "/events/SEAN0007.jpg",
    "/events/SEAN0028.jpg",
    "/events/SEAN0055.jpg",
    "/events/SEAN0081.jpg",
    "/events/SEAN0089.jpg",
    "/events/SSUC2398.jpg",
    "/events/SSUC2435.jpg",
    "/events/SSUC2513.jpg",
    "/events/SSUC2516.jpg",
    "/events/SSUC2610.jpg",
    "/events/SSUC2647.jpg",
    "/events/SSUC2669.jpg",
    "/events/SSUC3054.jpg",
    "/events/SSUC9898.jpg",
    "/events/SSUC9908.jpg",
    "/events/SSUC9915.jpg",
    "/events/SSUC9933.jpg",
    "/events/SSUC9945.jpg",
    "/events/S_PG1393.jpg",
    "/events/S_PG1482.jpg",
    "/events/S_PG1525.jpg",
    "/events/S_PG1742.jpg",
    "/events/S_PG1889.jpg",
    "/events/S_PG2087.jpg",
    "/events/S_PG2103.jpg",
    "/events/S_PG2181.jpg",
];

/// On-disk manifest file layout
#[derive(Debug, Deserialize)]
struct ManifestFile {
    images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    images: Vec<ImageId>,
    index: HashSet<ImageId>,
}

impl Manifest {
    /// Build a manifest from paths in order. Duplicates keep their first
    /// position.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut images = Vec::new();
        let mut index = HashSet::new();

        for path in paths {
            let id = ImageId::new(path);
            if index.insert(id.clone()) {
                images.push(id);
            } else {
                warn!(image = %id, "duplicate manifest entry dropped");
            }
        }

        Manifest { images, index }
    }

    /// The site's own image list
    pub fn builtin() -> Self {
        Self::from_paths(BUILTIN_MANIFEST.iter().copied())
    }

    /// Read a `{"images": [...]}` manifest file
    pub fn load_json(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let file: ManifestFile = serde_json::from_str(&text).map_err(|e| TaggerError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let manifest = Self::from_paths(file.images);
        info!(path = %path.display(), images = manifest.len(), "manifest loaded");
        Ok(manifest)
    }

    /// Build a manifest by walking `folders` under `site_root`.
    ///
    /// Folders are taken in the given order, files sorted by name inside
    /// each folder. Paths are rooted at the site (`/portraits/a.jpg`).
    pub fn scan(site_root: &Path, folders: &[String]) -> Self {
        let mut paths = Vec::new();

        for folder in folders {
            let dir = site_root.join(folder);
            if !dir.is_dir() {
                warn!(folder = %dir.display(), "scan folder missing, skipped");
                continue;
            }

            for entry in WalkDir::new(&dir)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if !path.is_file() || !has_image_extension(path) {
                    continue;
                }

                let Ok(relative) = path.strip_prefix(site_root) else {
                    continue;
                };
                let segments: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                paths.push(format!("/{}", segments.join("/")));
            }
        }

        let manifest = Self::from_paths(paths);
        info!(root = %site_root.display(), images = manifest.len(), "manifest scanned");
        manifest
    }

    pub fn images(&self) -> &[ImageId] {
        &self.images
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageId> {
        self.images.iter()
    }

    pub fn contains(&self, id: &ImageId) -> bool {
        self.index.contains(id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Distinct parent folders, in first-seen order
    pub fn folders(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.images
            .iter()
            .map(ImageId::folder)
            .filter(|folder| !folder.is_empty() && seen.insert(*folder))
            .collect()
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
