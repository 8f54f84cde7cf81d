/// Tagging session: the operator's view of the manifest
///
/// The free functions are the pure rules (filtering, counting, bulk
/// folder assignment, cover toggling, export). [`TaggingSession`] owns the
/// current map and the store, applies a rule, then writes the result
/// through to the store.

use tracing::{debug, info, warn};

use super::annotations::AnnotationMap;
use super::data::{
    Annotation, AnnotationPatch, Category, ExportedImage, Filter, ImageId, DEFAULT_CROP_ANCHOR,
};
use super::manifest::Manifest;
use super::store::AnnotationStore;

/// Defaults applied to blank titles and alt text at export time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Photographer credit used in generated alt text
    pub credit: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { credit: "BJN".to_string() }
    }
}

/// Number of manifest images behind each filter pill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCounts {
    pub total: usize,
    pub untagged: usize,
    /// One entry per category, in category order
    pub per_category: Vec<(Category, usize)>,
}

impl FilterCounts {
    pub fn tagged(&self) -> usize {
        self.total - self.untagged
    }

    pub fn get(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.total,
            Filter::Untagged => self.untagged,
            Filter::Category(category) => self
                .per_category
                .iter()
                .find(|(c, _)| *c == category)
                .map(|(_, count)| *count)
                .unwrap_or(0),
        }
    }
}

/// Manifest entries matching `filter`, in manifest order
pub fn filtered_view(map: &AnnotationMap, manifest: &Manifest, filter: Filter) -> Vec<ImageId> {
    manifest
        .iter()
        .filter(|id| {
            let category = map.stored(id.as_str()).and_then(|a| a.category);
            match filter {
                Filter::All => true,
                Filter::Untagged => category.is_none(),
                Filter::Category(wanted) => category == Some(wanted),
            }
        })
        .cloned()
        .collect()
}

/// Counts for every filter option. Keys outside the manifest are ignored.
pub fn counts(map: &AnnotationMap, manifest: &Manifest) -> FilterCounts {
    let mut per_category: Vec<(Category, usize)> =
        Category::ALL.iter().map(|c| (*c, 0)).collect();
    let mut tagged = 0;

    for id in manifest.iter() {
        if let Some(category) = map.stored(id.as_str()).and_then(|a| a.category) {
            tagged += 1;
            per_category[category.rank()].1 += 1;
        }
    }

    FilterCounts {
        total: manifest.len(),
        untagged: manifest.len() - tagged,
        per_category,
    }
}

/// Assign `category` to every image whose parent folder is `folder`
pub fn quick_assign_by_prefix(
    map: &AnnotationMap,
    manifest: &Manifest,
    folder: &str,
    category: Category,
) -> AnnotationMap {
    let mut next = map.clone();
    for id in manifest.iter().filter(|id| id.folder() == folder) {
        next.apply(id, AnnotationPatch::category(Some(category)));
    }
    next
}

/// Flip the cover flag of `id` only
pub fn toggle_cover(map: &AnnotationMap, id: &ImageId) -> AnnotationMap {
    let is_cover = map.get(id.as_str()).is_cover;
    map.update(id, AnnotationPatch::cover(!is_cover))
}

/// Every categorized manifest image as a gallery record, in manifest order
pub fn export_snapshot(
    map: &AnnotationMap,
    manifest: &Manifest,
    options: &ExportOptions,
) -> Vec<ExportedImage> {
    manifest
        .iter()
        .filter_map(|id| {
            let annotation = map.stored(id.as_str())?;
            let category = annotation.category?;
            Some(export_record(id, category, annotation, options))
        })
        .collect()
}

fn export_record(
    id: &ImageId,
    category: Category,
    annotation: &Annotation,
    options: &ExportOptions,
) -> ExportedImage {
    let title = if annotation.title.is_empty() {
        id.stem().to_string()
    } else {
        annotation.title.clone()
    };
    let alt = if annotation.alt.is_empty() {
        format!("{} photography by {}", category, options.credit)
    } else {
        annotation.alt.clone()
    };

    ExportedImage {
        src: id.clone(),
        category,
        size: annotation.size,
        title,
        alt,
        object_position: (annotation.crop_anchor != DEFAULT_CROP_ANCHOR)
            .then(|| annotation.crop_anchor.clone()),
        is_cover: annotation.is_cover,
    }
}

/// One operator's editing session over a manifest
pub struct TaggingSession<S: AnnotationStore> {
    manifest: Manifest,
    map: AnnotationMap,
    store: S,
    filter: Filter,
    options: ExportOptions,
}

impl<S: AnnotationStore> TaggingSession<S> {
    /// Start a session from whatever the store holds
    pub fn open(manifest: Manifest, store: S, options: ExportOptions) -> Self {
        let map = store.load();

        let stale = map.iter().filter(|(id, _)| !manifest.contains(id)).count();
        if stale > 0 {
            warn!(stale, "annotations reference images missing from the manifest");
        }
        if map.is_empty() {
            info!("no stored annotations, starting fresh");
        }
        info!(images = manifest.len(), annotated = map.len(), "tagging session started");

        TaggingSession {
            manifest,
            map,
            store,
            filter: Filter::All,
            options,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    #[cfg(test)]
    pub fn map(&self) -> &AnnotationMap {
        &self.map
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn annotation(&self, id: &ImageId) -> Annotation {
        self.map.get(id.as_str())
    }

    /// Images under the current filter
    pub fn visible(&self) -> Vec<ImageId> {
        filtered_view(&self.map, &self.manifest, self.filter)
    }

    pub fn counts(&self) -> FilterCounts {
        counts(&self.map, &self.manifest)
    }

    pub fn tagged_count(&self) -> usize {
        self.counts().tagged()
    }

    /// Fraction of the manifest with a category, 0.0 for an empty manifest
    pub fn progress(&self) -> f32 {
        let counts = self.counts();
        if counts.total == 0 {
            0.0
        } else {
            counts.tagged() as f32 / counts.total as f32
        }
    }

    pub fn edit(&mut self, id: &ImageId, patch: AnnotationPatch) {
        let next = self.map.update(id, patch);
        self.commit(next);
    }

    pub fn quick_assign(&mut self, folder: &str, category: Category) {
        let next = quick_assign_by_prefix(&self.map, &self.manifest, folder, category);
        info!(folder, %category, "folder assigned");
        self.commit(next);
    }

    pub fn toggle_cover(&mut self, id: &ImageId) {
        let next = toggle_cover(&self.map, id);
        self.commit(next);
    }

    pub fn export(&self) -> Vec<ExportedImage> {
        export_snapshot(&self.map, &self.manifest, &self.options)
    }

    /// Swap in a different manifest; annotations are kept as they are
    pub fn replace_manifest(&mut self, manifest: Manifest) {
        info!(images = manifest.len(), "manifest replaced");
        self.manifest = manifest;
    }

    /// Drop every annotation, in memory and in the store
    pub fn reset(&mut self) {
        if let Err(err) = self.store.reset() {
            warn!(error = %err, "could not clear annotation store");
        }
        self.map = AnnotationMap::new();
    }

    fn commit(&mut self, next: AnnotationMap) {
        self.map = next;
        if let Err(err) = self.store.save(&self.map) {
            warn!(error = %err, "could not persist annotations, keeping in-memory state");
        } else {
            debug!(entries = self.map.len(), "session committed");
        }
    }
}
