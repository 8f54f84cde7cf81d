/// The annotation map: sparse per-image metadata
///
/// Absent keys mean "all defaults, no category". Every read goes through
/// [`AnnotationMap::get`] so there is exactly one place defaults are filled.
/// Updates are pure and return a new map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::data::{Annotation, AnnotationPatch, ImageId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationMap(BTreeMap<ImageId, Annotation>);

impl AnnotationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored annotation, or a default-valued one
    pub fn get(&self, id: &str) -> Annotation {
        self.0.get(id).cloned().unwrap_or_default()
    }

    /// Borrow the stored annotation without filling defaults
    pub fn stored(&self, id: &str) -> Option<&Annotation> {
        self.0.get(id)
    }

    /// New map with `id`'s annotation merged with `patch`
    pub fn update(&self, id: &ImageId, patch: AnnotationPatch) -> AnnotationMap {
        let mut next = self.clone();
        next.apply(id, patch);
        next
    }

    /// In-place variant of [`update`](Self::update) for bulk edits on a copy
    pub(crate) fn apply(&mut self, id: &ImageId, patch: AnnotationPatch) {
        let merged = patch.apply_to(self.get(id.as_str()));
        self.0.insert(id.clone(), merged);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ImageId, &Annotation)> {
        self.0.iter()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a stored blob. Only a blob that is not a JSON object fails;
    /// an entry that is not an annotation object is dropped on its own.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<ImageId, serde_json::Value> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .filter_map(|(id, value)| match serde_json::from_value::<Annotation>(value) {
                Ok(annotation) => Some((id, annotation)),
                Err(err) => {
                    warn!(image = %id, error = %err, "unreadable annotation dropped");
                    None
                }
            })
            .collect();
        Ok(Self(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{Category, SizeClass};

    #[test]
    fn test_get_fills_defaults() {
        let map = AnnotationMap::new();
        assert_eq!(map.get("/portraits/missing.jpg"), Annotation::default());
        assert!(map.stored("/portraits/missing.jpg").is_none());
    }

    #[test]
    fn test_update_is_pure() {
        let id = ImageId::from("/portraits/M_PG0660.jpg");
        let before = AnnotationMap::new();
        let after = before.update(&id, AnnotationPatch::category(Some(Category::Portraits)));

        assert!(before.is_empty());
        assert_eq!(after.len(), 1);
        assert_eq!(after.get(id.as_str()).category, Some(Category::Portraits));
    }

    #[test]
    fn test_update_merges_with_previous_value() {
        let id = ImageId::from("/events/SEAN0004.jpg");
        let map = AnnotationMap::new()
            .update(&id, AnnotationPatch::title("Holiday Party"))
            .update(&id, AnnotationPatch::size(SizeClass::Wide));

        let annotation = map.get(id.as_str());
        assert_eq!(annotation.title, "Holiday Party");
        assert_eq!(annotation.size, SizeClass::Wide);
        assert_eq!(annotation.crop_anchor, "center");
    }

    #[test]
    fn test_json_roundtrip_is_keyed_by_path() {
        let id = ImageId::from("/creative/PPGS5140.jpg");
        let map = AnnotationMap::new().update(&id, AnnotationPatch::cover(true));
        let json = map.to_json().unwrap();
        assert!(json.starts_with(r#"{"/creative/PPGS5140.jpg":"#));

        let restored = AnnotationMap::from_json(&json).unwrap();
        assert_eq!(restored, map);
    }
}
