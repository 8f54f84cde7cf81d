use crate::state::data::{Category, ExportedImage, SizeClass};

/// One collection of the public gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub category: Category,
    /// Members in input order
    pub images: Vec<ExportedImage>,
}

impl CategoryGroup {
    /// Cover card image for this collection
    pub fn cover(&self) -> Option<&ExportedImage> {
        select_cover(&self.images)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }
}

/// Group images by category.
///
/// Groups come out in category order regardless of input order, keep input
/// order inside each group, and empty categories are left out.
pub fn group_by_category(images: &[ExportedImage]) -> Vec<CategoryGroup> {
    let mut buckets: Vec<Vec<ExportedImage>> = vec![Vec::new(); Category::ALL.len()];
    for image in images {
        buckets[image.category.rank()].push(image.clone());
    }

    Category::ALL
        .iter()
        .zip(buckets)
        .filter(|(_, images)| !images.is_empty())
        .map(|(category, images)| CategoryGroup { category: *category, images })
        .collect()
}

/// First image flagged as cover, else the first image
pub fn select_cover(images: &[ExportedImage]) -> Option<&ExportedImage> {
    images.iter().find(|image| image.is_cover).or_else(|| images.first())
}

/// Portrait (3:4) rather than landscape (4:3) frame
pub fn is_tall_layout(image: &ExportedImage) -> bool {
    matches!(image.size, SizeClass::Tall | SizeClass::Hero | SizeClass::Feature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::ImageId;

    fn image(src: &str, category: Category) -> ExportedImage {
        ExportedImage {
            src: ImageId::from(src),
            category,
            size: SizeClass::Standard,
            title: String::new(),
            alt: String::new(),
            object_position: None,
            is_cover: false,
        }
    }

    fn cover(src: &str, category: Category) -> ExportedImage {
        ExportedImage { is_cover: true, ..image(src, category) }
    }

    #[test]
    fn test_groups_follow_category_order() {
        let images = vec![
            image("/c/1.jpg", Category::Community),
            image("/p/1.jpg", Category::Portraits),
            image("/c/2.jpg", Category::Community),
        ];
        let groups = group_by_category(&images);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, Category::Portraits);
        assert_eq!(groups[1].category, Category::Community);
        let community: Vec<&str> = groups[1].images.iter().map(|i| i.src.as_str()).collect();
        assert_eq!(community, vec!["/c/1.jpg", "/c/2.jpg"]);
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(group_by_category(&[]).is_empty());
    }

    #[test]
    fn test_cover_defaults_to_first() {
        let group = vec![
            image("/p/1.jpg", Category::Portraits),
            image("/p/2.jpg", Category::Portraits),
            image("/p/3.jpg", Category::Portraits),
        ];
        assert_eq!(select_cover(&group).unwrap().src.as_str(), "/p/1.jpg");
        assert!(select_cover(&[]).is_none());
    }

    #[test]
    fn test_first_flagged_cover_wins() {
        let group = vec![
            image("/p/1.jpg", Category::Portraits),
            cover("/p/2.jpg", Category::Portraits),
            cover("/p/3.jpg", Category::Portraits),
        ];
        assert_eq!(select_cover(&group).unwrap().src.as_str(), "/p/2.jpg");
    }

    #[test]
    fn test_scenario_grouping_and_cover() {
        let images = vec![
            image("/a/1.jpg", Category::Portraits),
            cover("/a/2.jpg", Category::Portraits),
            image("/b/3.jpg", Category::Community),
        ];
        let groups = group_by_category(&images);

        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0].cover().unwrap().src.as_str(), "/a/2.jpg");
        assert_eq!(groups[1].images[0].src.as_str(), "/b/3.jpg");
        assert_eq!(groups[1].cover().unwrap().src.as_str(), "/b/3.jpg");
    }

    #[test]
    fn test_tall_layout() {
        for size in SizeClass::ALL {
            let mut img = image("/p/1.jpg", Category::Portraits);
            img.size = *size;
            let expected = matches!(size, SizeClass::Tall | SizeClass::Hero | SizeClass::Feature);
            assert_eq!(is_tall_layout(&img), expected, "{size}");
        }
    }
}
