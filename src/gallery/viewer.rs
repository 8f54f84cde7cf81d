/// Lightbox cursor for a collection viewer
///
/// Only the cursor lives here; the collection being shown is owned by the
/// caller, which passes its length to each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lightbox {
    index: Option<usize>,
}

impl Lightbox {
    pub fn open(&mut self, index: usize) {
        self.index = Some(index);
    }

    pub fn close(&mut self) {
        self.index = None;
    }

    pub fn is_open(&self) -> bool {
        self.index.is_some()
    }

    pub fn current(&self) -> Option<usize> {
        self.index
    }

    /// Step forward, wrapping to the first image
    pub fn next(&mut self, len: usize) {
        if let Some(index) = self.index {
            if len > 0 {
                self.index = Some((index + 1) % len);
            }
        }
    }

    /// Step back, wrapping to the last image
    pub fn prev(&mut self, len: usize) {
        if let Some(index) = self.index {
            if len > 0 {
                self.index = Some((index + len - 1) % len);
            }
        }
    }

    /// "3 / 12" style counter
    pub fn position_label(&self, len: usize) -> Option<String> {
        self.index.map(|index| format!("{} / {}", index + 1, len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_both_ways() {
        let mut lightbox = Lightbox::default();
        lightbox.open(2);
        lightbox.next(3);
        assert_eq!(lightbox.current(), Some(0));
        lightbox.prev(3);
        assert_eq!(lightbox.current(), Some(2));
        assert_eq!(lightbox.position_label(3).as_deref(), Some("3 / 3"));
    }

    #[test]
    fn test_closed_or_empty_is_noop() {
        let mut lightbox = Lightbox::default();
        lightbox.next(5);
        assert!(!lightbox.is_open());

        lightbox.open(0);
        lightbox.prev(0);
        assert_eq!(lightbox.current(), Some(0));

        lightbox.close();
        assert_eq!(lightbox.position_label(5), None);
    }
}
