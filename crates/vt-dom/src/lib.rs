//! Document model: mounted elements, their vertical bounds, and the scroll position.

use std::collections::BTreeMap;
use std::collections::HashMap;
use vt_core::SpyError;
use vt_core::SpyResult;

/// ID used to address elements in the document arena.
pub type ElementHandle = u64;

/// Vertical extent of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBox {
    pub top: f32,
    pub height: f32,
}

impl ElementBox {
    pub fn new(top: f32, height: f32) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Element {
    anchor: String,
    bounds: ElementBox,
}

/// Host-owned page: the elements currently mounted plus the viewport scroll state.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    elements: BTreeMap<ElementHandle, Element>,
    anchors: HashMap<String, ElementHandle>,
    next_handle: ElementHandle,
    scroll_top: f32,
    viewport_height: f32,
}

impl Document {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            elements: BTreeMap::new(),
            anchors: HashMap::new(),
            next_handle: 1,
            scroll_top: 0.0,
            viewport_height: viewport_height.max(0.0),
        }
    }

    /// Mounts an element addressable by `anchor` (its `id` attribute).
    pub fn mount(&mut self, anchor: &str, bounds: ElementBox) -> SpyResult<ElementHandle> {
        if anchor.trim().is_empty() {
            return Err(SpyError::new(
                "dom.anchor_empty",
                "element anchor must not be empty",
            ));
        }

        if self.anchors.contains_key(anchor) {
            return Err(SpyError::new(
                "dom.anchor_duplicate",
                format!("an element with anchor `{anchor}` is already mounted"),
            ));
        }

        let handle = self.next_handle;
        self.next_handle = self.next_handle.saturating_add(1);
        self.elements.insert(
            handle,
            Element {
                anchor: anchor.to_owned(),
                bounds,
            },
        );
        self.anchors.insert(anchor.to_owned(), handle);
        tracing::trace!(anchor, handle, "element mounted");
        Ok(handle)
    }

    /// Removes an element. Returns false when the handle was not mounted.
    pub fn unmount(&mut self, handle: ElementHandle) -> bool {
        let Some(element) = self.elements.remove(&handle) else {
            return false;
        };
        self.anchors.remove(&element.anchor);
        self.clamp_scroll();
        tracing::trace!(anchor = %element.anchor, handle, "element unmounted");
        true
    }

    /// Moves or resizes a mounted element.
    pub fn set_bounds(&mut self, handle: ElementHandle, bounds: ElementBox) -> bool {
        match self.elements.get_mut(&handle) {
            Some(element) => {
                element.bounds = bounds;
                true
            }
            None => false,
        }
    }

    /// Mounts `anchor` or updates its bounds when already mounted.
    pub fn upsert(&mut self, anchor: &str, bounds: ElementBox) -> SpyResult<ElementHandle> {
        match self.element_by_anchor(anchor) {
            Some(handle) => {
                self.set_bounds(handle, bounds);
                Ok(handle)
            }
            None => self.mount(anchor, bounds),
        }
    }

    pub fn element_by_anchor(&self, anchor: &str) -> Option<ElementHandle> {
        self.anchors.get(anchor).copied()
    }

    /// Like [`Document::element_by_anchor`], reporting a missing anchor as an error.
    pub fn require_element(&self, anchor: &str) -> SpyResult<ElementHandle> {
        self.element_by_anchor(anchor).ok_or_else(|| {
            SpyError::new(
                "dom.element_not_mounted",
                format!("no element with anchor `{anchor}` is mounted"),
            )
        })
    }

    pub fn bounds(&self, handle: ElementHandle) -> Option<ElementBox> {
        self.elements.get(&handle).map(|element| element.bounds)
    }

    pub fn anchor(&self, handle: ElementHandle) -> Option<&str> {
        self.elements
            .get(&handle)
            .map(|element| element.anchor.as_str())
    }

    pub fn is_mounted(&self, handle: ElementHandle) -> bool {
        self.elements.contains_key(&handle)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
        self.clamp_scroll();
    }

    /// Bottom edge of the lowest mounted element.
    pub fn content_height(&self) -> f32 {
        self.elements
            .values()
            .map(|element| element.bounds.bottom())
            .fold(0.0, f32::max)
    }

    pub fn max_scroll_top(&self) -> f32 {
        (self.content_height() - self.viewport_height).max(0.0)
    }

    /// Scrolls to `offset`, clamped to the scrollable range.
    pub fn scroll_to(&mut self, offset: f32) {
        self.scroll_top = offset.clamp(0.0, self.max_scroll_top());
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_to(self.scroll_top + delta);
    }

    /// Aligns the element's top edge with the viewport top, as far as scrolling allows.
    pub fn scroll_into_view(&mut self, handle: ElementHandle) -> bool {
        let Some(bounds) = self.bounds(handle) else {
            return false;
        };
        self.scroll_to(bounds.top);
        true
    }

    fn clamp_scroll(&mut self) {
        self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll_top());
    }
}

#[cfg(test)]
mod tests {
    use super::Document;
    use super::ElementBox;

    fn three_sections() -> Document {
        let mut doc = Document::new(400.0);
        for (index, anchor) in ["overview", "features", "results"].iter().enumerate() {
            let mounted = doc.mount(anchor, ElementBox::new(index as f32 * 500.0, 500.0));
            assert!(mounted.is_ok());
        }
        doc
    }

    #[test]
    fn resolves_mounted_anchor() {
        let doc = three_sections();
        let handle = doc.element_by_anchor("features");
        assert!(handle.is_some());
        let bounds = handle.and_then(|handle| doc.bounds(handle));
        assert_eq!(bounds, Some(ElementBox::new(500.0, 500.0)));
        assert!(doc.element_by_anchor("missing").is_none());
    }

    #[test]
    fn rejects_duplicate_and_empty_anchors() {
        let mut doc = three_sections();
        let duplicate = doc.mount("overview", ElementBox::new(0.0, 10.0));
        assert!(duplicate.is_err());
        if let Err(error) = duplicate {
            assert_eq!(error.code, "dom.anchor_duplicate");
        }
        assert!(doc.mount("  ", ElementBox::new(0.0, 10.0)).is_err());
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut doc = three_sections();
        doc.scroll_to(-20.0);
        assert_eq!(doc.scroll_top(), 0.0);
        doc.scroll_to(5_000.0);
        assert_eq!(doc.scroll_top(), 1100.0);
    }

    #[test]
    fn scroll_into_view_aligns_top() {
        let mut doc = three_sections();
        let handle = doc.element_by_anchor("features");
        assert!(handle.is_some_and(|handle| doc.scroll_into_view(handle)));
        assert_eq!(doc.scroll_top(), 500.0);
    }

    #[test]
    fn unmount_frees_anchor() {
        let mut doc = three_sections();
        let handle = doc.element_by_anchor("results").unwrap_or_else(|| unreachable!());
        assert!(doc.unmount(handle));
        assert!(!doc.unmount(handle));
        assert!(doc.element_by_anchor("results").is_none());
        assert!(doc.mount("results", ElementBox::new(1000.0, 500.0)).is_ok());
    }

    #[test]
    fn require_element_reports_not_mounted() {
        let doc = Document::new(400.0);
        let missing = doc.require_element("p1-results");
        assert!(missing.is_err());
        if let Err(error) = missing {
            assert_eq!(error.kind(), vt_core::ErrorKind::ElementNotMounted);
        }
    }
}
