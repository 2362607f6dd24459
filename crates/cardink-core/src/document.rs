//! The document store: pages, items, selection.

use kurbo::{Point, Size, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::Template;
use crate::items::{ImageItem, ImageRef, Item, ItemId, ItemPatch, TextItem, BASE_Z_INDEX};
use crate::page::{Page, PageId};

/// Placeholder content for freshly added text items.
pub const NEW_TEXT_PLACEHOLDER: &str = "Double-click to edit";

/// Fraction of the canvas a newly placed image may cover at most, per axis.
const NEW_IMAGE_MAX_FRACTION: f64 = 0.25;

/// A multi-page card document plus its transient selection.
///
/// All mutation goes through these methods so the invariants hold: at most
/// one selected item, on the current page only; at most one text item in
/// editing mode per page. Operations addressing an unknown page or item are
/// silent no-ops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pages: Vec<Page>,
    current: usize,
    selection: Option<ItemId>,
}

impl Document {
    /// An empty document holding one page built from the given template.
    pub fn new(template: &Template) -> Self {
        let mut doc = Self {
            pages: Vec::new(),
            current: 0,
            selection: None,
        };
        doc.add_page(template);
        doc
    }

    // --- pages -----------------------------------------------------------

    /// Append a page from a template and make it current.
    pub fn add_page(&mut self, template: &Template) -> PageId {
        let name = format!("Page {}", self.pages.len() + 1);
        let page = Page::from_template(name, template);
        let id = page.id;
        self.pages.push(page);
        self.current = self.pages.len() - 1;
        self.selection = None;
        id
    }

    /// Switch the current page. Clears the selection; a no-op for an unknown
    /// id.
    pub fn set_current_page(&mut self, id: PageId) {
        if let Some(index) = self.pages.iter().position(|p| p.id == id) {
            if index != self.current {
                self.current = index;
                self.selection = None;
            }
        }
    }

    /// Re-template a page: new background and dimensions, items cleared.
    pub fn apply_template(&mut self, page: PageId, template: &Template) {
        let is_current = self.current_page().map(|p| p.id) == Some(page);
        if let Some(page) = self.page_mut(page) {
            page.apply_template(template);
            if is_current {
                self.selection = None;
            }
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.current)
    }

    pub fn current_page_mut(&mut self) -> Option<&mut Page> {
        self.pages.get_mut(self.current)
    }

    // --- items -----------------------------------------------------------

    /// Insert a pre-built item on the current page, on top of the stack.
    pub fn add_item(&mut self, mut item: Item) -> Option<ItemId> {
        let page = self.pages.get_mut(self.current)?;
        item.set_z_index(page.next_z_index());
        Some(page.insert(item))
    }

    /// Add a placeholder text item at the center of the current page, select
    /// it and open it for editing.
    pub fn add_text(&mut self) -> Option<ItemId> {
        let page = self.current_page()?;
        let center = Point::new(page.canvas_width / 2.0, page.canvas_height / 2.0);
        let mut text = TextItem::new(
            // Nominal 100x30 box centered on the page.
            Point::new(center.x - 50.0, center.y - 15.0),
            NEW_TEXT_PLACEHOLDER.to_string(),
        );
        text.is_editing = true;
        let id = self.add_item(Item::Text(text))?;
        self.select_item(Some(id));
        Some(id)
    }

    /// Add an image centered on the current page, scaled down (never up) so
    /// it covers at most a quarter of the canvas per axis, preserving the
    /// source aspect ratio.
    pub fn add_image(&mut self, image: ImageRef, source: Size) -> Option<ItemId> {
        let page = self.current_page()?;
        let max_w = page.canvas_width * NEW_IMAGE_MAX_FRACTION;
        let max_h = page.canvas_height * NEW_IMAGE_MAX_FRACTION;
        let scale = (max_w / source.width).min(max_h / source.height).min(1.0);
        let size = source * scale;
        let position = Point::new(
            (page.canvas_width - size.width) / 2.0,
            (page.canvas_height - size.height) / 2.0,
        );
        let id = self.add_item(Item::Image(ImageItem::new(
            image,
            position,
            size.width,
            size.height,
        )))?;
        self.select_item(Some(id));
        Some(id)
    }

    /// Apply a partial patch to an item. Unknown page or item ids are silent
    /// no-ops.
    pub fn update_item(&mut self, page: PageId, item: ItemId, patch: &ItemPatch) {
        if let Some(target) = self.page_mut(page).and_then(|p| p.get_mut(item)) {
            target.apply_patch(patch);
        } else {
            debug!("update_item: no such item {item} on page {page}");
        }
    }

    /// Remove an item; clears the selection if it pointed at the item.
    pub fn delete_item(&mut self, page: PageId, item: ItemId) {
        if let Some(page) = self.page_mut(page) {
            if page.remove(item).is_some() && self.selection == Some(item) {
                self.selection = None;
            }
        }
    }

    // --- selection -------------------------------------------------------

    pub fn selection(&self) -> Option<ItemId> {
        self.selection
    }

    pub fn selected_item(&self) -> Option<&Item> {
        let id = self.selection?;
        self.current_page()?.get(id)
    }

    /// Select an item on the current page (or clear with `None`). Every
    /// other text item on the page leaves editing mode; the selected item's
    /// own editing flag is left as-is.
    pub fn select_item(&mut self, item: Option<ItemId>) {
        let Some(page) = self.pages.get_mut(self.current) else {
            return;
        };
        let item = item.filter(|id| page.contains(*id));
        for other in page.iter_mut() {
            if Some(other.id()) != item {
                if let Some(text) = other.as_text_mut() {
                    text.is_editing = false;
                }
            }
        }
        self.selection = item;
    }

    /// Put a text item into inline editing mode (selecting it first).
    pub fn begin_text_edit(&mut self, item: ItemId) {
        self.select_item(Some(item));
        if self.selection == Some(item) {
            if let Some(text) = self
                .current_page_mut()
                .and_then(|p| p.get_mut(item))
                .and_then(Item::as_text_mut)
            {
                text.is_editing = true;
            }
        }
    }

    // --- z-order ---------------------------------------------------------

    /// Raise an item above everything else on its page.
    pub fn bring_to_front(&mut self, page: PageId, item: ItemId) {
        let Some(page) = self.page_mut(page) else {
            return;
        };
        if !page.contains(item) {
            return;
        }
        let max_other = page
            .iter()
            .filter(|other| other.id() != item)
            .map(Item::z_index)
            .max()
            .unwrap_or(BASE_Z_INDEX - 1)
            .max(BASE_Z_INDEX - 1);
        if let Some(target) = page.get_mut(item) {
            target.set_z_index(max_other + 1);
        }
    }

    /// Push an item below everything else on its page, but never below the
    /// base stacking floor.
    pub fn send_to_back(&mut self, page: PageId, item: ItemId) {
        let Some(page) = self.page_mut(page) else {
            return;
        };
        if !page.contains(item) {
            return;
        }
        let min_other = page
            .iter()
            .filter(|other| other.id() != item)
            .map(Item::z_index)
            .min()
            .unwrap_or(BASE_Z_INDEX + 1)
            .min(BASE_Z_INDEX + 1);
        if let Some(target) = page.get_mut(item) {
            target.set_z_index((min_other - 1).max(BASE_Z_INDEX));
        }
    }

    // --- export + persistence --------------------------------------------

    /// Deep copy with selection and editing state stripped, for rendering.
    /// The live document is untouched.
    pub fn export_snapshot(&self) -> Document {
        let mut snapshot = self.clone();
        snapshot.selection = None;
        for page in &mut snapshot.pages {
            for item in page.iter_mut() {
                if let Some(text) = item.as_text_mut() {
                    text.is_editing = false;
                }
            }
        }
        snapshot
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Document> {
        serde_json::from_str(json)
    }

    /// Move an item by a canvas-space delta, clamping each axis so the
    /// item's unrotated bounding box stays on the page.
    pub fn move_item_clamped(&mut self, page: PageId, item: ItemId, delta: Vec2) {
        let Some(page) = self.page_mut(page) else {
            return;
        };
        let (canvas_w, canvas_h) = (page.canvas_width, page.canvas_height);
        if let Some(target) = page.get_mut(item) {
            let extent = target.extent();
            let pos = target.position() + delta;
            target.set_position(clamp_to_page(pos, extent, canvas_w, canvas_h));
        }
    }
}

/// Clamp a position so an `extent`-sized box stays inside the page.
/// Rotation is ignored, matching the interactive clamping contract.
pub fn clamp_to_page(pos: Point, extent: Size, canvas_w: f64, canvas_h: f64) -> Point {
    Point::new(
        pos.x.clamp(0.0, (canvas_w - extent.width).max(0.0)),
        pos.y.clamp(0.0, (canvas_h - extent.height).max(0.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogs;

    fn doc() -> Document {
        let catalogs = Catalogs::builtin();
        Document::new(catalogs.default_template())
    }

    #[test]
    fn new_text_lands_at_page_center() {
        let mut doc = doc();
        let id = doc.add_text().unwrap();
        let page = doc.current_page().unwrap();
        let item = page.get(id).unwrap();
        // 800x600 canvas, nominal 100x30 box.
        assert_eq!(item.position(), Point::new(350.0, 285.0));
        assert_eq!(item.z_index(), BASE_Z_INDEX);
        assert!(item.as_text().unwrap().is_editing);
        assert_eq!(doc.selection(), Some(id));
    }

    #[test]
    fn new_image_scaled_to_quarter_canvas() {
        let mut doc = doc();
        let id = doc
            .add_image(ImageRef::Named("icon1".into()), Size::new(1000.0, 500.0))
            .unwrap();
        let item = doc.current_page().unwrap().get(id).unwrap();
        let img = item.as_image().unwrap();
        // 25% of 800 = 200 wide, aspect 2:1 preserved.
        assert_eq!((img.width, img.height), (200.0, 100.0));
        assert_eq!(item.position(), Point::new(300.0, 250.0));
    }

    #[test]
    fn small_images_are_not_scaled_up() {
        let mut doc = doc();
        let id = doc
            .add_image(ImageRef::Named("icon1".into()), Size::new(50.0, 40.0))
            .unwrap();
        let img = doc.current_page().unwrap().get(id).unwrap();
        assert_eq!(img.extent(), Size::new(50.0, 40.0));
    }

    #[test]
    fn z_order_round_trip() {
        let mut doc = doc();
        let a = doc.add_text().unwrap();
        let b = doc.add_text().unwrap();
        let c = doc.add_text().unwrap();
        let page = doc.current_page().unwrap().id;

        doc.bring_to_front(page, a);
        let z = |doc: &Document, id| doc.page(page).unwrap().get(id).unwrap().z_index();
        assert!(z(&doc, a) > z(&doc, b));
        assert!(z(&doc, a) > z(&doc, c));

        doc.send_to_back(page, a);
        assert!(z(&doc, a) < z(&doc, b));
        assert!(z(&doc, a) >= BASE_Z_INDEX);
    }

    #[test]
    fn send_to_back_respects_floor() {
        let mut doc = doc();
        let a = doc.add_text().unwrap();
        let page = doc.current_page().unwrap().id;
        doc.send_to_back(page, a);
        doc.send_to_back(page, a);
        assert!(doc.page(page).unwrap().get(a).unwrap().z_index() >= BASE_Z_INDEX);
    }

    #[test]
    fn selection_forces_single_editing_text() {
        let mut doc = doc();
        let a = doc.add_text().unwrap();
        let b = doc.add_text().unwrap();
        // b was added last and is editing; selecting a must close b.
        doc.select_item(Some(a));
        let page = doc.current_page().unwrap();
        assert!(!page.get(b).unwrap().as_text().unwrap().is_editing);
        let editing = page
            .iter()
            .filter(|i| i.as_text().is_some_and(|t| t.is_editing))
            .count();
        assert!(editing <= 1);
    }

    #[test]
    fn delete_clears_selection() {
        let mut doc = doc();
        let a = doc.add_text().unwrap();
        let page = doc.current_page().unwrap().id;
        assert_eq!(doc.selection(), Some(a));
        doc.delete_item(page, a);
        assert_eq!(doc.selection(), None);
        assert!(doc.page(page).unwrap().is_empty());
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let mut doc = doc();
        let a = doc.add_text().unwrap();
        let page = doc.current_page().unwrap().id;
        let before = doc.to_json().unwrap();
        doc.update_item(page, ItemId::new_v4(), &ItemPatch::position(1.0, 1.0));
        doc.update_item(PageId::new_v4(), a, &ItemPatch::position(1.0, 1.0));
        doc.delete_item(page, ItemId::new_v4());
        doc.bring_to_front(page, ItemId::new_v4());
        assert_eq!(doc.to_json().unwrap(), before);
    }

    #[test]
    fn page_switch_clears_selection() {
        let catalogs = Catalogs::builtin();
        let mut doc = Document::new(catalogs.default_template());
        let first = doc.current_page().unwrap().id;
        doc.add_text().unwrap();
        assert!(doc.selection().is_some());
        doc.add_page(&catalogs.templates[1]);
        assert_eq!(doc.selection(), None);
        doc.set_current_page(first);
        assert_eq!(doc.selection(), None);
    }

    #[test]
    fn move_clamps_to_page_bounds() {
        let mut doc = doc();
        let a = doc.add_text().unwrap();
        let page = doc.current_page().unwrap().id;
        doc.move_item_clamped(page, a, Vec2::new(-10_000.0, -10_000.0));
        assert_eq!(
            doc.page(page).unwrap().get(a).unwrap().position(),
            Point::ZERO
        );
        doc.move_item_clamped(page, a, Vec2::new(10_000.0, 10_000.0));
        // 800x600 page, nominal 100x30 box.
        assert_eq!(
            doc.page(page).unwrap().get(a).unwrap().position(),
            Point::new(700.0, 570.0)
        );
    }

    #[test]
    fn export_snapshot_strips_transient_state() {
        let mut doc = doc();
        let a = doc.add_text().unwrap();
        let snapshot = doc.export_snapshot();
        assert_eq!(snapshot.selection(), None);
        let page = snapshot.current_page().unwrap();
        assert!(!page.get(a).unwrap().as_text().unwrap().is_editing);
        // Live store untouched.
        assert_eq!(doc.selection(), Some(a));
        assert!(doc
            .selected_item()
            .unwrap()
            .as_text()
            .unwrap()
            .is_editing);
    }

    #[test]
    fn json_round_trip() {
        let mut doc = doc();
        doc.add_text().unwrap();
        doc.add_image(ImageRef::Named("icon1".into()), Size::new(80.0, 80.0))
            .unwrap();
        let json = doc.to_json().unwrap();
        let back = Document::from_json(&json).unwrap();
        assert_eq!(back.pages().len(), 1);
        assert_eq!(back.current_page().unwrap().len(), 2);
    }
}
