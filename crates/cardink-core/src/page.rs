//! Pages: named canvases holding items.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Template;
use crate::items::{ImageRef, Item, ItemId, BASE_Z_INDEX};

/// Unique identifier for a page.
pub type PageId = Uuid;

pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

/// A single card page: a fixed-size canvas, an optional background image
/// and an unordered item set with a stable insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub name: String,
    pub background: Option<ImageRef>,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Template the page was created from, if any.
    pub template_id: Option<String>,
    items: HashMap<ItemId, Item>,
    /// Insertion order; the deterministic tie break for equal z_index.
    order: Vec<ItemId>,
}

impl Page {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            background: None,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            template_id: None,
            items: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn from_template(name: impl Into<String>, template: &Template) -> Self {
        let mut page = Self::new(name);
        page.apply_template(template);
        page
    }

    /// Replace background and canvas dimensions from a template and clear
    /// all items. Selection handling is the document's job.
    pub fn apply_template(&mut self, template: &Template) {
        self.background = Some(template.image.clone());
        self.canvas_width = template.width;
        self.canvas_height = template.height;
        self.template_id = Some(template.id.clone());
        self.items.clear();
        self.order.clear();
    }

    pub fn insert(&mut self, item: Item) -> ItemId {
        let id = item.id();
        if self.items.insert(id, item).is_none() {
            self.order.push(id);
        }
        id
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let removed = self.items.remove(&id);
        if removed.is_some() {
            self.order.retain(|other| *other != id);
        }
        removed
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.items.values_mut()
    }

    /// Items in paint order: ascending z_index, insertion order breaking ties.
    pub fn items_ordered(&self) -> Vec<&Item> {
        let mut ordered: Vec<&Item> = self.iter().collect();
        ordered.sort_by_key(|item| item.z_index());
        ordered
    }

    /// Stacking key for the next item added on top: one above the current
    /// maximum, never below `BASE_Z_INDEX`.
    pub fn next_z_index(&self) -> i32 {
        self.items
            .values()
            .map(Item::z_index)
            .max()
            .unwrap_or(BASE_Z_INDEX - 1)
            .max(BASE_Z_INDEX - 1)
            + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogs;
    use crate::items::{ImageItem, TextItem};
    use kurbo::Point;

    fn text(z: i32) -> Item {
        let mut t = TextItem::new(Point::ZERO, "t".into());
        t.z_index = z;
        Item::Text(t)
    }

    #[test]
    fn first_item_lands_on_base_z() {
        let page = Page::new("Page 1");
        assert_eq!(page.next_z_index(), BASE_Z_INDEX);
    }

    #[test]
    fn ordered_is_stable_for_equal_z() {
        let mut page = Page::new("Page 1");
        let a = page.insert(text(7));
        let b = page.insert(text(7));
        let c = page.insert(text(3));
        let ids: Vec<ItemId> = page.items_ordered().iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![c, a, b]);
    }

    #[test]
    fn template_clears_items_and_sets_dimensions() {
        let catalogs = Catalogs::builtin();
        let mut page = Page::new("Page 1");
        page.insert(Item::Image(ImageItem::new(
            ImageRef::Named("ic1".into()),
            Point::ZERO,
            40.0,
            40.0,
        )));
        let template = &catalogs.templates[1];
        page.apply_template(template);
        assert!(page.is_empty());
        assert_eq!(page.canvas_width, template.width);
        assert_eq!(page.canvas_height, template.height);
        assert_eq!(page.background.as_ref(), Some(&template.image));
    }

    #[test]
    fn remove_keeps_order_consistent() {
        let mut page = Page::new("Page 1");
        let a = page.insert(text(5));
        let b = page.insert(text(6));
        assert!(page.remove(a).is_some());
        assert!(page.remove(a).is_none());
        assert_eq!(page.items_ordered().len(), 1);
        assert_eq!(page.items_ordered()[0].id(), b);
    }
}
