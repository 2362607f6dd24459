//! Pointer gesture engine: move, resize, rotate and pan.
//!
//! One gesture is active at a time. Each pointer-move recomputes the target
//! state from values captured at gesture start plus the current pointer, so
//! gestures are insensitive to intermediate event coalescing. Pointer-up
//! commits whatever state the document already holds; there is no rollback.

use kurbo::{Point, Size, Vec2};

use crate::document::{clamp_to_page, Document};
use crate::handles::{hit_test_handles, HandleKind};
use crate::input::PointerEvent;
use crate::items::{Item, ItemId, ItemPatch, MIN_ITEM_HEIGHT, MIN_ITEM_WIDTH};
use crate::page::PageId;
use crate::viewport::Viewport;

/// Transient stacking boost painted onto the item under an active gesture.
/// The persisted z_index never changes.
pub const ACTIVE_Z_BOOST: i32 = 1000;

/// State captured when a gesture begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActiveGesture {
    Move {
        page: PageId,
        item: ItemId,
        /// Screen position of the initiating pointer-down.
        start_pointer: Point,
        start_position: Point,
    },
    Resize {
        page: PageId,
        item: ItemId,
        start_pointer: Point,
        start_size: Size,
        /// Captured for proportional resize; free resize leaves it unused.
        aspect: f64,
    },
    Rotate {
        page: PageId,
        item: ItemId,
        /// Screen position of the item center, fixed for the gesture.
        center: Point,
        /// Pointer angle about the center at gesture start, radians.
        start_angle: f64,
        start_rotation: f64,
    },
    Pan {
        last_pointer: Point,
    },
}

impl ActiveGesture {
    fn item(&self) -> Option<ItemId> {
        match self {
            ActiveGesture::Move { item, .. }
            | ActiveGesture::Resize { item, .. }
            | ActiveGesture::Rotate { item, .. } => Some(*item),
            ActiveGesture::Pan { .. } => None,
        }
    }
}

/// Routes pointer events into document and viewport mutations.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    active: Option<ActiveGesture>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveGesture> {
        self.active.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Paint-time stacking key: the item under an active gesture floats
    /// above everything while the drag lasts.
    pub fn effective_z_index(&self, item: &Item) -> i32 {
        match &self.active {
            Some(gesture) if gesture.item() == Some(item.id()) => {
                item.z_index() + ACTIVE_Z_BOOST
            }
            _ => item.z_index(),
        }
    }

    pub fn begin_move(&mut self, doc: &Document, page: PageId, item: ItemId, pointer: Point) {
        if let Some(target) = doc.page(page).and_then(|p| p.get(item)) {
            self.active = Some(ActiveGesture::Move {
                page,
                item,
                start_pointer: pointer,
                start_position: target.position(),
            });
        }
    }

    pub fn begin_resize(&mut self, doc: &Document, page: PageId, item: ItemId, pointer: Point) {
        if let Some(target) = doc.page(page).and_then(|p| p.get(item)) {
            let size = target.extent();
            self.active = Some(ActiveGesture::Resize {
                page,
                item,
                start_pointer: pointer,
                start_size: size,
                aspect: size.width / size.height,
            });
        }
    }

    /// Begin rotating. `center` is the item center in screen coordinates;
    /// it stays fixed for the whole gesture even while the item rotates.
    pub fn begin_rotate(
        &mut self,
        doc: &Document,
        page: PageId,
        item: ItemId,
        center: Point,
        pointer: Point,
    ) {
        if let Some(target) = doc.page(page).and_then(|p| p.get(item)) {
            self.active = Some(ActiveGesture::Rotate {
                page,
                item,
                center,
                start_angle: pointer_angle(center, pointer),
                start_rotation: target.rotation(),
            });
        }
    }

    pub fn begin_pan(&mut self, pointer: Point) {
        self.active = Some(ActiveGesture::Pan {
            last_pointer: pointer,
        });
    }

    /// Advance the active gesture to the current pointer position.
    pub fn update(&mut self, doc: &mut Document, viewport: &mut Viewport, pointer: Point) {
        match &mut self.active {
            None => {}
            Some(ActiveGesture::Move {
                page,
                item,
                start_pointer,
                start_position,
            }) => {
                let delta = viewport.screen_delta_to_canvas(pointer - *start_pointer);
                let (page, item) = (*page, *item);
                let desired = *start_position + delta;
                let Some(target_page) = doc.page(page) else {
                    return;
                };
                let (canvas_w, canvas_h) = (target_page.canvas_width, target_page.canvas_height);
                let Some(extent) = target_page.get(item).map(Item::extent) else {
                    return;
                };
                let clamped = clamp_to_page(desired, extent, canvas_w, canvas_h);
                doc.update_item(page, item, &ItemPatch::position(clamped.x, clamped.y));
            }
            Some(ActiveGesture::Resize {
                page,
                item,
                start_pointer,
                start_size,
                ..
            }) => {
                let delta = viewport.screen_delta_to_canvas(pointer - *start_pointer);
                let width = (start_size.width + delta.x).max(MIN_ITEM_WIDTH);
                let height = (start_size.height + delta.y).max(MIN_ITEM_HEIGHT);
                let (page, item) = (*page, *item);
                doc.update_item(page, item, &ItemPatch::size(width, height));
            }
            Some(ActiveGesture::Rotate {
                page,
                item,
                center,
                start_angle,
                start_rotation,
            }) => {
                let angle = pointer_angle(*center, pointer);
                let rotation = *start_rotation + (angle - *start_angle).to_degrees();
                let (page, item) = (*page, *item);
                doc.update_item(page, item, &ItemPatch::rotation(rotation));
            }
            Some(ActiveGesture::Pan { last_pointer }) => {
                let delta = pointer - *last_pointer;
                *last_pointer = pointer;
                viewport.pan(delta);
            }
        }
    }

    /// End the active gesture, committing the document as it stands.
    pub fn end(&mut self) {
        self.active = None;
    }

    /// Route a raw pointer event. `canvas_origin` is the screen position of
    /// the current page's top-left corner (pan already applied).
    pub fn handle_event(
        &mut self,
        doc: &mut Document,
        viewport: &mut Viewport,
        event: PointerEvent,
        canvas_origin: Point,
    ) {
        match event {
            PointerEvent::Down { position, .. } => {
                if event.is_pan_trigger() {
                    self.begin_pan(position);
                    return;
                }
                let Some(page_id) = doc.current_page().map(|p| p.id) else {
                    return;
                };
                let canvas_point = viewport.screen_to_canvas(position, canvas_origin);

                // Handles of the selected item win over item bodies.
                if let (Some(selected_id), Some(selected)) =
                    (doc.selection(), doc.selected_item())
                {
                    match hit_test_handles(selected, canvas_point, viewport.zoom()) {
                        Some(HandleKind::Resize) => {
                            self.begin_resize(doc, page_id, selected_id, position);
                            return;
                        }
                        Some(HandleKind::Rotate) => {
                            let center = canvas_origin
                                + selected.center().to_vec2() * viewport.zoom();
                            self.begin_rotate(doc, page_id, selected_id, center, position);
                            return;
                        }
                        None => {}
                    }
                }

                // Topmost item under the pointer, in descending paint order.
                let hit = doc
                    .current_page()
                    .map(|p| p.items_ordered())
                    .unwrap_or_default()
                    .iter()
                    .rev()
                    .find(|item| item.bounds().contains(canvas_point))
                    .map(|item| item.id());
                match hit {
                    Some(id) => {
                        doc.select_item(Some(id));
                        self.begin_move(doc, page_id, id, position);
                    }
                    None => doc.select_item(None),
                }
            }
            PointerEvent::Move { position } => self.update(doc, viewport, position),
            PointerEvent::Up { .. } => self.end(),
        }
    }
}

fn pointer_angle(center: Point, pointer: Point) -> f64 {
    let d: Vec2 = pointer - center;
    d.y.atan2(d.x)
}
