//! Cardink Core Library
//!
//! Platform-agnostic document model and interaction engine for the Cardink
//! invitation card editor: pages, positioned text/image items, viewport
//! zoom/pan, pointer gestures and z-order bookkeeping. Rendering lives in
//! the `cardink-render` crate.

pub mod catalog;
pub mod document;
pub mod gesture;
pub mod handles;
pub mod input;
pub mod items;
pub mod page;
pub mod viewport;

pub use catalog::{AssetEntry, Catalogs, Template, UserImageLibrary};
pub use document::Document;
pub use gesture::{GestureController, ACTIVE_Z_BOOST};
pub use handles::{handle_positions, hit_test_handles, Handle, HandleKind};
pub use input::{Modifiers, MouseButton, PointerEvent};
pub use items::{
    Color, FontFamily, ImageItem, ImageRef, Item, ItemId, ItemPatch, TextItem, BASE_Z_INDEX,
    MIN_ITEM_HEIGHT, MIN_ITEM_WIDTH,
};
pub use page::{Page, PageId, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
pub use viewport::{Viewport, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
