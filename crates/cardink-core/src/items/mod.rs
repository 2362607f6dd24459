//! Item definitions for the card editor.

mod image;
mod text;

pub use image::{ImageItem, ImageRef};
pub use text::{FontFamily, TextItem, LINE_HEIGHT_FACTOR, NOMINAL_TEXT_HEIGHT, NOMINAL_TEXT_WIDTH};

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an item within a page.
pub type ItemId = Uuid;

/// Minimum width an image item may be resized to.
pub const MIN_ITEM_WIDTH: f64 = 20.0;
/// Minimum height an image item may be resized to.
pub const MIN_ITEM_HEIGHT: f64 = 20.0;
/// Stacking floor: freshly created items start here and `send_to_back`
/// never assigns anything below it.
pub const BASE_Z_INDEX: i32 = 5;

/// Serializable RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Error parsing a hex color string.
#[derive(Debug, thiserror::Error)]
#[error("invalid hex color: {0:?}")]
pub struct ColorParseError(pub String);

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError(hex.to_string()))?
            .trim();
        if !digits.is_ascii() {
            return Err(ColorParseError(hex.to_string()));
        }
        let channel = |s: &str| u8::from_str_radix(s, 16);
        let parsed = match digits.len() {
            3 => {
                let r = channel(&digits[0..1]).map(|v| v * 17);
                let g = channel(&digits[1..2]).map(|v| v * 17);
                let b = channel(&digits[2..3]).map(|v| v * 17);
                r.and_then(|r| g.and_then(|g| b.map(|b| Self::new(r, g, b, 255))))
            }
            6 => channel(&digits[0..2]).and_then(|r| {
                channel(&digits[2..4]).and_then(|g| {
                    channel(&digits[4..6]).map(|b| Self::new(r, g, b, 255))
                })
            }),
            8 => channel(&digits[0..2]).and_then(|r| {
                channel(&digits[2..4]).and_then(|g| {
                    channel(&digits[4..6])
                        .and_then(|b| channel(&digits[6..8]).map(|a| Self::new(r, g, b, a)))
                })
            }),
            _ => return Err(ColorParseError(hex.to_string())),
        };
        parsed.map_err(|_| ColorParseError(hex.to_string()))
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// A positioned element on a page: either text or an image.
///
/// Both variants carry position (canvas-space, page top-left origin),
/// rotation in degrees (unconstrained; interpreted modulo 360 when drawn),
/// opacity in [0, 1] and an integer stacking key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    Text(TextItem),
    Image(ImageItem),
}

impl Item {
    pub fn id(&self) -> ItemId {
        match self {
            Item::Text(t) => t.id,
            Item::Image(i) => i.id,
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Item::Text(t) => t.position,
            Item::Image(i) => i.position,
        }
    }

    pub fn set_position(&mut self, position: Point) {
        match self {
            Item::Text(t) => t.position = position,
            Item::Image(i) => i.position = position,
        }
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        match self {
            Item::Text(t) => t.rotation,
            Item::Image(i) => i.rotation,
        }
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        match self {
            Item::Text(t) => t.rotation = degrees,
            Item::Image(i) => i.rotation = degrees,
        }
    }

    pub fn opacity(&self) -> f64 {
        match self {
            Item::Text(t) => t.opacity,
            Item::Image(i) => i.opacity,
        }
    }

    pub fn z_index(&self) -> i32 {
        match self {
            Item::Text(t) => t.z_index,
            Item::Image(i) => i.z_index,
        }
    }

    pub fn set_z_index(&mut self, z: i32) {
        match self {
            Item::Text(t) => t.z_index = z,
            Item::Image(i) => i.z_index = z,
        }
    }

    /// Axis-aligned extent used for drag clamping and hit testing.
    ///
    /// Rotation is deliberately not accounted for, matching the on-screen
    /// clamping behavior (a rotated item may overflow the page visually).
    pub fn extent(&self) -> Size {
        match self {
            Item::Text(t) => t.extent(),
            Item::Image(i) => Size::new(i.width, i.height),
        }
    }

    /// Axis-aligned bounding box (position + extent, rotation ignored).
    pub fn bounds(&self) -> Rect {
        let pos = self.position();
        let size = self.extent();
        Rect::new(pos.x, pos.y, pos.x + size.width, pos.y + size.height)
    }

    /// Visual center the item rotates about.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Item::Text(_))
    }

    pub fn as_text(&self) -> Option<&TextItem> {
        match self {
            Item::Text(t) => Some(t),
            Item::Image(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextItem> {
        match self {
            Item::Text(t) => Some(t),
            Item::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageItem> {
        match self {
            Item::Text(_) => None,
            Item::Image(i) => Some(i),
        }
    }

    /// Merge a partial patch into this item.
    ///
    /// Only the provided fields change; fields that do not apply to the
    /// variant (e.g. `content` on an image) are ignored. Numeric inputs are
    /// clamped to safe ranges rather than rejected, so repeated application
    /// of the same patch is idempotent.
    pub fn apply_patch(&mut self, patch: &ItemPatch) {
        if patch.x.is_some() || patch.y.is_some() {
            let mut pos = self.position();
            if let Some(x) = patch.x {
                pos.x = x;
            }
            if let Some(y) = patch.y {
                pos.y = y;
            }
            self.set_position(pos);
        }
        if let Some(rotation) = patch.rotation {
            self.set_rotation(rotation);
        }
        if let Some(z) = patch.z_index {
            self.set_z_index(z);
        }
        match self {
            Item::Text(t) => {
                if let Some(opacity) = patch.opacity {
                    t.opacity = opacity.clamp(0.0, 1.0);
                }
                if let Some(content) = &patch.content {
                    if *content != t.content {
                        t.content = content.clone();
                        t.clear_measured_size();
                    }
                }
                if let Some(family) = patch.font_family {
                    if family != t.font_family {
                        t.font_family = family;
                        t.clear_measured_size();
                    }
                }
                if let Some(size) = patch.font_size {
                    let size = size.max(1.0);
                    if size != t.font_size {
                        t.font_size = size;
                        t.clear_measured_size();
                    }
                }
                if let Some(color) = patch.color {
                    t.color = color;
                }
                if let Some(editing) = patch.is_editing {
                    t.is_editing = editing;
                }
            }
            Item::Image(i) => {
                if let Some(opacity) = patch.opacity {
                    i.opacity = opacity.clamp(0.0, 1.0);
                }
                if let Some(width) = patch.width {
                    i.width = width.max(MIN_ITEM_WIDTH);
                }
                if let Some(height) = patch.height {
                    i.height = height.max(MIN_ITEM_HEIGHT);
                }
            }
        }
    }
}

/// Partial update for an item; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub z_index: Option<i32>,
    // Text fields
    pub content: Option<String>,
    pub font_family: Option<FontFamily>,
    pub font_size: Option<f64>,
    pub color: Option<Color>,
    pub is_editing: Option<bool>,
    // Image fields
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl ItemPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn opacity(opacity: f64) -> Self {
        Self {
            opacity: Some(opacity),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_colors() {
        assert_eq!(Color::from_hex("#000000").unwrap(), Color::black());
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::white());
        let c = Color::from_hex("#33cc9980").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (0x33, 0xcc, 0x99, 0x80));
        assert!(Color::from_hex("333333").is_err());
        assert!(Color::from_hex("#33").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn patch_merges_only_provided_fields() {
        let mut item = Item::Text(TextItem::new(Point::new(10.0, 20.0), "hello".into()));
        item.apply_patch(&ItemPatch {
            x: Some(50.0),
            ..ItemPatch::default()
        });
        assert_eq!(item.position(), Point::new(50.0, 20.0));
        assert_eq!(item.as_text().unwrap().content, "hello");
    }

    #[test]
    fn patch_is_idempotent() {
        let mut item = Item::Image(ImageItem::new(
            ImageRef::Named("ic1".into()),
            Point::ZERO,
            100.0,
            80.0,
        ));
        let patch = ItemPatch {
            width: Some(10.0),
            opacity: Some(1.5),
            rotation: Some(45.0),
            ..ItemPatch::default()
        };
        item.apply_patch(&patch);
        let once = serde_json::to_string(&item).unwrap();
        item.apply_patch(&patch);
        let twice = serde_json::to_string(&item).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn patch_clamps_numeric_input() {
        let mut item = Item::Image(ImageItem::new(
            ImageRef::Named("ic1".into()),
            Point::ZERO,
            100.0,
            80.0,
        ));
        item.apply_patch(&ItemPatch {
            width: Some(10.0),
            height: Some(-3.0),
            opacity: Some(2.0),
            ..ItemPatch::default()
        });
        let img = item.as_image().unwrap();
        assert_eq!(img.width, MIN_ITEM_WIDTH);
        assert_eq!(img.height, MIN_ITEM_HEIGHT);
        assert_eq!(img.opacity, 1.0);
    }

    #[test]
    fn text_fields_ignored_on_images() {
        let mut item = Item::Image(ImageItem::new(
            ImageRef::Named("ic1".into()),
            Point::ZERO,
            100.0,
            80.0,
        ));
        item.apply_patch(&ItemPatch {
            content: Some("ignored".into()),
            font_size: Some(40.0),
            ..ItemPatch::default()
        });
        assert!(item.as_text().is_none());
        assert_eq!(item.as_image().unwrap().width, 100.0);
    }

    #[test]
    fn item_serde_roundtrip() {
        let item = Item::Text(TextItem::new(Point::new(1.0, 2.0), "a\nb".into()));
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), item.id());
        assert_eq!(back.as_text().unwrap().content, "a\nb");
    }
}
