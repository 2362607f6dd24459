//! Text items.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Color, ItemId, BASE_Z_INDEX};

/// Nominal box assumed for a text item before any real measurement exists.
pub const NOMINAL_TEXT_WIDTH: f64 = 100.0;
pub const NOMINAL_TEXT_HEIGHT: f64 = 30.0;

/// Line height multiplier applied to the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// The font families the editor offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Arial,
    TimesNewRoman,
    Verdana,
    CourierNew,
    Garamond,
    Roboto,
    OpenSans,
    Lato,
    Montserrat,
    Oswald,
}

impl FontFamily {
    pub const ALL: [FontFamily; 10] = [
        FontFamily::Arial,
        FontFamily::TimesNewRoman,
        FontFamily::Verdana,
        FontFamily::CourierNew,
        FontFamily::Garamond,
        FontFamily::Roboto,
        FontFamily::OpenSans,
        FontFamily::Lato,
        FontFamily::Montserrat,
        FontFamily::Oswald,
    ];

    /// Display name as shown in a font picker.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::Verdana => "Verdana",
            FontFamily::CourierNew => "Courier New",
            FontFamily::Garamond => "Garamond",
            FontFamily::Roboto => "Roboto",
            FontFamily::OpenSans => "Open Sans",
            FontFamily::Lato => "Lato",
            FontFamily::Montserrat => "Montserrat",
            FontFamily::Oswald => "Oswald",
        }
    }
}

/// A block of styled text positioned on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextItem {
    pub id: ItemId,
    pub position: Point,
    pub content: String,
    pub font_family: FontFamily,
    /// Point size; always positive.
    pub font_size: f64,
    pub color: Color,
    /// Degrees, unconstrained.
    pub rotation: f64,
    pub opacity: f64,
    pub z_index: i32,
    /// Whether the item is in inline-editing mode. At most one text item per
    /// page holds this flag; `Document::select_item` maintains that.
    pub is_editing: bool,
    /// Measured extent cache filled in by whoever has a font at hand.
    /// Derived data: never serialized, invalidated when content, family or
    /// size change.
    #[serde(skip)]
    measured: Option<Size>,
}

impl TextItem {
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_family: FontFamily::default(),
            font_size: 24.0,
            color: Color::new(0x33, 0x33, 0x33, 0xff),
            rotation: 0.0,
            opacity: 1.0,
            z_index: BASE_Z_INDEX,
            is_editing: false,
            measured: None,
        }
    }

    /// Extent used for clamping and hit testing: the measured size when one
    /// has been recorded, otherwise the nominal 100x30 box.
    pub fn extent(&self) -> Size {
        self.measured
            .unwrap_or(Size::new(NOMINAL_TEXT_WIDTH, NOMINAL_TEXT_HEIGHT))
    }

    pub fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT_FACTOR
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    pub fn set_measured_size(&mut self, size: Size) {
        self.measured = Some(size);
    }

    pub fn clear_measured_size(&mut self) {
        self.measured = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_extent_until_measured() {
        let mut item = TextItem::new(Point::ZERO, "hi".into());
        assert_eq!(item.extent(), Size::new(100.0, 30.0));
        item.set_measured_size(Size::new(42.0, 28.8));
        assert_eq!(item.extent(), Size::new(42.0, 28.8));
        item.clear_measured_size();
        assert_eq!(item.extent(), Size::new(100.0, 30.0));
    }

    #[test]
    fn measured_size_is_not_serialized() {
        let mut item = TextItem::new(Point::ZERO, "hi".into());
        item.set_measured_size(Size::new(42.0, 28.8));
        let json = serde_json::to_string(&item).unwrap();
        let back: TextItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.extent(), Size::new(100.0, 30.0));
    }

    #[test]
    fn multi_line_split() {
        let item = TextItem::new(Point::ZERO, "a\nb\nc".into());
        assert_eq!(item.line_count(), 3);
        assert_eq!(item.lines().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }
}
