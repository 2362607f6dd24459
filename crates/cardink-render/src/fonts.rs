//! Font registry and text measurement.

use std::collections::HashMap;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use cardink_core::items::{FontFamily, LINE_HEIGHT_FACTOR};
use kurbo::Size;
use log::warn;

/// Registered fonts keyed by family, with an optional fallback.
///
/// The store is fail-soft: a family with no registered font and no fallback
/// measures as `None` and renders as a skipped item, never an error. The
/// page still exports.
#[derive(Debug, Clone, Default)]
pub struct FontStore {
    fonts: HashMap<FontFamily, FontArc>,
    fallback: Option<FontArc>,
}

impl FontStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(fallback: FontArc) -> Self {
        Self {
            fonts: HashMap::new(),
            fallback: Some(fallback),
        }
    }

    pub fn register(&mut self, family: FontFamily, font: FontArc) {
        self.fonts.insert(family, font);
    }

    pub fn set_fallback(&mut self, font: FontArc) {
        self.fallback = Some(font);
    }

    /// The font for a family, falling back if none is registered.
    pub fn get(&self, family: FontFamily) -> Option<&FontArc> {
        match self.fonts.get(&family) {
            Some(font) => Some(font),
            None => {
                if self.fallback.is_none() {
                    warn!("no font registered for {:?} and no fallback", family);
                }
                self.fallback.as_ref()
            }
        }
    }

    /// Advance width of a single line at the given size, with kerning.
    pub fn line_width(font: &FontArc, line: &str, font_size: f64) -> f64 {
        let scaled = font.as_scaled(PxScale::from(font_size as f32));
        let mut width = 0.0f32;
        let mut prev = None;
        for ch in line.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        f64::from(width)
    }

    /// Measure a text block: width is the widest line's advance, height is
    /// `lines x 1.2 x size` (the editor's line-height contract, not the
    /// font's own metrics). `None` when no font is available.
    pub fn measure(&self, family: FontFamily, content: &str, font_size: f64) -> Option<Size> {
        let font = self.get(family)?;
        let width = content
            .split('\n')
            .map(|line| Self::line_width(font, line, font_size))
            .fold(0.0f64, f64::max);
        let lines = content.split('\n').count();
        Some(Size::new(width, lines as f64 * LINE_HEIGHT_FACTOR * font_size))
    }
}
