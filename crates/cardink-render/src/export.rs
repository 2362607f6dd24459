//! Document export: page rasters bundled into a ZIP of PNGs.

use std::io::{Cursor, Write};
use std::path::Path;

use cardink_core::{Color, Document, Item, Page};
use image::RgbaImage;
use log::warn;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::assets::AssetResolver;
use crate::error::ExportError;
use crate::fonts::FontStore;
use crate::raster;

/// Base fill under everything.
const PAGE_BASE: Color = Color {
    r: 0xff,
    g: 0xff,
    b: 0xff,
    a: 0xff,
};
/// Flat fill when a background image fails to load.
const BACKGROUND_FALLBACK: Color = Color {
    r: 0xe0,
    g: 0xe0,
    b: 0xe0,
    a: 0xff,
};
/// Flat fill when the page has no background reference at all.
const NO_BACKGROUND: Color = Color {
    r: 0xf8,
    g: 0xf8,
    b: 0xf8,
    a: 0xff,
};

/// Renders documents to a ZIP of per-page PNGs.
///
/// Rendering works off [`Document::export_snapshot`], so selection and
/// editing state never appear in the output and the viewport is ignored.
/// Individual asset failures degrade gracefully (fallback fill for
/// backgrounds, skipped items); only PNG encoding or archive writing
/// failures abort the export, and then no partial archive is returned.
pub struct Exporter<A> {
    assets: A,
    fonts: FontStore,
}

impl<A: AssetResolver> Exporter<A> {
    pub fn new(assets: A, fonts: FontStore) -> Self {
        Self { assets, fonts }
    }

    /// Render every page and bundle the PNGs. Pages render in document
    /// order; entry names carry the 1-based page index, so the archive
    /// listing matches the page list.
    pub fn export(&self, doc: &Document) -> Result<ExportBundle, ExportError> {
        let snapshot = doc.export_snapshot();
        if snapshot.pages().is_empty() {
            return Err(ExportError::EmptyDocument);
        }

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (index, page) in snapshot.pages().iter().enumerate() {
            let raster = self.render_page(page);
            let mut png = Vec::new();
            raster
                .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
                .map_err(|source| ExportError::PngEncode {
                    page: page.name.clone(),
                    source,
                })?;
            writer.start_file(entry_name(index, &page.name), options)?;
            writer.write_all(&png)?;
        }

        let data = writer.finish()?.into_inner();
        Ok(ExportBundle {
            data,
            file_name: "invitation_cards.zip".to_string(),
        })
    }

    /// Rasterize one page at its canvas dimensions.
    pub fn render_page(&self, page: &Page) -> RgbaImage {
        let width = page.canvas_width.max(1.0).round() as u32;
        let height = page.canvas_height.max(1.0).round() as u32;
        let mut canvas = RgbaImage::new(width, height);
        raster::fill(&mut canvas, PAGE_BASE);

        match &page.background {
            Some(reference) => match self.assets.resolve(reference) {
                Ok(pixels) => {
                    let scaled = raster::scale_to_fill(&pixels, width, height);
                    raster::composite(
                        &mut canvas,
                        &scaled,
                        0.0,
                        0.0,
                        f64::from(width),
                        f64::from(height),
                        0.0,
                        1.0,
                    );
                }
                Err(err) => {
                    warn!("background for page {:?} failed: {err}", page.name);
                    raster::fill(&mut canvas, BACKGROUND_FALLBACK);
                }
            },
            None => raster::fill(&mut canvas, NO_BACKGROUND),
        }

        for item in page.items_ordered() {
            self.render_item(&mut canvas, item);
        }
        canvas
    }

    fn render_item(&self, canvas: &mut RgbaImage, item: &Item) {
        match item {
            Item::Image(img) => match self.assets.resolve(&img.image) {
                Ok(pixels) => raster::composite(
                    canvas,
                    &pixels,
                    img.position.x,
                    img.position.y,
                    img.width,
                    img.height,
                    img.rotation,
                    img.opacity,
                ),
                Err(err) => warn!("image item {} skipped: {err}", img.id),
            },
            Item::Text(text) => {
                let Some(font) = self.fonts.get(text.font_family) else {
                    warn!("text item {} skipped: no usable font", text.id);
                    return;
                };
                let Some(block) =
                    raster::render_text_block(font, &text.content, text.font_size, text.color)
                else {
                    return;
                };
                raster::composite(
                    canvas,
                    &block,
                    text.position.x,
                    text.position.y,
                    f64::from(block.width()),
                    f64::from(block.height()),
                    text.rotation,
                    text.opacity,
                );
            }
        }
    }
}

/// `page_<1-based index>_<name>.png`, with every character outside
/// `[A-Za-z0-9]` in the name replaced by `_`.
fn entry_name(index: usize, name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("page_{}_{sanitized}.png", index + 1)
}

/// The finished archive.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    data: Vec<u8>,
    file_name: String,
}

impl ExportBundle {
    /// Raw ZIP bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Suggested download/save name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.data)
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
