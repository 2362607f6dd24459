//! Cardink Render Library
//!
//! Headless export pipeline for Cardink documents: resolves image assets,
//! rasterizes each page (background, then items in paint order) and bundles
//! the per-page PNGs into a single ZIP archive. Viewport state never affects
//! the output; pages render at their canvas dimensions.

pub mod assets;
pub mod error;
pub mod export;
pub mod fonts;
pub mod raster;

pub use assets::{AssetResolver, FsAssets, MemoryAssets};
pub use error::{AssetError, ExportError};
pub use export::{ExportBundle, Exporter};
pub use fonts::FontStore;
