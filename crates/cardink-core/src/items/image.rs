//! Image items and image references.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ItemId, BASE_Z_INDEX};

/// Reference to image pixel data. The core crate never decodes pixels;
/// resolution happens in `cardink-render`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ImageRef {
    /// `data:image/...;base64,...` URL, as produced by uploads.
    DataUrl(String),
    /// Filesystem path.
    Path(String),
    /// Key into a bundled asset catalog.
    Named(String),
}

/// A raster image positioned on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageItem {
    pub id: ItemId,
    pub image: ImageRef,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Degrees, unconstrained.
    pub rotation: f64,
    pub opacity: f64,
    pub z_index: i32,
}

impl ImageItem {
    pub fn new(image: ImageRef, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            position,
            width,
            height,
            rotation: 0.0,
            opacity: 1.0,
            z_index: BASE_Z_INDEX,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}
