//! Image asset resolution.

use std::collections::HashMap;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use cardink_core::ImageRef;
use image::RgbaImage;

use crate::error::AssetError;

/// Resolves an [`ImageRef`] to decoded RGBA pixels.
///
/// Implementations decide where `Named` and `Path` references come from;
/// data URLs decode the same way everywhere.
pub trait AssetResolver {
    fn resolve(&self, image: &ImageRef) -> Result<RgbaImage, AssetError>;
}

/// Decode a `data:<mime>;base64,<payload>` URL. The declared mime type is
/// ignored; the actual format is sniffed from the decoded bytes.
pub fn decode_data_url(url: &str) -> Result<RgbaImage, AssetError> {
    let rest = url.strip_prefix("data:").ok_or(AssetError::InvalidDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(AssetError::InvalidDataUrl)?;
    if !meta.ends_with(";base64") {
        return Err(AssetError::InvalidDataUrl);
    }
    let bytes = BASE64.decode(payload.trim())?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

/// In-memory resolver: named assets from a map, data URLs decoded inline.
/// Filesystem paths are refused. Used for bundled catalogs and tests.
#[derive(Debug, Default)]
pub struct MemoryAssets {
    named: HashMap<String, RgbaImage>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, pixels: RgbaImage) {
        self.named.insert(name.into(), pixels);
    }
}

impl AssetResolver for MemoryAssets {
    fn resolve(&self, image: &ImageRef) -> Result<RgbaImage, AssetError> {
        match image {
            ImageRef::DataUrl(url) => decode_data_url(url),
            ImageRef::Named(name) => self
                .named
                .get(name)
                .cloned()
                .ok_or_else(|| AssetError::NotFound(name.clone())),
            ImageRef::Path(path) => Err(AssetError::NotFound(path.clone())),
        }
    }
}

/// Filesystem resolver rooted at an asset directory. `Named` references are
/// looked up under the root, trying the decodable extensions; `Path`
/// references load as given.
#[derive(Debug)]
pub struct FsAssets {
    root: PathBuf,
}

impl FsAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn load(&self, path: &std::path::Path) -> Result<RgbaImage, AssetError> {
        let bytes = std::fs::read(path)?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}

impl AssetResolver for FsAssets {
    fn resolve(&self, image: &ImageRef) -> Result<RgbaImage, AssetError> {
        match image {
            ImageRef::DataUrl(url) => decode_data_url(url),
            ImageRef::Path(path) => self.load(std::path::Path::new(path)),
            ImageRef::Named(name) => {
                for ext in ["png", "jpg", "jpeg", "webp"] {
                    let candidate = self.root.join(format!("{name}.{ext}"));
                    if candidate.is_file() {
                        return self.load(&candidate);
                    }
                }
                Err(AssetError::NotFound(name.clone()))
            }
        }
    }
}
