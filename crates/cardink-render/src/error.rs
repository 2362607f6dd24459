//! Render error types.

use thiserror::Error;

/// Failure to resolve an image reference to pixels.
///
/// Always recoverable at the page level: the renderer logs it and falls back
/// to a flat fill (backgrounds) or skips the item.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("no asset registered for {0:?}")]
    NotFound(String),
    #[error("malformed data URL")]
    InvalidDataUrl,
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("asset read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure producing the export archive. Unlike asset errors these abort the
/// export; no partial archive is returned.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("document has no pages")]
    EmptyDocument,
    #[error("PNG encoding failed for page {page}: {source}")]
    PngEncode {
        page: String,
        #[source]
        source: image::ImageError,
    },
    #[error("archive write failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
