//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the compositing pipeline
//! and everything that touches encoded bytes or samples colors: decode,
//! encode, and dominant-color extraction.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust on top of
//! the `image` crate. Tests use a recording mock.

use super::params::CompressionLevel;
use image::{Rgb, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image backends.
///
/// Implementations are shared by every worker of a batch, hence `Sync`.
pub trait ImageBackend: Sync {
    /// Decode a file into an RGBA buffer.
    fn load(&self, path: &Path) -> Result<RgbaImage, BackendError>;

    /// Encode `image` as PNG at `path`.
    fn save_png(
        &self,
        image: &RgbaImage,
        path: &Path,
        level: CompressionLevel,
    ) -> Result<(), BackendError>;

    /// Representative color of `image`, sampling every `quality`-th pixel.
    fn dominant_color(&self, image: &RgbaImage, quality: u32) -> Result<Rgb<u8>, BackendError>;
}
