//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` crate (JPEG, PNG, GIF in; PNG out) |
//! | **Resize** | `imageops::resize` with Lanczos3 |
//! | **Bezel** | ring outlines + `imageops::blur` |
//! | **Composite** | rounded straight alpha-over ([`operations::alpha_over`]) |
//! | **Dominant color** | 5-bit popularity quantizer |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for placement and sizing math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Bezel / Color**: Pixel-level generators
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Resizing and compositing

pub mod backend;
pub mod bezel;
mod calculations;
pub mod color;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use bezel::{render_bezel, ring_color};
pub use calculations::{clamp_placement, logo_dimensions};
pub use operations::{PlacedLayer, compose_layer, composite, resize_exact};
pub use params::{BEZEL_BLUR_SIGMA, BezelSpec, CompressionLevel};
pub use rust_backend::{RustBackend, SUPPORTED_EXTENSIONS, is_supported_image};
