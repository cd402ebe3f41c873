//! # Mixmaker
//!
//! A batch compositor for promotional thumbnail artwork. For every asset
//! name it finds, it stacks up to four images onto a fixed-size transparent
//! canvas and writes the result as a PNG:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ template (topmost)                       │
//! │   ┌───────┐                              │
//! │   │ thumb │       ╭──────────────────╮   │
//! │   └───────┘       │ ┌──────────────┐ │   │
//! │                   │ │  screenshot  │ │   │  bezel tinted with the
//! │   [ logo ]        │ └──────────────┘ │   │  screenshot's dominant color
//! │                   ╰──────────────────╯   │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Pipeline
//!
//! ```text
//! assets/{thumb,screenshot,logo}/  →  base names (sorted union)
//!        per base name:  decode → transform per role → clamp → composite → PNG
//! ```
//!
//! Items are independent of each other and run on a rayon pool. Per-item
//! problems never abort the batch: a missing source drops its layer with a
//! warning, a broken one fails the item, and both end up in the
//! [`process::BatchReport`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Typed `<name>.toml` run configuration: loading, validation, stock file |
//! | [`types`] | [`types::LayerRole`] (in composite order) and [`types::Placement`] |
//! | [`scan`] | Asset discovery: extension filtering, base names, per-role lookup |
//! | [`imaging`] | Pixel work: clamping, logo sizing, bezel, dominant color, compositing, codecs |
//! | [`process`] | Layer placement and the batch driver with per-item reports |
//! | [`output`] | CLI output formatting and in-order progress printing |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Fixed Z-Order
//!
//! Layers always paint Screenshot, Logo, Thumb, Template, bottom to top. The
//! template is the topmost layer: it is a frame with transparent windows, not
//! a background. The order lives in [`types::LayerRole::COMPOSITE_ORDER`] and
//! in the derived `Ord` of the enum, never in the configuration.
//!
//! ## Clamp, Don't Reject
//!
//! Positions that would push a layer off the canvas are pulled back in
//! rather than reported. A layer larger than the canvas ends up at a
//! negative offset and is cropped by the compositor.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling, blurring and PNG encoding all use the `image`
//! crate. No system libraries, no external tools.

pub mod config;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
