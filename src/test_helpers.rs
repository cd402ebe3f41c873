//! Shared test utilities for the mixmaker test suite.
//!
//! Provides synthetic images, an on-disk asset tree builder, an in-memory
//! [`AssetResolver`], a small run config, and report lookups.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let config = small_config(tmp.path());
//! let resolver = MemoryResolver::new()
//!     .with(LayerRole::Thumb, "alpha")
//!     .with(LayerRole::Logo, "alpha");
//! let backend = resolver.backend(Some(Rgb([200, 100, 50])));
//!
//! let report = process_with_backend(&backend, &resolver, &config, None).unwrap();
//! let item = find_item(&report, "alpha");
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use image::{Rgb, Rgba, RgbaImage};

use crate::config::{MixConfig, TemplateAnchor};
use crate::imaging::backend::tests::MockBackend;
use crate::process::{BatchReport, ItemReport};
use crate::scan::AssetResolver;
use crate::types::LayerRole;

// =========================================================================
// Synthetic images
// =========================================================================

/// A single-color image.
pub fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Fill color used by [`MemoryResolver::backend`] for each role.
pub fn role_color(role: LayerRole) -> [u8; 4] {
    match role {
        LayerRole::Screenshot => [30, 60, 90, 255],
        LayerRole::Logo => [200, 40, 40, 255],
        LayerRole::Thumb => [40, 200, 40, 255],
        // border of `template_image`
        LayerRole::Template => [250, 250, 250, 255],
    }
}

/// Source size used by [`MemoryResolver::backend`] for each role.
pub fn role_size(role: LayerRole) -> (u32, u32) {
    match role {
        LayerRole::Screenshot => (160, 120),
        LayerRole::Logo => (100, 50),
        LayerRole::Thumb => (64, 64),
        LayerRole::Template => (200, 100),
    }
}

/// Template with an opaque 10px border and a transparent window.
pub fn template_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let border = x < 10 || y < 10 || x >= width - 10 || y >= height - 10;
        if border {
            Rgba(role_color(LayerRole::Template))
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Encode `image` as PNG at `path`, creating parent folders.
pub fn write_png(path: &Path, image: &RgbaImage) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    image.save(path).unwrap();
}

/// Write `<assets>/<role>/<name>.png` and return its path.
pub fn write_asset(assets: &Path, role: LayerRole, name: &str, image: &RgbaImage) -> PathBuf {
    let path = assets.join(role.dir_name()).join(format!("{name}.png"));
    write_png(&path, image);
    path
}

// =========================================================================
// Config
// =========================================================================

/// A 200x100 run writing into `<root>/output`, every role enabled.
///
/// Thumb 40x40 at (150, 50), screenshot 80x60 at (10, 10) with a 4px bezel,
/// logo at 25% scale at (110, 5), template full canvas from `frame`.
pub fn small_config(root: &Path) -> MixConfig {
    let mut config = MixConfig::default();
    config.general.output_folder = root.join("output");
    config.general.assets_folder = root.join("assets");
    config.general.canvas_size = [200, 100];
    config.general.compress_level = 3;
    config.processing.max_processes = Some(2);
    config.thumb.size = [40, 40];
    config.thumb.position = [150, 50];
    config.screenshot.size = [80, 60];
    config.screenshot.position = [10, 10];
    config.screenshot.bezel_size = 4;
    config.screenshot.corner_radius = 2;
    config.logo.position = [110, 5];
    config.logo.scale = 0.25;
    config.template.size = [200, 100];
    config.template.position = [0, 0];
    config.template.image = "frame".to_string();
    config.template.anchor = TemplateAnchor::Position;
    config
}

// =========================================================================
// In-memory asset resolver
// =========================================================================

/// Resolver backed by a map instead of folders.
///
/// Paths are synthetic (`/assets/<role>/<name>.png`); pair it with the
/// [`MockBackend`] from [`MemoryResolver::backend`] to serve pixels.
#[derive(Debug, Default)]
pub struct MemoryResolver {
    entries: BTreeMap<(LayerRole, String), PathBuf>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source for `role` under `name`.
    pub fn with(mut self, role: LayerRole, name: &str) -> Self {
        let path = PathBuf::from(format!("/assets/{}/{name}.png", role.dir_name()));
        self.entries.insert((role, name.to_string()), path);
        self
    }

    pub fn path(&self, role: LayerRole, name: &str) -> PathBuf {
        self.entries
            .get(&(role, name.to_string()))
            .cloned()
            .unwrap_or_else(|| panic!("no {role} source registered for '{name}'"))
    }

    /// Mock backend serving a solid image (template: framed) for every entry.
    pub fn backend(&self, color: Option<Rgb<u8>>) -> MockBackend {
        let mut backend = MockBackend {
            color,
            ..MockBackend::default()
        };
        for ((role, _), path) in &self.entries {
            let (w, h) = role_size(*role);
            let image = match role {
                LayerRole::Template => template_image(w, h),
                _ => solid(w, h, role_color(*role)),
            };
            backend = backend.with_image(path.clone(), image);
        }
        backend
    }
}

impl AssetResolver for MemoryResolver {
    fn find(&self, role: LayerRole, base_name: &str) -> Option<PathBuf> {
        self.entries.get(&(role, base_name.to_string())).cloned()
    }

    fn base_names(&self, role: LayerRole) -> io::Result<Vec<String>> {
        Ok(self
            .entries
            .keys()
            .filter(|(r, _)| *r == role)
            .map(|(_, name)| name.clone())
            .collect())
    }
}

// =========================================================================
// Report lookups: panic with a clear message on miss
// =========================================================================

/// Find an item report by base name. Panics if not found.
pub fn find_item<'a>(report: &'a BatchReport, base_name: &str) -> &'a ItemReport {
    report
        .items
        .iter()
        .find(|i| i.base_name == base_name)
        .unwrap_or_else(|| {
            let names = item_names(report);
            panic!("item '{base_name}' not found. Available: {names:?}")
        })
}

/// All item base names in report order.
pub fn item_names(report: &BatchReport) -> Vec<&str> {
    report.items.iter().map(|i| i.base_name.as_str()).collect()
}
