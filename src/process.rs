//! Per-item layer pipeline and the batch driver.
//!
//! For every discovered base name the driver builds an [`Item`] (decoded
//! sources per enabled role), turns each source into a placed layer, hands
//! the layers to the compositor and encodes the canvas as
//! `<output_folder>/<base_name>.png`.
//!
//! ## Per-Role Transforms
//!
//! ```text
//! screenshot  normalize (optional) → dominant color → resize → bezel → clamp
//! logo        scale to canvas width (or keep native inside safe box) → clamp
//! thumb       resize → clamp
//! template    resize → clamp, or pinned at (0, 0) with anchor = "origin"
//! ```
//!
//! ## Failure Model
//!
//! Nothing that goes wrong with a single item aborts the batch:
//!
//! - A missing source drops that layer and records a [`LayerWarning`].
//! - A decode, resize, color or encode failure fails the item with an
//!   [`ItemError`]; the remaining items still run.
//!
//! Only an unusable asset tree or output folder is a [`ProcessError`].
//!
//! ## Parallel Processing
//!
//! Items are processed in parallel using [rayon](https://docs.rs/rayon).
//! Each worker owns its item, layers and canvas; the backend and resolver
//! are shared read-only. The report keeps sorted base-name order.

use crate::config::{MixConfig, TemplateAnchor};
use crate::imaging::{
    BezelSpec, CompressionLevel, ImageBackend, PlacedLayer, RustBackend, clamp_placement,
    composite, logo_dimensions, render_bezel, resize_exact,
};
use crate::scan::{AssetResolver, DirectoryResolver, discover_items, role_enabled};
use crate::types::{LayerRole, Placement};
use image::RgbaImage;
use rayon::prelude::*;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, debug_span, error, info, warn};

/// Run-level failure: the batch could not be enumerated or has nowhere to go.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single item produced no output.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemError {
    #[error("failed to decode {role} source: {message}")]
    Decode { role: LayerRole, message: String },
    #[error("cannot resize {role} layer to {width}x{height}")]
    Resize {
        role: LayerRole,
        width: u32,
        height: u32,
    },
    #[error("cannot resize canvas to {width}x{height}")]
    FinalResize { width: u32, height: u32 },
    #[error("dominant color extraction failed: {message}")]
    Color { message: String },
    #[error("failed to write output: {message}")]
    Encode { message: String },
}

impl ItemError {
    /// The layer role the failure belongs to, if any.
    pub fn role(&self) -> Option<LayerRole> {
        match self {
            ItemError::Decode { role, .. } | ItemError::Resize { role, .. } => Some(*role),
            ItemError::Color { .. } => Some(LayerRole::Screenshot),
            ItemError::FinalResize { .. } | ItemError::Encode { .. } => None,
        }
    }
}

/// A layer that was left out of an item that still got rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerWarning {
    /// The role is enabled but has no source for this item.
    MissingSource { role: LayerRole },
    /// The thumb is missing and `template.always_on` is off.
    TemplateSuppressed,
}

impl fmt::Display for LayerWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerWarning::MissingSource { role } => write!(f, "no {role} source"),
            LayerWarning::TemplateSuppressed => {
                f.write_str("template dropped because the thumb is missing")
            }
        }
    }
}

/// One base name and its decoded sources, keyed (and so ordered) by role.
#[derive(Debug, Clone)]
pub struct Item {
    pub base_name: String,
    pub sources: BTreeMap<LayerRole, RgbaImage>,
}

/// Role, clamped position and final size of a composited layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    pub role: LayerRole,
    pub placement: Placement,
    pub width: u32,
    pub height: u32,
}

impl From<&PlacedLayer> for LayerSummary {
    fn from(layer: &PlacedLayer) -> Self {
        Self {
            role: layer.role,
            placement: layer.placement,
            width: layer.image.width(),
            height: layer.image.height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Written { path: PathBuf },
    /// Output already existed and `skip_existing` is on.
    Skipped { path: PathBuf },
    Failed { error: ItemError },
}

/// Result of one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    pub base_name: String,
    pub outcome: ItemOutcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<LayerWarning>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<LayerSummary>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub warnings: usize,
}

/// Result of a whole run, items in sorted base-name order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    pub fn from_items(items: Vec<ItemReport>) -> Self {
        let mut summary = BatchSummary::default();
        for item in &items {
            match item.outcome {
                ItemOutcome::Written { .. } => summary.written += 1,
                ItemOutcome::Skipped { .. } => summary.skipped += 1,
                ItemOutcome::Failed { .. } => summary.failed += 1,
            }
            summary.warnings += item.warnings.len();
        }
        Self { summary, items }
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ItemError)> {
        self.items.iter().filter_map(|item| match &item.outcome {
            ItemOutcome::Failed { error } => Some((item.base_name.as_str(), error)),
            _ => None,
        })
    }
}

/// Progress events sent while a batch runs.
///
/// `ItemFinished` arrives in completion order, which under the worker pool
/// is not the report order; `index` (1-based) restores it.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    BatchStarted {
        item_count: usize,
        output_folder: PathBuf,
        skip_existing: bool,
    },
    ItemFinished {
        index: usize,
        report: ItemReport,
    },
}

/// Output file of `base_name`.
pub fn output_path(config: &MixConfig, base_name: &str) -> PathBuf {
    config
        .general
        .output_folder
        .join(format!("{base_name}.png"))
}

fn size_tuple([w, h]: [u32; 2]) -> (u32, u32) {
    (w, h)
}

// =============================================================================
// Item construction
// =============================================================================

/// Resolve and decode the sources of `base_name` for every enabled role.
///
/// Missing sources become warnings; the template is looked up under the
/// configured `template.image` name and dropped without loading when the
/// item has no thumb (missing, or the role is disabled) and
/// `template.always_on` is off.
pub fn build_item(
    backend: &impl ImageBackend,
    resolver: &impl AssetResolver,
    config: &MixConfig,
    base_name: &str,
) -> Result<(Item, Vec<LayerWarning>), ItemError> {
    let mut sources = BTreeMap::new();
    let mut warnings = Vec::new();

    for role in LayerRole::COMPOSITE_ORDER {
        if !role_enabled(config, role) {
            continue;
        }

        let source_name = match role {
            LayerRole::Template => {
                let thumb_missing = !sources.contains_key(&LayerRole::Thumb);
                if thumb_missing && !config.template.always_on {
                    warn!(base_name, "thumb missing, template suppressed");
                    warnings.push(LayerWarning::TemplateSuppressed);
                    continue;
                }
                config.template.image.as_str()
            }
            _ => base_name,
        };

        let Some(path) = resolver.find(role, source_name) else {
            warn!(base_name, role = %role, "layer source missing");
            warnings.push(LayerWarning::MissingSource { role });
            continue;
        };

        let image = backend.load(&path).map_err(|e| ItemError::Decode {
            role,
            message: e.to_string(),
        })?;
        sources.insert(role, image);
    }

    let item = Item {
        base_name: base_name.to_string(),
        sources,
    };
    Ok((item, warnings))
}

// =============================================================================
// Layer placement
// =============================================================================

/// Transform every source of `item` into a placed layer, in composite order.
pub fn place_layers(
    backend: &impl ImageBackend,
    config: &MixConfig,
    item: &Item,
) -> Result<Vec<PlacedLayer>, ItemError> {
    let canvas = size_tuple(config.general.canvas_size);
    let mut layers = Vec::with_capacity(item.sources.len());

    for (&role, source) in &item.sources {
        let (image, position) = match role {
            LayerRole::Screenshot => (
                prepare_screenshot(backend, config, source)?,
                config.screenshot.position,
            ),
            LayerRole::Logo => {
                let target = logo_dimensions(
                    source.dimensions(),
                    canvas,
                    config.logo.scale,
                    config.logo.safe_box.map(size_tuple),
                );
                (resize_role(source, role, target)?, config.logo.position)
            }
            LayerRole::Thumb => (
                resize_role(source, role, size_tuple(config.thumb.size))?,
                config.thumb.position,
            ),
            LayerRole::Template => (
                resize_role(source, role, size_tuple(config.template.size))?,
                config.template.position,
            ),
        };

        let placement = match (role, config.template.anchor) {
            (LayerRole::Template, TemplateAnchor::Origin) => Placement::new(0, 0),
            _ => clamp_placement(position.into(), image.dimensions(), canvas),
        };
        debug!(
            base_name = %item.base_name,
            role = %role,
            %placement,
            width = image.width(),
            height = image.height(),
            "layer placed"
        );

        layers.push(PlacedLayer {
            role,
            image,
            placement,
        });
    }

    Ok(layers)
}

fn resize_role(
    source: &RgbaImage,
    role: LayerRole,
    (width, height): (u32, u32),
) -> Result<RgbaImage, ItemError> {
    resize_exact(source, (width, height)).ok_or(ItemError::Resize {
        role,
        width,
        height,
    })
}

/// Normalize, sample the bezel color, resize and wrap in the bezel.
fn prepare_screenshot(
    backend: &impl ImageBackend,
    config: &MixConfig,
    source: &RgbaImage,
) -> Result<RgbaImage, ItemError> {
    let settings = &config.screenshot;
    let normalized = match settings.normalize_size {
        Some(size) => Cow::Owned(resize_role(source, LayerRole::Screenshot, size_tuple(size))?),
        None => Cow::Borrowed(source),
    };

    let color = backend
        .dominant_color(&normalized, settings.color_quality)
        .map_err(|e| ItemError::Color {
            message: e.to_string(),
        })?;
    debug!(?color, "bezel color");

    let resized = resize_role(&normalized, LayerRole::Screenshot, size_tuple(settings.size))?;
    let spec = BezelSpec {
        border: settings.bezel_size,
        corner_radius: settings.corner_radius,
        color,
    };
    Ok(render_bezel(&resized, &spec))
}

/// Place and composite every layer of `item`.
pub fn render_item(
    backend: &impl ImageBackend,
    config: &MixConfig,
    item: &Item,
) -> Result<(RgbaImage, Vec<LayerSummary>), ItemError> {
    let layers = place_layers(backend, config, item)?;
    let final_size = config.general.final_size.map(size_tuple);
    let canvas = composite(size_tuple(config.general.canvas_size), &layers, final_size).ok_or(
        ItemError::FinalResize {
            width: final_size.map_or(0, |s| s.0),
            height: final_size.map_or(0, |s| s.1),
        },
    )?;
    Ok((canvas, layers.iter().map(LayerSummary::from).collect()))
}

// =============================================================================
// Batch driver
// =============================================================================

/// Process one base name end to end. Never fails; failures are reported.
pub fn process_item(
    backend: &impl ImageBackend,
    resolver: &impl AssetResolver,
    config: &MixConfig,
    base_name: &str,
) -> ItemReport {
    let _span = debug_span!("item", base_name).entered();
    let path = output_path(config, base_name);
    if config.general.skip_existing && path.exists() {
        debug!(base_name, path = %path.display(), "output exists, skipping");
        return ItemReport {
            base_name: base_name.to_string(),
            outcome: ItemOutcome::Skipped { path },
            warnings: Vec::new(),
            layers: Vec::new(),
        };
    }

    let mut warnings = Vec::new();
    let mut layers = Vec::new();
    let result = build_item(backend, resolver, config, base_name)
        .and_then(|(item, item_warnings)| {
            warnings = item_warnings;
            let (canvas, placed) = render_item(backend, config, &item)?;
            layers = placed;
            Ok(canvas)
        })
        .and_then(|canvas| write_output(backend, config, &canvas, &path));

    let outcome = match result {
        Ok(()) => ItemOutcome::Written { path },
        Err(e) => {
            match e.role() {
                Some(role) => error!(base_name, role = %role, error = %e, "item failed"),
                None => error!(base_name, error = %e, "item failed"),
            }
            ItemOutcome::Failed { error: e }
        }
    };

    ItemReport {
        base_name: base_name.to_string(),
        outcome,
        warnings,
        layers,
    }
}

fn write_output(
    backend: &impl ImageBackend,
    config: &MixConfig,
    canvas: &RgbaImage,
    path: &Path,
) -> Result<(), ItemError> {
    let level = CompressionLevel::new(config.general.compress_level);
    backend
        .save_png(canvas, path, level)
        .map_err(|e| ItemError::Encode {
            message: e.to_string(),
        })
}

/// Run the batch described by `config` against the assets on disk.
pub fn process(
    config: &MixConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    let backend = RustBackend::new();
    let resolver = DirectoryResolver::new(&config.general.assets_folder);
    process_with_backend(&backend, &resolver, config, events)
}

/// Run a batch using a specific backend and resolver (allows testing with mocks).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    resolver: &impl AssetResolver,
    config: &MixConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    let names = discover_items(resolver, config)?;
    std::fs::create_dir_all(&config.general.output_folder)?;

    info!(
        items = names.len(),
        output_folder = %config.general.output_folder.display(),
        "batch started"
    );
    if let Some(tx) = &events {
        tx.send(ProcessEvent::BatchStarted {
            item_count: names.len(),
            output_folder: config.general.output_folder.clone(),
            skip_existing: config.general.skip_existing,
        })
        .ok();
    }

    let items: Vec<ItemReport> = names
        .par_iter()
        .enumerate()
        .map(|(i, base_name)| {
            let report = process_item(backend, resolver, config, base_name);
            if let Some(tx) = &events {
                tx.send(ProcessEvent::ItemFinished {
                    index: i + 1,
                    report: report.clone(),
                })
                .ok();
            }
            report
        })
        .collect();

    let report = BatchReport::from_items(items);
    info!(
        written = report.summary.written,
        skipped = report.summary.skipped,
        failed = report.summary.failed,
        "batch finished"
    );
    Ok(report)
}
