//! Run configuration module.
//!
//! Handles loading and validating the named `<config_dir>/<name>.toml` file
//! that drives a batch. The file is read once at startup, deserialized into
//! [`MixConfig`] and validated; the pipeline never looks at raw strings
//! afterwards.
//!
//! ## Config File Location
//!
//! ```text
//! config/
//! ├── steam.toml        # mixmaker run steam
//! └── square.toml       # mixmaker run square
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [general]
//! output_folder = "output"     # Where <base_name>.png files are written
//! canvas_size = [1280, 720]    # Canvas width, height
//! compress_level = 6           # PNG compression effort (0-9)
//! assets_folder = "assets"     # Optional, holds thumb/ screenshot/ logo/ template/
//! skip_existing = false        # Optional, skip items whose output exists
//! final_size = [640, 360]      # Optional, resample the finished canvas
//!
//! [processing]
//! max_processes = 4            # Optional, omit for auto = CPU cores
//!
//! [thumb]
//! enabled = true
//! size = [300, 300]
//! position = [40, 40]
//!
//! [screenshot]
//! enabled = true
//! size = [640, 480]
//! position = [500, 120]
//! bezel_size = 12
//! corner_radius = 8            # Optional, default 0
//! normalize_size = [640, 480]  # Optional pre-resize
//! color_quality = 1            # Optional, default 1
//!
//! [logo]
//! enabled = true
//! position = [40, 500]
//! scale = 0.3
//! safe_box = [100, 100]        # Optional
//!
//! [template]
//! enabled = true
//! size = [1280, 720]
//! position = [0, 0]
//! image = "frame"
//! always_on = true             # Optional, default true
//! anchor = "position"          # Optional, "position" or "origin"
//! ```
//!
//! Every section except `[processing]` is required, and so is every key
//! without a default. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration file does not exist: {0}")]
    NotFound(PathBuf),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Width and height in pixels.
pub type Size = [u32; 2];

/// Requested top-left position; may be negative, clamping fixes it up.
pub type Position = [i32; 2];

/// Complete run configuration loaded from a `.toml` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MixConfig {
    /// Output, canvas and encoding settings.
    pub general: GeneralConfig,
    /// Parallel processing settings.
    #[serde(default)]
    pub processing: ProcessingConfig,
    pub thumb: ThumbConfig,
    pub screenshot: ScreenshotConfig,
    pub logo: LogoConfig,
    pub template: TemplateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Folder receiving one `<base_name>.png` per item. Created if missing.
    pub output_folder: PathBuf,
    /// Fixed canvas size for every item.
    pub canvas_size: Size,
    /// zlib level for the PNG output, 0 (stored) to 9 (smallest).
    pub compress_level: u8,
    /// Root holding the per-role asset folders.
    #[serde(default = "default_assets_folder")]
    pub assets_folder: PathBuf,
    /// Leave items alone when their output file already exists.
    #[serde(default)]
    pub skip_existing: bool,
    /// Resample the finished canvas to this size before encoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_size: Option<Size>,
}

fn default_assets_folder() -> PathBuf {
    PathBuf::from("assets")
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of items composited at once.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThumbConfig {
    pub enabled: bool,
    pub size: Size,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreenshotConfig {
    pub enabled: bool,
    /// Screenshot size before the bezel is added around it.
    pub size: Size,
    pub position: Position,
    /// Bezel border thickness in pixels.
    pub bezel_size: u32,
    #[serde(default)]
    pub corner_radius: u32,
    /// Pre-resize applied before `size`; the bezel color is sampled after it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalize_size: Option<Size>,
    /// Dominant-color sampling step: 1 looks at every pixel.
    #[serde(default = "default_color_quality")]
    pub color_quality: u32,
}

fn default_color_quality() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogoConfig {
    pub enabled: bool,
    pub position: Position,
    /// Logo width as a fraction of the canvas width.
    pub scale: f64,
    /// Logos strictly smaller than this box on both axes keep their native size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_box: Option<Size>,
}

/// Where the template layer is anchored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateAnchor {
    /// Configured `position`, clamped to the canvas like every other layer.
    #[default]
    Position,
    /// Fixed `(0, 0)`, not clamped.
    Origin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    pub enabled: bool,
    pub size: Size,
    pub position: Position,
    /// Base name of the template image, shared by every item.
    pub image: String,
    /// Composite the template even when the item's thumb is missing.
    #[serde(default = "default_always_on")]
    pub always_on: bool,
    #[serde(default)]
    pub anchor: TemplateAnchor,
}

fn default_always_on() -> bool {
    true
}

impl MixConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_size("general.canvas_size", self.general.canvas_size)?;
        if self.general.compress_level > 9 {
            return Err(ConfigError::Validation(
                "general.compress_level must be 0-9".into(),
            ));
        }
        if let Some(size) = self.general.final_size {
            check_size("general.final_size", size)?;
        }
        check_size("thumb.size", self.thumb.size)?;
        check_size("screenshot.size", self.screenshot.size)?;
        if let Some(size) = self.screenshot.normalize_size {
            check_size("screenshot.normalize_size", size)?;
        }
        if self.screenshot.color_quality == 0 {
            return Err(ConfigError::Validation(
                "screenshot.color_quality must be at least 1".into(),
            ));
        }
        if !self.logo.scale.is_finite() || self.logo.scale <= 0.0 {
            return Err(ConfigError::Validation(
                "logo.scale must be a positive number".into(),
            ));
        }
        check_size("template.size", self.template.size)?;
        if self.template.enabled && self.template.image.trim().is_empty() {
            return Err(ConfigError::Validation(
                "template.image must name a file when the template is enabled".into(),
            ));
        }
        Ok(())
    }
}

fn check_size(key: &str, [w, h]: Size) -> Result<(), ConfigError> {
    if w == 0 || h == 0 {
        return Err(ConfigError::Validation(format!(
            "{key} values must be non-zero"
        )));
    }
    Ok(())
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig {
                output_folder: PathBuf::from("output"),
                canvas_size: [1280, 720],
                compress_level: 6,
                assets_folder: default_assets_folder(),
                skip_existing: false,
                final_size: None,
            },
            processing: ProcessingConfig::default(),
            thumb: ThumbConfig {
                enabled: true,
                size: [300, 300],
                position: [40, 40],
            },
            screenshot: ScreenshotConfig {
                enabled: true,
                size: [640, 480],
                position: [560, 120],
                bezel_size: 12,
                corner_radius: 8,
                normalize_size: None,
                color_quality: default_color_quality(),
            },
            logo: LogoConfig {
                enabled: true,
                position: [40, 520],
                scale: 0.3,
                safe_box: None,
            },
            template: TemplateConfig {
                enabled: true,
                size: [1280, 720],
                position: [0, 0],
                image: "template".to_string(),
                always_on: default_always_on(),
                anchor: TemplateAnchor::Position,
            },
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Path of the named config inside `config_dir` (`<config_dir>/<name>.toml`).
pub fn config_path(config_dir: &Path, name: &str) -> PathBuf {
    config_dir.join(format!("{name}.toml"))
}

/// Parse and validate config from TOML text.
pub fn parse_config(content: &str) -> Result<MixConfig, ConfigError> {
    let config: MixConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a config file.
pub fn load_config_file(path: &Path) -> Result<MixConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load `<config_dir>/<name>.toml`.
pub fn load_config(config_dir: &Path, name: &str) -> Result<MixConfig, ConfigError> {
    load_config_file(&config_path(config_dir, name))
}

/// Returns a fully-commented stock config with every key explained.
///
/// Used by the `gen-config` CLI command. Parses to [`MixConfig::default`].
pub fn stock_config_toml() -> &'static str {
    r##"# mixmaker configuration
# ======================
# Save as config/<name>.toml and run `mixmaker run <name>`.
# Keys marked (optional) may be removed; every other key is required.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[general]
# Folder receiving one <base_name>.png per item. Created if missing.
output_folder = "output"

# Canvas [width, height] every item is composited onto.
canvas_size = [1280, 720]

# zlib level for the PNG output: 0 = stored, 9 = smallest file.
compress_level = 6

# (optional) Folder holding thumb/, screenshot/, logo/ and template/.
assets_folder = "assets"

# (optional) Skip items whose output file already exists.
skip_existing = false

# (optional) Resample the finished canvas to [width, height].
# final_size = [640, 360]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# (optional) Maximum items composited in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Layers, listed bottom to top: screenshot, logo, thumb, template.
# Positions are [x, y] of the top-left corner and are clamped so each
# layer stays on the canvas.
# ---------------------------------------------------------------------------
[screenshot]
enabled = true
# Screenshot size before the bezel is added around it.
size = [640, 480]
position = [560, 120]
# Bezel thickness in pixels; the bezel is tinted with the screenshot's
# dominant color and fades out towards the screenshot.
bezel_size = 12
# (optional) Bezel corner radius in pixels.
corner_radius = 8
# (optional) Pre-resize to [width, height] before `size`; the bezel color is
# sampled from the pre-resized image.
# normalize_size = [640, 480]
# (optional) Dominant color sampling step, 1 = every pixel.
color_quality = 1

[logo]
enabled = true
position = [40, 520]
# Logo width as a fraction of the canvas width. The height follows the
# logo's aspect ratio and is capped at the canvas height.
scale = 0.3
# (optional) Logos strictly smaller than [width, height] keep their size.
# safe_box = [100, 100]

[thumb]
enabled = true
size = [300, 300]
position = [40, 40]

[template]
enabled = true
size = [1280, 720]
position = [0, 0]
# Base name of the template file in the template/ folder, used for all items.
image = "template"
# (optional) Keep the template when an item has no thumb.
always_on = true
# (optional) "position" places the template at `position` (clamped);
# "origin" pins it to (0, 0).
anchor = "position"
"##
}
