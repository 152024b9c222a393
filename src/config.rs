//! Preview configuration and JSON manifest loading.
//!
//! Every setting has a default, so a manifest only needs the keys it wants to
//! change. Command-line flags are applied on top of whatever the manifest
//! provides.

use crate::compose::GridStyle;
use crate::layout::{compute_grid, GridLayout};
use crate::renderer::RenderConfig;
use crate::{Error, Result, Viewport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// An opaque RGB colour, written as `#rrggbb` in manifests and on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b])
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        let [r, g, b] = self.0;
        image::Rgba([r, g, b, 255])
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::ConfigError(format!("expected a #rrggbb colour, got '{}'", s)));
        }
        let channel = |at: usize| {
            u8::from_str_radix(&hex[at..at + 2], 16)
                .map_err(|e| Error::ConfigError(format!("bad colour '{}': {}", s, e)))
        };
        Ok(Color([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Settings for one preview run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewConfig {
    /// Browser viewport; also the size of every grid cell
    pub viewport: Viewport,
    /// Fixed number of grid columns
    pub columns: u32,
    /// Gap between cells and around the border, in pixels
    pub gap: u32,
    /// Height of the label band under each capture
    pub label_height: u32,
    /// Canvas background
    pub background: Color,
    /// Label band fill
    pub label_fill: Color,
    /// Label digits
    pub label_text: Color,
    /// Extra delay after the page reports it is ready, in milliseconds
    pub settle_delay_ms: u64,
    /// Upper bound for navigation and render readiness, in milliseconds
    pub load_timeout_ms: u64,
    /// Directory receiving `slide-NN.png`
    pub output_dir: PathBuf,
    /// Composite output path
    pub grid_path: PathBuf,
    /// Chrome/Chromium binary; autodetected when unset
    pub chrome_path: Option<PathBuf>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            columns: 4,
            gap: 20,
            label_height: 30,
            background: Color::rgb(0xf5, 0xf5, 0xf5),
            label_fill: Color::rgb(0x33, 0x33, 0x33),
            label_text: Color::rgb(0xff, 0xff, 0xff),
            settle_delay_ms: 100,
            load_timeout_ms: 30_000,
            output_dir: PathBuf::from("previews"),
            grid_path: PathBuf::from("preview-grid.png"),
            chrome_path: None,
        }
    }
}

impl PreviewConfig {
    /// Grid geometry for `count` slides under these settings.
    pub fn layout(&self, count: usize) -> Result<GridLayout> {
        compute_grid(
            count,
            self.columns,
            self.viewport.width,
            self.viewport.height,
            self.label_height,
            self.gap,
        )
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            viewport: self.viewport,
            load_timeout_ms: self.load_timeout_ms,
            settle_delay_ms: self.settle_delay_ms,
            chrome_path: self.chrome_path.clone(),
        }
    }

    pub fn grid_style(&self) -> GridStyle {
        GridStyle {
            background: self.background,
            label_fill: self.label_fill,
            label_text: self.label_text,
        }
    }

    /// Reject settings that cannot produce a grid, independent of slide count.
    pub fn validate(&self) -> Result<()> {
        if self.load_timeout_ms == 0 {
            return Err(Error::ConfigError("loadTimeoutMs must be greater than zero".into()));
        }
        if self.grid_path.as_os_str().is_empty() {
            return Err(Error::ConfigError("gridPath must not be empty".into()));
        }
        self.layout(1).map(|_| ())
    }
}

/// A JSON manifest: the ordered slide list plus any setting overrides.
///
/// Relative `slides`, `outputDir` and `gridPath` are taken relative to the
/// manifest file, including the default output locations.
///
/// ```json
/// { "slides": ["01-title.html", "02-agenda.html"], "columns": 3 }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub slides: Vec<PathBuf>,
    #[serde(flatten)]
    pub config: PreviewConfig,
}

impl Manifest {
    /// Load a manifest, resolving its relative paths against the manifest's
    /// own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut manifest: Manifest = serde_json::from_str(&raw)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let config = &mut manifest.config;
        for p in manifest
            .slides
            .iter_mut()
            .chain([&mut config.output_dir, &mut config.grid_path])
        {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
        log::debug!("loaded manifest {} with {} slide(s)", path.display(), manifest.slides.len());
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_and_prints_hex() {
        let c: Color = "#1a2B3c".parse().unwrap();
        assert_eq!(c, Color::rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(c.to_string(), "#1a2b3c");
        assert_eq!("ffffff".parse::<Color>().unwrap(), Color::rgb(255, 255, 255));
    }

    #[test]
    fn color_rejects_garbage() {
        assert!("#fff".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = PreviewConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.grid_path, PathBuf::from("preview-grid.png"));
        assert_eq!(cfg.columns, 4);
    }

    #[test]
    fn zero_columns_fail_validation() {
        let cfg = PreviewConfig { columns: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn manifest_fills_defaults_and_resolves_slides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        std::fs::write(
            &path,
            r##"{"slides":["a.html","/abs/b.html"],"columns":3,"labelFill":"#000000"}"##,
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.slides[0], dir.path().join("a.html"));
        assert_eq!(manifest.slides[1], PathBuf::from("/abs/b.html"));
        assert_eq!(manifest.config.columns, 3);
        assert_eq!(manifest.config.label_fill, Color::rgb(0, 0, 0));
        assert_eq!(manifest.config.gap, PreviewConfig::default().gap);
    }

    #[test]
    fn manifest_outputs_resolve_like_slides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        std::fs::write(&path, r#"{"slides":["a.html"],"outputDir":"shots","gridPath":"/tmp/grid.png"}"#).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.config.output_dir, dir.path().join("shots"));
        assert_eq!(manifest.config.grid_path, PathBuf::from("/tmp/grid.png"));

        std::fs::write(&path, r#"{"slides":["a.html"]}"#).unwrap();
        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.config.output_dir, dir.path().join("previews"));
        assert_eq!(manifest.config.grid_path, dir.path().join("preview-grid.png"));
    }

    #[test]
    fn manifest_viewport_may_set_one_side() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        std::fs::write(&path, r#"{"viewport":{"width":640}}"#).unwrap();
        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.config.viewport, Viewport { width: 640, height: 540 });
    }

    #[test]
    fn huge_viewport_fails_validation() {
        let cfg = PreviewConfig { viewport: Viewport { width: 60_000, height: 60_000 }, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn render_config_carries_timing() {
        let cfg = PreviewConfig { settle_delay_ms: 250, load_timeout_ms: 5_000, ..Default::default() };
        let rc = cfg.render_config();
        assert_eq!((rc.load_timeout_ms, rc.settle_delay_ms), (5_000, 250));
    }

    #[test]
    fn manifest_with_bad_colour_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        std::fs::write(&path, r#"{"background":"blue"}"#).unwrap();
        assert!(matches!(Manifest::load(&path), Err(Error::ConfigError(_))));
    }
}
