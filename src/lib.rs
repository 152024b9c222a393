//! Slide Preview
//!
//! Renders an ordered set of self-contained HTML slides in headless Chrome,
//! writes one PNG per slide and tiles the captures into a single labelled
//! contact sheet.
//!
//! # Features
//!
//! - **CDP Backend** (default): captures slides through the Chrome DevTools
//!   Protocol via the `headless_chrome` crate
//! - **Pure layout**: grid geometry is a free function, testable without a
//!   browser or a filesystem
//! - **No partial artifacts**: captures and the composite are written
//!   atomically, and the composite is never written when any stage fails
//!
//! # Example
//!
//! ```no_run
//! use slide_preview::{Pipeline, PreviewConfig, Viewport};
//!
//! # #[cfg(feature = "cdp")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PreviewConfig {
//!     viewport: Viewport { width: 960, height: 540 },
//!     columns: 4,
//!     ..Default::default()
//! };
//!
//! let mut pipeline = Pipeline::new(config, vec!["deck/01.html", "deck/02.html"])?;
//! let report = pipeline.run()?;
//! println!("Grid written to {}", report.grid_path.display());
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "cdp"))]
//! # fn main() {}
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod capture;
pub mod compose;
pub mod config;
pub mod label;
pub mod layout;
mod output;
pub mod pipeline;
pub mod renderer;
pub mod slide;

#[cfg(feature = "cdp")]
pub mod cdp;

pub use capture::{capture_file_name, capture_slides, Capture};
pub use compose::{compose_grid, compose_images, GridStyle};
pub use config::{Color, Manifest, PreviewConfig};
pub use layout::{compute_grid, GridLayout, Rect};
pub use pipeline::{Pipeline, PreviewReport, Stage};
pub use renderer::{with_renderer, RenderConfig, Renderer};
pub use slide::{Slide, SlideSet};

#[cfg(feature = "cdp")]
pub use cdp::ChromeRenderer;

/// Viewport dimensions used both for rendering and as the grid cell size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
        }
    }
}
