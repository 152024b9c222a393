//! The rendering-context seam between the capturer and a browser backend.

use crate::{Result, Viewport};
use log::warn;
use std::path::PathBuf;
use std::time::Duration;

/// Headroom a backend connection gets beyond the longest expected silence.
pub const SESSION_MARGIN: Duration = Duration::from_secs(10);

/// Settings a backend needs to start a rendering context.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub viewport: Viewport,
    /// Upper bound for navigation and render readiness, in milliseconds
    pub load_timeout_ms: u64,
    /// Pause between a slide becoming ready and its capture, in milliseconds
    pub settle_delay_ms: u64,
    /// Browser binary; backends autodetect when unset
    pub chrome_path: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            load_timeout_ms: 30_000,
            settle_delay_ms: 100,
            chrome_path: None,
        }
    }
}

impl RenderConfig {
    /// How long a backend connection may wait on, or sit idle for, a single
    /// exchange with the browser.
    ///
    /// Always longer than the readiness wait plus the settle delay, so a slow
    /// slide surfaces as [`crate::Error::Timeout`] rather than a dropped
    /// connection.
    pub fn session_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms.saturating_add(self.settle_delay_ms)).saturating_add(SESSION_MARGIN)
    }
}

/// A headless rendering context that can show one page at a time.
///
/// One context is launched per run and reused for every slide, so
/// implementations must leave no per-page state behind between `load` calls.
pub trait Renderer {
    /// Start the rendering context
    fn launch(config: RenderConfig) -> Result<Self>
    where
        Self: Sized;

    /// Navigate to `url` and return once the page has rendered
    fn load(&mut self, url: &str) -> Result<()>;

    /// Capture the current viewport as PNG bytes
    fn capture_png(&self) -> Result<Vec<u8>>;

    /// Release the context
    fn close(self) -> Result<()>;
}

/// Run `f` against `renderer`, then close the renderer whatever `f`
/// returned.
///
/// An error from `f` takes precedence over an error from `close`, which is
/// only logged in that case. If `f` panics, the renderer is dropped during
/// unwinding and backends release their resources in `Drop`.
pub fn with_renderer<R, T, F>(mut renderer: R, f: F) -> Result<T>
where
    R: Renderer,
    F: FnOnce(&mut R) -> Result<T>,
{
    let outcome = f(&mut renderer);
    let closed = renderer.close();
    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!("Failed to close renderer after error: {}", close_err);
            Err(e)
        }
    }
}
