//! Screenshot capturer: drives one renderer across the slide set in order.

use crate::output::write_atomic;
use crate::renderer::Renderer;
use crate::slide::SlideSet;
use crate::{Error, Result, Viewport};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A screenshot of one slide, written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// 1-based slide position
    pub index: usize,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// `slide-01.png`, `slide-02.png`, ...
pub fn capture_file_name(index: usize) -> String {
    format!("slide-{:02}.png", index)
}

/// Capture every slide with `renderer`, strictly one after another.
///
/// Creates `output_dir` if needed. Each capture is written atomically; the
/// first failure aborts the loop and is returned. The renderer is borrowed,
/// closing it is the caller's job (see [`crate::with_renderer`]).
pub fn capture_slides<R: Renderer>(
    renderer: &mut R,
    slides: &SlideSet,
    output_dir: &Path,
    viewport: Viewport,
    settle: Duration,
) -> Result<Vec<Capture>> {
    std::fs::create_dir_all(output_dir)?;

    let mut captures = Vec::with_capacity(slides.len());
    for slide in slides {
        let url = slide.file_url()?;
        debug!("Loading slide {} from {}", slide.index, url);
        renderer.load(&url)?;

        if !settle.is_zero() {
            std::thread::sleep(settle);
        }

        let png = renderer.capture_png()?;
        if png.is_empty() {
            return Err(Error::RenderError(format!("slide {} produced an empty screenshot", slide.index)));
        }

        let path = output_dir.join(capture_file_name(slide.index));
        write_atomic(&path, &png)?;
        debug!("Wrote {} ({} bytes)", path.display(), png.len());

        captures.push(Capture {
            index: slide.index,
            path,
            width: viewport.width,
            height: viewport.height,
        });
    }

    info!("Captured {} slide(s) into {}", captures.len(), output_dir.display());
    Ok(captures)
}
