//! Pipeline driver: capture every slide, then composite the grid.
//!
//! A run moves strictly forward through `Idle -> Capturing -> Compositing ->
//! Done`. Any error moves it to `Failed`. Per-slide captures written before a
//! failure stay on disk for inspection; the grid is only written once every
//! capture decoded.

use crate::capture::{capture_slides, Capture};
use crate::config::PreviewConfig;
use crate::layout::GridLayout;
use crate::renderer::{with_renderer, RenderConfig, Renderer};
use crate::slide::SlideSet;
use crate::{compose_grid, Error, Result};
use log::{error, info};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Capturing,
    Compositing,
    Done,
    Failed,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PreviewReport {
    pub grid_path: PathBuf,
    pub captures: Vec<Capture>,
    pub grid_width: u32,
    pub grid_height: u32,
    /// Hex SHA-256 of the composite PNG
    pub sha256: String,
}

pub struct Pipeline {
    config: PreviewConfig,
    slides: SlideSet,
    layout: GridLayout,
    stage: Stage,
}

impl Pipeline {
    /// Validate the settings and the slide list without starting a browser.
    pub fn new<I, P>(config: PreviewConfig, slides: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        config.validate()?;
        let slides = SlideSet::new(slides)?;
        let layout = config.layout(slides.len())?;
        Ok(Self {
            config,
            slides,
            layout,
            stage: Stage::Idle,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn slides(&self) -> &SlideSet {
        &self.slides
    }

    /// Run with headless Chrome.
    #[cfg(feature = "cdp")]
    pub fn run(&mut self) -> Result<PreviewReport> {
        self.run_with(crate::cdp::ChromeRenderer::launch)
    }

    /// Run with a renderer produced by `launch`. The renderer is closed
    /// before this returns, on success and on failure.
    pub fn run_with<R, F>(&mut self, launch: F) -> Result<PreviewReport>
    where
        R: Renderer,
        F: FnOnce(RenderConfig) -> Result<R>,
    {
        if self.stage != Stage::Idle {
            return Err(Error::ConfigError(format!("pipeline already ran (stage {:?})", self.stage)));
        }

        match self.execute(launch) {
            Ok(report) => {
                self.advance(Stage::Done);
                info!("Preview grid ready at {} (sha256 {})", report.grid_path.display(), report.sha256);
                Ok(report)
            }
            Err(e) => {
                error!("Preview failed during {:?}: {}", self.stage, e);
                self.stage = Stage::Failed;
                Err(e)
            }
        }
    }

    fn execute<R, F>(&mut self, launch: F) -> Result<PreviewReport>
    where
        R: Renderer,
        F: FnOnce(RenderConfig) -> Result<R>,
    {
        self.advance(Stage::Capturing);
        let renderer = launch(self.config.render_config())?;
        let settle = Duration::from_millis(self.config.settle_delay_ms);
        let captures = with_renderer(renderer, |r| {
            capture_slides(r, &self.slides, &self.config.output_dir, self.config.viewport, settle)
        })?;

        self.advance(Stage::Compositing);
        let bytes = compose_grid(&captures, &self.layout, &self.config.grid_style(), &self.config.grid_path)?;

        Ok(PreviewReport {
            grid_path: self.config.grid_path.clone(),
            captures,
            grid_width: self.layout.canvas_width,
            grid_height: self.layout.canvas_height,
            sha256: hex::encode(Sha256::digest(&bytes)),
        })
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            matches!(
                (self.stage, next),
                (Stage::Idle, Stage::Capturing) | (Stage::Capturing, Stage::Compositing) | (Stage::Compositing, Stage::Done)
            ),
            "invalid transition {:?} -> {:?}",
            self.stage,
            next
        );
        info!("Pipeline stage: {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slide_list_fails_before_anything_runs() {
        let none: Vec<PathBuf> = Vec::new();
        let err = Pipeline::new(PreviewConfig::default(), none).err().unwrap();
        assert!(matches!(err, Error::EmptySlideSet));
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn layout_is_computed_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (1..=5).map(|i| dir.path().join(format!("{}.html", i))).collect();
        for p in &paths {
            std::fs::write(p, "<html></html>").unwrap();
        }
        let cfg = PreviewConfig { columns: 2, ..Default::default() };
        let pipeline = Pipeline::new(cfg, &paths).unwrap();
        assert_eq!(pipeline.stage(), Stage::Idle);
        assert_eq!(pipeline.layout().rows, 3);
        assert_eq!(pipeline.slides().len(), 5);
    }

    #[test]
    fn launch_failure_marks_pipeline_failed() {
        let dir = tempfile::tempdir().unwrap();
        let slide = dir.path().join("only.html");
        std::fs::write(&slide, "x").unwrap();
        let cfg = PreviewConfig {
            output_dir: dir.path().join("out"),
            grid_path: dir.path().join("grid.png"),
            ..Default::default()
        };
        let mut pipeline = Pipeline::new(cfg, [&slide]).unwrap();

        struct NeverStarts;
        impl Renderer for NeverStarts {
            fn launch(_config: RenderConfig) -> Result<Self> {
                Err(Error::InitializationError("no browser".into()))
            }
            fn load(&mut self, _url: &str) -> Result<()> {
                Ok(())
            }
            fn capture_png(&self) -> Result<Vec<u8>> {
                Ok(Vec::new())
            }
            fn close(self) -> Result<()> {
                Ok(())
            }
        }

        let err = pipeline.run_with(NeverStarts::launch).unwrap_err();
        assert!(matches!(err, Error::InitializationError(_)));
        assert_eq!(pipeline.stage(), Stage::Failed);
        assert!(!dir.path().join("grid.png").exists());

        // a failed pipeline does not run again
        assert!(pipeline.run_with(NeverStarts::launch).is_err());
    }
}
