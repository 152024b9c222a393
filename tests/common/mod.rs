//! Shared helpers: a scripted renderer and on-disk slide decks.

#![allow(dead_code)]

use image::{ImageFormat, Rgba, RgbaImage};
use sha2::{Digest, Sha256};
use slide_preview::{Error, RenderConfig, Renderer, Result};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// What the scripted renderer observed.
#[derive(Debug, Default)]
pub struct Journal {
    pub loads: Vec<String>,
    pub closes: u32,
}

/// Failure to inject at a 1-based load number.
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    /// `load` fails
    Load(usize),
    /// `capture_png` returns bytes that are not a PNG
    Garbage(usize),
}

/// Renders every page as a solid colour derived from its URL.
pub struct ScriptedRenderer {
    config: RenderConfig,
    current: Option<String>,
    fault: Option<Fault>,
    journal: Arc<Mutex<Journal>>,
}

impl ScriptedRenderer {
    pub fn new(config: RenderConfig, fault: Option<Fault>, journal: Arc<Mutex<Journal>>) -> Self {
        Self { config, current: None, fault, journal }
    }

    fn load_count(&self) -> usize {
        self.journal.lock().unwrap().loads.len()
    }
}

impl Renderer for ScriptedRenderer {
    fn launch(config: RenderConfig) -> Result<Self> {
        Ok(Self::new(config, None, Arc::default()))
    }

    fn load(&mut self, url: &str) -> Result<()> {
        self.journal.lock().unwrap().loads.push(url.to_string());
        if let Some(Fault::Load(n)) = self.fault {
            if n == self.load_count() {
                return Err(Error::LoadError(format!("scripted failure on {}", url)));
            }
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    fn capture_png(&self) -> Result<Vec<u8>> {
        let url = self
            .current
            .as_deref()
            .ok_or_else(|| Error::RenderError("nothing loaded".into()))?;
        if let Some(Fault::Garbage(n)) = self.fault {
            if n == self.load_count() {
                return Ok(b"definitely not a png".to_vec());
            }
        }
        let img = RgbaImage::from_pixel(self.config.viewport.width, self.config.viewport.height, color_for(url));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| Error::RenderError(e.to_string()))?;
        Ok(buf.into_inner())
    }

    fn close(self) -> Result<()> {
        self.journal.lock().unwrap().closes += 1;
        Ok(())
    }
}

/// Colour the scripted renderer paints for `url`.
pub fn color_for(url: &str) -> Rgba<u8> {
    let d = Sha256::digest(url.as_bytes());
    Rgba([d[0], d[1], d[2], 255])
}

/// Write `names` as tiny HTML files under `dir`, returning their paths in the
/// given order.
pub fn write_deck(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let p = dir.join(name);
            std::fs::write(&p, format!("<html><body><h1>{}</h1></body></html>", name)).unwrap();
            p
        })
        .collect()
}
