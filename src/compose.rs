//! Grid compositor: tiles captures into one labelled contact sheet.

use crate::capture::Capture;
use crate::config::Color;
use crate::label::draw_label;
use crate::layout::GridLayout;
use crate::output::write_atomic;
use crate::{Error, Result};
use image::{imageops, ImageFormat, RgbaImage};
use log::{debug, info};
use std::io::Cursor;
use std::path::Path;

/// Colours of the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridStyle {
    pub background: Color,
    pub label_fill: Color,
    pub label_text: Color,
}

impl Default for GridStyle {
    fn default() -> Self {
        let cfg = crate::PreviewConfig::default();
        cfg.grid_style()
    }
}

/// Decode `captures`, tile them per `layout` and write the PNG to
/// `output_path`. Returns the encoded bytes that were written.
///
/// Every capture is decoded and checked before anything touches the disk, and
/// the composite is fully encoded in memory first, so a failure never leaves
/// a partial grid behind.
pub fn compose_grid(
    captures: &[Capture],
    layout: &GridLayout,
    style: &GridStyle,
    output_path: &Path,
) -> Result<Vec<u8>> {
    if captures.len() != layout.count {
        return Err(Error::ConfigError(format!(
            "layout is for {} slide(s) but {} capture(s) were given",
            layout.count,
            captures.len()
        )));
    }

    let images = captures
        .iter()
        .map(|c| decode_capture(c, layout))
        .collect::<Result<Vec<_>>>()?;

    let canvas = compose_images(&images, layout, style)?;
    let bytes = encode_png(&canvas)?;
    write_atomic(output_path, &bytes)?;
    info!(
        "Wrote {}x{} grid of {} slide(s) to {}",
        layout.canvas_width,
        layout.canvas_height,
        layout.count,
        output_path.display()
    );
    Ok(bytes)
}

/// Pure composition over already-decoded captures. Labels are the 1-based
/// position in `images`.
pub fn compose_images(images: &[RgbaImage], layout: &GridLayout, style: &GridStyle) -> Result<RgbaImage> {
    if images.len() != layout.count {
        return Err(Error::ConfigError(format!(
            "layout is for {} slide(s) but {} image(s) were given",
            layout.count,
            images.len()
        )));
    }

    let mut canvas = RgbaImage::from_pixel(layout.canvas_width, layout.canvas_height, style.background.to_rgba());

    for (i, img) in images.iter().enumerate() {
        let (cell, band) = layout
            .image_rect(i)
            .zip(layout.label_rect(i))
            .ok_or_else(|| Error::ConfigError(format!("layout has no cell for image {}", i + 1)))?;
        if img.dimensions() != (cell.width, cell.height) {
            return Err(Error::ConfigError(format!(
                "image {} is {}x{}, expected {}x{}",
                i + 1,
                img.width(),
                img.height(),
                cell.width,
                cell.height
            )));
        }
        imageops::replace(&mut canvas, img, i64::from(cell.x), i64::from(cell.y));
        draw_label(
            &mut canvas,
            band,
            &(i + 1).to_string(),
            style.label_fill.to_rgba(),
            style.label_text.to_rgba(),
        );
    }

    Ok(canvas)
}

fn decode_capture(capture: &Capture, layout: &GridLayout) -> Result<RgbaImage> {
    let decode_err = |reason: String| Error::DecodeError { path: capture.path.clone(), reason };

    let bytes = std::fs::read(&capture.path).map_err(|e| decode_err(e.to_string()))?;
    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .map_err(|e| decode_err(e.to_string()))?
        .to_rgba8();

    if img.dimensions() != (layout.cell_width, layout.cell_height) {
        return Err(decode_err(format!(
            "capture is {}x{}, expected {}x{}",
            img.width(),
            img.height(),
            layout.cell_width,
            layout.cell_height
        )));
    }
    debug!("Decoded capture {} ({})", capture.index, capture.path.display());
    Ok(img)
}

fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    canvas
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| Error::EncodeError(e.to_string()))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_grid;
    use image::Rgba;
    use std::path::PathBuf;

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn images_land_at_their_origins() {
        let layout = compute_grid(3, 2, 8, 6, 7, 2).unwrap();
        let style = GridStyle::default();
        let images = vec![solid(8, 6, [255, 0, 0]), solid(8, 6, [0, 255, 0]), solid(8, 6, [0, 0, 255])];
        let canvas = compose_images(&images, &layout, &style).unwrap();

        assert_eq!(canvas.dimensions(), (layout.canvas_width, layout.canvas_height));
        for (i, img) in images.iter().enumerate() {
            let r = layout.image_rect(i).unwrap();
            assert_eq!(canvas.get_pixel(r.x, r.y), img.get_pixel(0, 0));
            assert_eq!(canvas.get_pixel(r.right() - 1, r.bottom() - 1), img.get_pixel(0, 0));
        }
        // gap and the empty fourth slot keep the background
        assert_eq!(canvas.get_pixel(0, 0), &style.background.to_rgba());
        let empty = compute_grid(4, 2, 8, 6, 7, 2).unwrap().cell_rect(3).unwrap();
        assert_eq!(canvas.get_pixel(empty.x + 1, empty.y + 1), &style.background.to_rgba());
    }

    #[test]
    fn label_band_is_filled_and_inked() {
        let layout = compute_grid(1, 1, 40, 20, 30, 0).unwrap();
        let style = GridStyle::default();
        let canvas = compose_images(&[solid(40, 20, [10, 10, 10])], &layout, &style).unwrap();

        let band = layout.label_rect(0).unwrap();
        let fill = style.label_fill.to_rgba();
        let ink = style.label_text.to_rgba();
        assert_eq!(canvas.get_pixel(band.x, band.y), &fill);
        let inked = (band.y..band.bottom())
            .flat_map(|y| (band.x..band.right()).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.get_pixel(x, y) == &ink)
            .count();
        assert!(inked > 0);
    }

    #[test]
    fn image_count_must_match_layout() {
        let layout = compute_grid(1, 2, 8, 6, 4, 1).unwrap();
        let images = vec![solid(8, 6, [0, 0, 0]), solid(8, 6, [0, 0, 0])];
        let err = compose_images(&images, &layout, &GridStyle::default()).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn wrong_sized_image_is_rejected() {
        let layout = compute_grid(1, 1, 8, 6, 4, 1).unwrap();
        let err = compose_images(&[solid(9, 6, [0, 0, 0])], &layout, &GridStyle::default()).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn undecodable_capture_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("slide-01.png");
        solid(8, 6, [1, 2, 3]).save(&good).unwrap();
        let bad = dir.path().join("slide-02.png");
        std::fs::write(&bad, b"not a png").unwrap();

        let captures = vec![
            Capture { index: 1, path: good, width: 8, height: 6 },
            Capture { index: 2, path: bad.clone(), width: 8, height: 6 },
        ];
        let layout = compute_grid(2, 2, 8, 6, 4, 1).unwrap();
        let out: PathBuf = dir.path().join("preview-grid.png");
        let err = compose_grid(&captures, &layout, &GridStyle::default(), &out).unwrap_err();

        match err {
            Error::DecodeError { path, .. } => assert_eq!(path, bad),
            other => panic!("unexpected error: {}", other),
        }
        assert!(!out.exists());
    }
}
