//! Grid geometry for the contact sheet.
//!
//! Captures are tiled left-to-right, top-to-bottom on a fixed number of
//! columns. Every cell is a capture followed directly by a label band, and a
//! uniform gap separates cells from each other and from the canvas edge.

use crate::{Error, Result};

/// Largest composite buffer, in bytes of RGBA, that a grid may require (2 GiB).
pub const MAX_CANVAS_BYTES: u64 = 1 << 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// True when the two rectangles share at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// Derived geometry of a preview grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub count: usize,
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub label_height: u32,
    pub gap: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

/// Compute the grid for `count` captures of `cell_width` x `cell_height`.
///
/// - `rows = ceil(count / columns)`
/// - `canvas_width = columns * cell_width + (columns + 1) * gap`
/// - `canvas_height = rows * (cell_height + label_height) + (rows + 1) * gap`
///
/// Zero counts, zero columns and empty cells are rejected, as are canvases
/// whose sides do not fit in `u32` or whose RGBA buffer would exceed
/// [`MAX_CANVAS_BYTES`].
pub fn compute_grid(
    count: usize,
    columns: u32,
    cell_width: u32,
    cell_height: u32,
    label_height: u32,
    gap: u32,
) -> Result<GridLayout> {
    if count == 0 {
        return Err(Error::EmptySlideSet);
    }
    if columns == 0 {
        return Err(Error::ConfigError("column count must be at least 1".into()));
    }
    if cell_width == 0 || cell_height == 0 {
        return Err(Error::ConfigError(format!(
            "cell size must be non-zero, got {}x{}",
            cell_width, cell_height
        )));
    }

    let count64 = u64::try_from(count).map_err(|_| overflow())?;
    let columns64 = u64::from(columns);
    let rows64 = count64.div_ceil(columns64);
    let gap64 = u64::from(gap);

    let canvas_width = (columns64 * u64::from(cell_width))
        .checked_add((columns64 + 1) * gap64)
        .ok_or_else(overflow)?;
    let canvas_height = rows64
        .checked_mul(u64::from(cell_height) + u64::from(label_height))
        .and_then(|h| h.checked_add((rows64 + 1).checked_mul(gap64)?))
        .ok_or_else(overflow)?;

    let canvas_bytes = canvas_width
        .checked_mul(canvas_height)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(overflow)?;
    if canvas_bytes > MAX_CANVAS_BYTES || usize::try_from(canvas_bytes).is_err() {
        return Err(Error::ConfigError(format!(
            "grid canvas {}x{} needs {} bytes, limit is {}",
            canvas_width, canvas_height, canvas_bytes, MAX_CANVAS_BYTES
        )));
    }

    Ok(GridLayout {
        count,
        columns,
        rows: u32::try_from(rows64).map_err(|_| overflow())?,
        cell_width,
        cell_height,
        label_height,
        gap,
        canvas_width: u32::try_from(canvas_width).map_err(|_| overflow())?,
        canvas_height: u32::try_from(canvas_height).map_err(|_| overflow())?,
    })
}

fn overflow() -> Error {
    Error::ConfigError("grid canvas is too large".into())
}

impl GridLayout {
    /// Top-left origin of the capture at 0-based `index`.
    pub fn origin(&self, index: usize) -> Option<(u32, u32)> {
        if index >= self.count {
            return None;
        }
        let row = (index / self.columns as usize) as u32;
        let col = (index % self.columns as usize) as u32;
        let x = self.gap + col * (self.cell_width + self.gap);
        let y = self.gap + row * (self.cell_height + self.label_height + self.gap);
        Some((x, y))
    }

    /// Area covered by the capture at `index`.
    pub fn image_rect(&self, index: usize) -> Option<Rect> {
        self.origin(index).map(|(x, y)| Rect {
            x,
            y,
            width: self.cell_width,
            height: self.cell_height,
        })
    }

    /// Label band directly below the capture at `index`.
    pub fn label_rect(&self, index: usize) -> Option<Rect> {
        self.origin(index).map(|(x, y)| Rect {
            x,
            y: y + self.cell_height,
            width: self.cell_width,
            height: self.label_height,
        })
    }

    /// Capture plus label band.
    pub fn cell_rect(&self, index: usize) -> Option<Rect> {
        self.origin(index).map(|(x, y)| Rect {
            x,
            y,
            width: self.cell_width,
            height: self.cell_height + self.label_height,
        })
    }

    /// Grid slots with no capture in them (the tail of the last row).
    pub fn empty_slots(&self) -> usize {
        (self.rows as usize * self.columns as usize) - self.count
    }
}
