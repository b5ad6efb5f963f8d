#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stage-typed grids that carry a sprite through the generation pipeline.
//!
//! The same row-major storage changes meaning as the sprite moves through
//! the pipeline, so each meaning gets its own type:
//!
//! * [`OccupancyGrid`] holds the binary mask produced by the density and
//!   automaton stages.
//! * [`PropagationGrid`] holds one tagged [`Cell`] per position while color
//!   spreads across the mask.
//! * [`PixelGrid`] holds packed `0xAARRGGBB` pixels for mirroring, scaling
//!   and encoding.
//!
//! Conversions only run forwards: [`OccupancyGrid::into_propagation`] and
//! [`PropagationGrid::finalize`].

use splat_core::Rgb;
use thiserror::Error;

pub mod neighbors;

pub use neighbors::neighbors;

/// Fully transparent pixel value.
pub const TRANSPARENT: u32 = 0;

/// Errors raised when raw buffers do not fit the requested dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The buffer length differs from `width * height`.
    #[error("buffer of {len} cells does not match {width}x{height}")]
    LengthMismatch {
        /// Requested column count.
        width: u32,
        /// Requested row count.
        height: u32,
        /// Length of the rejected buffer.
        len: usize,
    },
}

fn cell_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Binary mask marking which cells may carry a permanent sprite color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates an unoccupied grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; cell_count(width, height)],
        }
    }

    /// Wraps an existing row-major mask.
    pub fn from_cells(width: u32, height: u32, cells: Vec<bool>) -> Result<Self, GridError> {
        if cells.len() != cell_count(width, height) {
            return Err(GridError::LengthMismatch {
                width,
                height,
                len: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major occupancy flags.
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Whether the cell at the provided position is occupied.
    #[must_use]
    pub fn is_occupied(&self, x: u32, y: u32) -> bool {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Marks the cell at the row-major `index`.
    pub fn set(&mut self, index: usize, occupied: bool) {
        self.cells[index] = occupied;
    }

    /// Number of occupied cells among the up to eight neighbours of `index`.
    #[must_use]
    pub fn occupied_neighbors(&self, index: usize) -> usize {
        neighbors(index, self.width as usize, self.height as usize)
            .filter(|&neighbor| self.cells[neighbor])
            .count()
    }

    /// Number of occupied cells in the whole grid.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|occupied| **occupied).count()
    }

    /// Exchanges the cell storage with an equally sized scratch buffer.
    ///
    /// Used by double-buffered stages: they write the next generation into
    /// the scratch buffer and swap it in without reallocating.
    pub fn swap_cells(&mut self, scratch: &mut Vec<bool>) {
        debug_assert_eq!(scratch.len(), self.cells.len(), "scratch size mismatch");
        std::mem::swap(&mut self.cells, scratch);
    }

    /// Converts the mask into a propagation grid of unvisited cells.
    #[must_use]
    pub fn into_propagation(self) -> PropagationGrid {
        PropagationGrid {
            width: self.width,
            height: self.height,
            cells: self
                .cells
                .into_iter()
                .map(|occupied| Cell::Unvisited { occupied })
                .collect(),
        }
    }
}

/// State of one cell while color propagates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    /// No color written yet; carries the cell's occupancy.
    Unvisited {
        /// Whether the occupancy mask marked this cell.
        occupied: bool,
    },
    /// Colored conduit that was not occupied; discarded on finalization.
    Pending(Rgb),
    /// Colored cell that was occupied; its color is permanent.
    Final(Rgb),
}

impl Cell {
    /// Colors a cell, choosing [`Cell::Final`] for occupied cells and
    /// [`Cell::Pending`] otherwise.
    #[must_use]
    pub const fn colored(color: Rgb, occupied: bool) -> Self {
        if occupied {
            Self::Final(color)
        } else {
            Self::Pending(color)
        }
    }

    /// Whether no color has been written to the cell.
    #[must_use]
    pub const fn is_unvisited(&self) -> bool {
        matches!(self, Self::Unvisited { .. })
    }

    /// Whether the occupancy mask marked this cell.
    #[must_use]
    pub const fn was_occupied(&self) -> bool {
        match self {
            Self::Unvisited { occupied } => *occupied,
            Self::Pending(_) => false,
            Self::Final(_) => true,
        }
    }

    /// Color written to the cell, if any.
    #[must_use]
    pub const fn color(&self) -> Option<Rgb> {
        match self {
            Self::Unvisited { .. } => None,
            Self::Pending(color) | Self::Final(color) => Some(*color),
        }
    }
}

/// Grid of tagged [`Cell`]s used while color spreads over the mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropagationGrid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl PropagationGrid {
    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major cells.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at the row-major `index`.
    #[must_use]
    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Overwrites the cell at the row-major `index`.
    pub fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    /// Collapses the grid into pixels: final cells become opaque, every
    /// other cell becomes transparent.
    #[must_use]
    pub fn finalize(self) -> PixelGrid {
        PixelGrid {
            width: self.width,
            height: self.height,
            pixels: self
                .cells
                .into_iter()
                .map(|cell| match cell {
                    Cell::Final(color) => color.to_argb(),
                    Cell::Pending(_) | Cell::Unvisited { .. } => TRANSPARENT,
                })
                .collect(),
        }
    }
}

/// Row-major buffer of packed `0xAARRGGBB` pixels.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelGrid {
    /// Creates a fully transparent grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; cell_count(width, height)],
        }
    }

    /// Wraps an existing row-major pixel buffer.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, GridError> {
        if pixels.len() != cell_count(width, height) {
            return Err(GridError::LengthMismatch {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixels.
    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Mutable row-major pixels.
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Releases the underlying buffer.
    #[must_use]
    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    /// Pixel at the provided position.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Pixel at the provided position, or the nearest border pixel when the
    /// position lies outside the grid.
    #[must_use]
    pub fn clamped_pixel(&self, x: i64, y: i64) -> u32 {
        let x = x.clamp(0, i64::from(self.width) - 1);
        let y = y.clamp(0, i64::from(self.height) - 1);
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Overwrites the pixel at the provided position.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: u32) {
        self.pixels[y as usize * self.width as usize + x as usize] = pixel;
    }

    /// Pixels of row `y`.
    #[must_use]
    pub fn row(&self, y: u32) -> &[u32] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Number of pixels that are not fully transparent.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.pixels
            .iter()
            .filter(|pixel| **pixel != TRANSPARENT)
            .count()
    }
}
