#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Mirror symmetry applied to finished pixel grids.

use splat_core::{RandomStream, Specs};
use splat_grid::PixelGrid;

/// Probabilities of each mirror, in application order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MirrorProbabilities {
    /// Left half onto right half.
    pub x: f32,
    /// Top half onto bottom half.
    pub y: f32,
    /// Across the main diagonal.
    pub positive: f32,
    /// Across the anti-diagonal.
    pub negative: f32,
}

impl MirrorProbabilities {
    /// Collects the mirror probabilities of `specs`.
    #[must_use]
    pub const fn from_specs(specs: &Specs) -> Self {
        Self {
            x: specs.mirror_x,
            y: specs.mirror_y,
            positive: specs.mirror_positive,
            negative: specs.mirror_negative,
        }
    }
}

/// Mirrors chosen for one image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MirrorFlags {
    /// Copy the left half onto the right half of every row.
    pub x: bool,
    /// Copy the top rows onto the bottom rows.
    pub y: bool,
    /// Copy the lower triangle across the main diagonal.
    pub positive: bool,
    /// Copy across the anti-diagonal.
    pub negative: bool,
}

impl MirrorFlags {
    /// Decides every mirror from four uniform draws, in the order X, Y,
    /// positive, negative. All four are drawn even when a diagonal mirror
    /// cannot apply to the grid.
    pub fn draw<R: RandomStream + ?Sized>(probabilities: MirrorProbabilities, rng: &mut R) -> Self {
        Self {
            x: rng.next_unit() < probabilities.x,
            y: rng.next_unit() < probabilities.y,
            positive: rng.next_unit() < probabilities.positive,
            negative: rng.next_unit() < probabilities.negative,
        }
    }

    /// Applies the chosen mirrors in the order X, Y, positive, negative.
    ///
    /// Later mirrors read data already written by earlier ones. Diagonal
    /// mirrors only run on square grids.
    pub fn apply(&self, grid: &mut PixelGrid) {
        if self.x {
            mirror_x(grid);
        }
        if self.y {
            mirror_y(grid);
        }
        if grid.width() == grid.height() {
            if self.positive {
                mirror_positive(grid);
            }
            if self.negative {
                mirror_negative(grid);
            }
        }
    }
}

fn mirror_x(grid: &mut PixelGrid) {
    let width = grid.width() as usize;
    if width == 0 {
        return;
    }
    for row in grid.pixels_mut().chunks_exact_mut(width) {
        for x in 0..width / 2 {
            row[width - 1 - x] = row[x];
        }
    }
}

fn mirror_y(grid: &mut PixelGrid) {
    let width = grid.width() as usize;
    let height = grid.height() as usize;
    let pixels = grid.pixels_mut();
    for y in 0..height / 2 {
        let source = y * width;
        pixels.copy_within(source..source + width, (height - 1 - y) * width);
    }
}

fn mirror_positive(grid: &mut PixelGrid) {
    let size = grid.width() as usize;
    let pixels = grid.pixels_mut();
    for y in 1..size {
        for x in 0..y {
            pixels[x * size + y] = pixels[y * size + x];
        }
    }
}

fn mirror_negative(grid: &mut PixelGrid) {
    let size = grid.width() as usize;
    let pixels = grid.pixels_mut();
    for y in 1..size {
        for x in size - y..size {
            pixels[(size - 1 - x) * size + size - 1 - y] = pixels[y * size + x];
        }
    }
}
