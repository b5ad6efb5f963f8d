#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Radial density field that samples the initial occupancy mask.

use splat_core::{bias, gain, lerp, RandomStream, Specs};
use splat_grid::OccupancyGrid;

/// Fill-probability field peaking at the grid centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DensityField {
    bias: f32,
    gain: f32,
    min_density: f32,
    max_density: f32,
}

impl DensityField {
    /// Creates a field from explicit shaping and density parameters.
    #[must_use]
    pub const fn new(bias: f32, gain: f32, min_density: f32, max_density: f32) -> Self {
        Self {
            bias,
            gain,
            min_density,
            max_density,
        }
    }

    /// Creates a field from the shaping and density fields of `specs`.
    #[must_use]
    pub const fn from_specs(specs: &Specs) -> Self {
        Self::new(specs.bias, specs.gain, specs.min_density, specs.max_density)
    }

    /// Fill probability of the cell at `(x, y)` in a `width` by `height` grid.
    ///
    /// The radial measure is 1 at the centre and 0 at the edge on each axis;
    /// the per-axis measures are multiplied, shaped by bias then gain, and
    /// mapped onto `[min_density, max_density]`.
    #[must_use]
    pub fn cutoff(&self, x: u32, y: u32, width: u32, height: u32) -> f32 {
        let distance = axis_distance(x, width) * axis_distance(y, height);
        let shaped = gain(bias(distance, self.bias), self.gain);
        lerp(self.min_density, self.max_density, shaped)
    }

    /// Samples a fresh occupancy mask.
    ///
    /// Draws exactly one uniform float per cell in row-major order; a cell
    /// is occupied when its draw does not exceed its cutoff.
    pub fn sample<R: RandomStream + ?Sized>(
        &self,
        width: u32,
        height: u32,
        rng: &mut R,
    ) -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(width, height);
        let mut index = 0;
        for y in 0..height {
            for x in 0..width {
                let cutoff = self.cutoff(x, y, width, height);
                grid.set(index, rng.next_unit() <= cutoff);
                index += 1;
            }
        }
        grid
    }
}

fn axis_distance(position: u32, extent: u32) -> f32 {
    let extent = extent as f32;
    1.0 - ((extent - position as f32 * 2.0) / extent).abs()
}
