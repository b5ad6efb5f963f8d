#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Probabilistic cellular automaton that cleans up the occupancy mask.
//!
//! Sparse cells (0 or 1 occupied neighbours) are cleared with the despeckle
//! and despur probabilities; crowded cells (7 or 8 occupied neighbours) are
//! filled with the relax and devoid probabilities. Counts 2 through 6 never
//! change a cell.

use splat_core::{RandomStream, Specs, CA_PROBABILITY_COUNT};
use splat_grid::OccupancyGrid;

/// Double-buffered automaton refining an [`OccupancyGrid`] in place.
#[derive(Clone, Debug)]
pub struct CellularAutomaton {
    probabilities: [f32; CA_PROBABILITY_COUNT],
    generations: u32,
    scratch: Vec<bool>,
}

impl CellularAutomaton {
    /// Creates an automaton with probabilities for neighbour counts
    /// 0, 1, 7 and 8, running `generations` synchronous generations.
    #[must_use]
    pub fn new(probabilities: [f32; CA_PROBABILITY_COUNT], generations: u32) -> Self {
        Self {
            probabilities,
            generations,
            scratch: Vec::new(),
        }
    }

    /// Creates an automaton from the automaton fields of `specs`.
    #[must_use]
    pub fn from_specs(specs: &Specs) -> Self {
        Self::new(specs.ca_probabilities, specs.ca_generations)
    }

    /// Runs every generation over `grid`.
    ///
    /// Each generation reads only the previous generation and draws exactly
    /// one uniform float per cell in row-major order, whether or not the
    /// cell's neighbour count makes it eligible to change.
    pub fn refine<R: RandomStream + ?Sized>(&mut self, grid: &mut OccupancyGrid, rng: &mut R) {
        self.scratch.clear();
        self.scratch.resize(grid.cells().len(), false);

        for _ in 0..self.generations {
            for (index, next) in self.scratch.iter_mut().enumerate() {
                let draw = rng.next_unit();
                let current = grid.cells()[index];
                *next = match grid.occupied_neighbors(index) {
                    count @ 0..=1 if draw < self.probabilities[count] => false,
                    count @ 7..=8 if draw < self.probabilities[count - 5] => true,
                    _ => current,
                };
            }
            grid.swap_cells(&mut self.scratch);
        }
    }
}
