#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised frontier walk that spreads palette colors over the mask.
//!
//! Seeds are planted on random cells, then a FIFO frontier grows color into
//! unvisited neighbours. Unoccupied cells carry color as [`Cell::Pending`]
//! conduits so regions can jump gaps in the mask, but only occupied cells
//! ([`Cell::Final`]) survive finalization.

use std::collections::VecDeque;

use splat_core::{Palette, RandomStream, Specs};
use splat_grid::{neighbors, Cell, OccupancyGrid, PixelGrid, PropagationGrid};
use tracing::trace;

/// Color propagation stage.
#[derive(Clone, Debug)]
pub struct ColorPropagator {
    seeds: u32,
    variance: f32,
    mutation: f32,
    frontier: VecDeque<usize>,
}

impl ColorPropagator {
    /// Creates a propagator planting `seeds` seeds.
    ///
    /// `variance` is the probability that color crosses into a neighbour on
    /// one attempt; `mutation` the probability that the crossing picks a
    /// fresh palette color instead of copying the parent's.
    #[must_use]
    pub fn new(seeds: u32, variance: f32, mutation: f32) -> Self {
        Self {
            seeds,
            variance,
            mutation,
            frontier: VecDeque::new(),
        }
    }

    /// Creates a propagator from the propagation fields of `specs`.
    #[must_use]
    pub fn from_specs(specs: &Specs) -> Self {
        Self::new(specs.seeds, specs.variance, specs.mutation)
    }

    /// Colors `occupancy` and collapses it into pixels.
    pub fn colorize<R: RandomStream + ?Sized>(
        &mut self,
        occupancy: OccupancyGrid,
        palette: &Palette,
        rng: &mut R,
    ) -> PixelGrid {
        let mut grid = occupancy.into_propagation();
        self.spread(&mut grid, palette, rng);
        grid.finalize()
    }

    /// Plants the seeds and drains the frontier, leaving `grid` in its
    /// tagged state.
    ///
    /// Draw order: per seed, a cell index then a palette index. Per popped
    /// cell, for each unvisited neighbour in [`neighbors`] order, a uniform
    /// float against `variance`; on success a uniform float against
    /// `mutation` followed by either a palette index (mutating) or one raw
    /// word that is discarded (copying the parent's color).
    pub fn spread<R: RandomStream + ?Sized>(
        &mut self,
        grid: &mut PropagationGrid,
        palette: &Palette,
        rng: &mut R,
    ) {
        self.frontier.clear();
        if grid.is_empty() {
            return;
        }

        self.plant(grid, palette, rng);

        if self.variance <= 0.0 {
            // No neighbour can ever pass the variance test.
            self.frontier.clear();
            return;
        }

        let width = grid.width() as usize;
        let height = grid.height() as usize;
        let mut pops = 0usize;

        while let Some(index) = self.frontier.pop_front() {
            pops += 1;
            let parent_color = match grid.cell(index) {
                Cell::Pending(color) | Cell::Final(color) => color,
                Cell::Unvisited { .. } => {
                    debug_assert!(false, "uncolored cell {index} entered the frontier");
                    continue;
                }
            };

            let mut finished = true;
            for neighbor in neighbors(index, width, height) {
                let cell = grid.cell(neighbor);
                if !cell.is_unvisited() {
                    continue;
                }

                if rng.next_unit() > self.variance {
                    finished = false;
                    continue;
                }

                let color = if rng.next_unit() <= self.mutation {
                    palette.pick(rng)
                } else {
                    let _ = rng.next_word();
                    parent_color
                };
                grid.set(neighbor, Cell::colored(color, cell.was_occupied()));
                self.frontier.push_back(neighbor);
            }

            if !finished {
                self.frontier.push_back(index);
            }
        }

        trace!(pops, "frontier drained");
    }

    fn plant<R: RandomStream + ?Sized>(
        &mut self,
        grid: &mut PropagationGrid,
        palette: &Palette,
        rng: &mut R,
    ) {
        let bound = u32::try_from(grid.len()).unwrap_or(u32::MAX);
        for _ in 0..self.seeds {
            let index = rng.next_below(bound) as usize;
            let color = palette.pick(rng);
            // A seed landing on an already colored cell always leaves it Pending.
            let occupied = matches!(grid.cell(index), Cell::Unvisited { occupied: true });
            grid.set(index, Cell::colored(color, occupied));
            self.frontier.push_back(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splat_core::{Hsv, SeededStream};

    #[test]
    fn seeds_on_unoccupied_cells_stay_pending() {
        let palette = Palette::from_base(Hsv::new(0.0, 1.0, 1.0), Vec::new());
        let mut grid = OccupancyGrid::new(1, 1).into_propagation();
        let mut propagator = ColorPropagator::new(1, 1.0, 0.0);

        propagator.spread(&mut grid, &palette, &mut SeededStream::new(0));

        assert_eq!(grid.cell(0), Cell::Pending(palette.colors()[0]));
    }

    #[test]
    fn single_seed_on_occupied_cell_is_final() {
        let palette = Palette::from_base(Hsv::new(0.0, 1.0, 1.0), Vec::new());
        let mask = OccupancyGrid::from_cells(1, 1, vec![true]).expect("mask");
        let mut grid = mask.into_propagation();
        let mut propagator = ColorPropagator::new(1, 1.0, 0.0);

        propagator.spread(&mut grid, &palette, &mut SeededStream::new(0));

        assert_eq!(grid.cell(0), Cell::Final(palette.colors()[0]));
    }

    #[test]
    fn reseeded_cells_become_pending() {
        let palette = Palette::from_base(Hsv::new(0.0, 1.0, 1.0), Vec::new());
        let mask = OccupancyGrid::from_cells(1, 1, vec![true]).expect("mask");
        let mut grid = mask.clone().into_propagation();
        let mut propagator = ColorPropagator::new(2, 1.0, 0.0);

        propagator.spread(&mut grid, &palette, &mut SeededStream::new(0));

        assert_eq!(grid.cell(0), Cell::Pending(palette.colors()[0]));
        let pixels = propagator.colorize(mask, &palette, &mut SeededStream::new(0));
        assert_eq!(pixels.pixels(), &[0]);
    }
}
