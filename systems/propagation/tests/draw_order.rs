use std::collections::VecDeque;

use splat_core::{Hsv, Palette, RandomStream};
use splat_grid::{Cell, OccupancyGrid};
use splat_system_propagation::ColorPropagator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Draw {
    Unit,
    Gaussian,
    Below(u32),
    Word,
    Seed,
}

/// Stream replaying scripted values and recording every draw it serves.
#[derive(Debug, Default)]
struct ScriptedStream {
    units: VecDeque<f32>,
    fallback_unit: f32,
    below: VecDeque<u32>,
    draws: Vec<Draw>,
}

impl ScriptedStream {
    fn new(units: &[f32], fallback_unit: f32, below: &[u32]) -> Self {
        Self {
            units: units.iter().copied().collect(),
            fallback_unit,
            below: below.iter().copied().collect(),
            draws: Vec::new(),
        }
    }
}

impl RandomStream for ScriptedStream {
    fn next_unit(&mut self) -> f32 {
        self.draws.push(Draw::Unit);
        self.units.pop_front().unwrap_or(self.fallback_unit)
    }

    fn next_gaussian(&mut self) -> f32 {
        self.draws.push(Draw::Gaussian);
        0.0
    }

    fn next_below(&mut self, bound: u32) -> u32 {
        self.draws.push(Draw::Below(bound));
        self.below.pop_front().unwrap_or(0)
    }

    fn next_word(&mut self) -> u32 {
        self.draws.push(Draw::Word);
        0
    }

    fn next_seed(&mut self) -> u64 {
        self.draws.push(Draw::Seed);
        0
    }

    fn reseed(&mut self, _seed: u64) {}
}

fn palette(colors: usize) -> Palette {
    let variants = (1..colors)
        .map(|index| Hsv::new(index as f32 / colors as f32, 1.0, 1.0))
        .collect();
    Palette::from_base(Hsv::new(0.0, 1.0, 1.0), variants)
}

#[test]
fn copying_spread_discards_one_word() {
    let palette = palette(1);
    let mut grid = OccupancyGrid::from_cells(2, 1, vec![true, true])
        .expect("mask")
        .into_propagation();
    let mut stream = ScriptedStream::new(&[], 0.5, &[]);

    ColorPropagator::new(1, 1.0, 0.0).spread(&mut grid, &palette, &mut stream);

    assert_eq!(
        stream.draws,
        [
            Draw::Below(2),
            Draw::Below(1),
            Draw::Unit,
            Draw::Unit,
            Draw::Word,
        ]
    );
    let red = palette.colors()[0];
    assert_eq!(grid.cells(), &[Cell::Final(red), Cell::Final(red)]);
}

#[test]
fn mutating_spread_draws_a_palette_index() {
    let palette = palette(3);
    let mut grid = OccupancyGrid::from_cells(2, 1, vec![true, true])
        .expect("mask")
        .into_propagation();
    let mut stream = ScriptedStream::new(&[], 0.5, &[1, 0, 2]);

    ColorPropagator::new(1, 1.0, 1.0).spread(&mut grid, &palette, &mut stream);

    assert_eq!(
        stream.draws,
        [
            Draw::Below(2),
            Draw::Below(3),
            Draw::Unit,
            Draw::Unit,
            Draw::Below(3),
        ]
    );
    let colors = palette.colors();
    assert_eq!(grid.cells(), &[Cell::Final(colors[2]), Cell::Final(colors[0])]);
}

#[test]
fn failed_variance_requeues_the_parent() {
    let palette = palette(1);
    let mut grid = OccupancyGrid::from_cells(3, 1, vec![true; 3])
        .expect("mask")
        .into_propagation();
    // First attempt on the neighbour fails, the retry passes without mutating.
    let units = [0.9, 0.1, 0.9, 0.1, 0.9];
    let mut stream = ScriptedStream::new(&units, 0.5, &[0]);

    ColorPropagator::new(1, 0.5, 0.0).spread(&mut grid, &palette, &mut stream);

    assert_eq!(
        stream.draws,
        [
            Draw::Below(3),
            Draw::Below(1),
            Draw::Unit,
            Draw::Unit,
            Draw::Unit,
            Draw::Word,
            Draw::Unit,
            Draw::Unit,
            Draw::Word,
        ]
    );
    let red = palette.colors()[0];
    assert_eq!(grid.cells(), &[Cell::Final(red); 3]);
}

#[test]
fn colored_neighbours_cost_no_draws() {
    let palette = palette(1);
    let mut grid = OccupancyGrid::from_cells(2, 2, vec![true; 4])
        .expect("mask")
        .into_propagation();
    let mut stream = ScriptedStream::new(&[], 0.0, &[0]);

    ColorPropagator::new(1, 1.0, 1.0).spread(&mut grid, &palette, &mut stream);

    // The seed colors its three neighbours; their own pops find nothing left.
    let growth = [Draw::Unit, Draw::Unit, Draw::Below(1)];
    let mut expected = vec![Draw::Below(4), Draw::Below(1)];
    for _ in 0..3 {
        expected.extend(growth);
    }
    assert_eq!(stream.draws, expected);
    assert!(grid.cells().iter().all(|cell| matches!(cell, Cell::Final(_))));
}
