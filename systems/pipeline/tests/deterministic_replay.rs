use std::{
    collections::{hash_map::DefaultHasher, VecDeque},
    hash::{Hash, Hasher},
};

use splat_core::{RandomStream, Specs};
use splat_system_pipeline::{BatchRefresh, SpriteGenerator};
use splat_system_scaling::ScalerRegistry;

#[test]
fn deterministic_replay_produces_identical_batches() {
    let first = replay(scripted_specs());
    let second = replay(scripted_specs());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.len(), 6);
}

#[test]
fn replay_differs_when_seed_changes() {
    let mut specs = scripted_specs();
    let baseline = replay(specs.clone());
    specs.seed += 1;

    assert_ne!(baseline, replay(specs));
}

fn scripted_specs() -> Specs {
    Specs {
        width: 12,
        height: 12,
        target_width: 48,
        target_height: 48,
        scaler: "Scale2x".to_owned(),
        seed: 0x5eed,
        ..Specs::default()
    }
}

fn replay(specs: Specs) -> Vec<u64> {
    let registry = ScalerRegistry::builtin();
    let mut generator = SpriteGenerator::new(specs, &registry).expect("valid specs");
    let mut refresh = BatchRefresh::new(99);

    (0..6)
        .map(|_| {
            let pixels = generator.generate();
            refresh.refresh(&mut generator).expect("refreshed specs");
            fingerprint(&pixels)
        })
        .collect()
}

fn fingerprint<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

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
    gaussians: VecDeque<f32>,
    below: VecDeque<u32>,
    draws: Vec<Draw>,
}

impl RandomStream for ScriptedStream {
    fn next_unit(&mut self) -> f32 {
        self.draws.push(Draw::Unit);
        self.units.pop_front().unwrap_or(0.0)
    }

    fn next_gaussian(&mut self) -> f32 {
        self.draws.push(Draw::Gaussian);
        self.gaussians.pop_front().unwrap_or(0.0)
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

fn golden_specs() -> Specs {
    Specs {
        width: 3,
        height: 3,
        target_width: 6,
        target_height: 6,
        colors: 2,
        seeds: 1,
        hue: 0.0,
        saturation: 1.0,
        value: 1.0,
        hue_sigma: 1.0,
        saturation_sigma: 0.0,
        value_sigma: 0.0,
        min_density: 0.5,
        max_density: 0.5,
        ca_probabilities: [0.0; 4],
        ca_generations: 1,
        variance: 0.5,
        mutation: 0.5,
        mirror_x: 0.5,
        mirror_y: 0.5,
        mirror_positive: 0.5,
        mirror_negative: 0.5,
        ..Specs::default()
    }
}

#[test]
fn scripted_stream_replays_golden_sprite() {
    #[rustfmt::skip]
    let units = [
        // mirror flags: only X passes
        0.0, 0.75, 0.75, 0.75,
        // density: the top-left 2x2 block is occupied
        0.25, 0.25, 0.75,
        0.25, 0.25, 0.75,
        0.75, 0.75, 0.75,
        // automaton: zero probabilities never flip
        0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5,
        // first pop of the seed: below mutates, right fails, diagonal copies
        0.25, 0.25, 0.75, 0.25, 0.75,
        // pop of the mutated cell: up is colored, right copies cyan
        0.75, 0.25, 0.75, 0.75,
    ];
    let mut stream = ScriptedStream {
        units: units.into_iter().collect(),
        gaussians: [0.5, 0.0, 0.0].into_iter().collect(),
        below: [0, 0, 1].into_iter().collect(),
        ..ScriptedStream::default()
    };

    let generation = SpriteGenerator::with_stream(
        golden_specs(),
        &ScalerRegistry::builtin(),
        &mut stream,
    )
    .expect("valid specs")
    .generate_stages();

    let mut expected_draws = vec![Draw::Unit; 4];
    expected_draws.extend([Draw::Gaussian; 3]);
    expected_draws.extend([Draw::Unit; 18]);
    expected_draws.extend([Draw::Below(9), Draw::Below(2)]);
    expected_draws.extend([
        Draw::Unit,
        Draw::Unit,
        Draw::Below(2),
        Draw::Unit,
        Draw::Unit,
        Draw::Unit,
        Draw::Word,
    ]);
    expected_draws.extend([
        Draw::Unit,
        Draw::Unit,
        Draw::Unit,
        Draw::Word,
        Draw::Unit,
    ]);
    assert_eq!(&stream.draws[..expected_draws.len()], expected_draws.as_slice());

    assert!(generation.mirrors.x);
    assert!(!generation.mirrors.y);
    assert_eq!(
        generation.occupancy.cells(),
        &[true, true, false, true, true, false, false, false, false]
    );

    const R: u32 = 0xffff_0000;
    const C: u32 = 0xff00_ffff;
    const T: u32 = 0;
    #[rustfmt::skip]
    let expected = [
        R, R, C, C, R, R,
        R, R, C, C, R, R,
        C, C, R, R, C, C,
        C, C, R, R, C, C,
        T, T, T, T, T, T,
        T, T, T, T, T, T,
    ];
    assert_eq!(generation.pixels.pixels(), &expected);
}
