#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! End-to-end sprite generation.
//!
//! [`SpriteGenerator`] owns the random stream and runs every stage in a
//! fixed order: mirror flags, palette, density, automaton, propagation,
//! mirroring, scaling. The first four stages and propagation draw from the
//! stream; mirroring and scaling do not. Successive calls continue the same
//! stream, so a batch without reseeding still yields distinct sprites.

use splat_core::{ConfigError, Palette, RandomStream, SeededStream, Specs};
use splat_grid::{OccupancyGrid, PixelGrid};
use splat_system_automaton::CellularAutomaton;
use splat_system_density::DensityField;
use splat_system_palette::PaletteGenerator;
use splat_system_propagation::ColorPropagator;
use splat_system_scaling::{ScaleError, ScalerRegistry, ScalingOrchestrator};
use splat_system_symmetry::{MirrorFlags, MirrorProbabilities};
use thiserror::Error;
use tracing::{debug, debug_span};

/// Errors raised while preparing a generator.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GenerationError {
    /// The parameter record failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The requested scaler could not be resolved.
    #[error(transparent)]
    Scale(#[from] ScaleError),
}

/// Intermediate and final results of one generation.
#[derive(Clone, Debug, PartialEq)]
pub struct Generation {
    /// Mirrors chosen for the sprite.
    pub mirrors: MirrorFlags,
    /// Palette the sprite was colored from.
    pub palette: Palette,
    /// Occupancy mask after the automaton ran.
    pub occupancy: OccupancyGrid,
    /// Colored grid before mirroring and scaling.
    pub colored: PixelGrid,
    /// Final pixels at the target resolution.
    pub pixels: PixelGrid,
}

/// Deterministic sprite generator driven by a [`Specs`] record.
#[derive(Debug)]
pub struct SpriteGenerator<R = SeededStream> {
    specs: Specs,
    rng: R,
    mirrors: MirrorProbabilities,
    palette: PaletteGenerator,
    density: DensityField,
    automaton: CellularAutomaton,
    propagator: ColorPropagator,
    scaling: ScalingOrchestrator,
}

impl SpriteGenerator<SeededStream> {
    /// Validates `specs`, resolves its scaler in `registry`, and seeds a
    /// stream from `specs.seed`.
    pub fn new(specs: Specs, registry: &ScalerRegistry) -> Result<Self, GenerationError> {
        let rng = SeededStream::new(specs.seed);
        Self::with_stream(specs, registry, rng)
    }
}

impl<R: RandomStream> SpriteGenerator<R> {
    /// Like [`SpriteGenerator::new`] but drawing from the provided stream.
    pub fn with_stream(
        specs: Specs,
        registry: &ScalerRegistry,
        rng: R,
    ) -> Result<Self, GenerationError> {
        specs.validate()?;
        let scaling = ScalingOrchestrator::new(
            registry,
            &specs.scaler,
            specs.target_width,
            specs.target_height,
        )?;

        Ok(Self {
            mirrors: MirrorProbabilities::from_specs(&specs),
            palette: PaletteGenerator::from_specs(&specs)?,
            density: DensityField::from_specs(&specs),
            automaton: CellularAutomaton::from_specs(&specs),
            propagator: ColorPropagator::from_specs(&specs),
            scaling,
            specs,
            rng,
        })
    }

    /// Parameter record driving the generator.
    #[must_use]
    pub fn specs(&self) -> &Specs {
        &self.specs
    }

    /// Restarts the stream from `seed`; nothing drawn before carries over.
    pub fn reseed(&mut self, seed: u64) {
        self.specs.seed = seed;
        self.rng.reseed(seed);
    }

    /// Generates the next sprite at the target resolution.
    pub fn generate(&mut self) -> PixelGrid {
        self.generate_stages().pixels
    }

    /// Generates the next sprite and keeps every intermediate result.
    pub fn generate_stages(&mut self) -> Generation {
        let _span = debug_span!("generate", seed = self.specs.seed).entered();

        let mirrors = MirrorFlags::draw(self.mirrors, &mut self.rng);
        let palette = self.palette.generate(&mut self.rng);

        let mut occupancy = self
            .density
            .sample(self.specs.width, self.specs.height, &mut self.rng);
        debug!(occupied = occupancy.occupied_count(), "density sampled");
        self.automaton.refine(&mut occupancy, &mut self.rng);
        debug!(occupied = occupancy.occupied_count(), "occupancy refined");

        let colored = self
            .propagator
            .colorize(occupancy.clone(), &palette, &mut self.rng);
        debug!(visible = colored.visible_count(), "colors propagated");

        let mut mirrored = colored.clone();
        mirrors.apply(&mut mirrored);
        debug!(?mirrors, "mirrors applied");

        let pixels = self.scaling.apply(mirrored);

        Generation {
            mirrors,
            palette,
            occupancy,
            colored,
            pixels,
        }
    }

    fn rebuild_palette(&mut self) -> Result<(), ConfigError> {
        self.specs.validate()?;
        self.palette = PaletteGenerator::from_specs(&self.specs)?;
        Ok(())
    }
}

/// Re-randomises a generator between images of a batch.
///
/// Draws come from a stream separate from the generator's own, so the
/// sprites themselves stay reproducible from their seeds.
#[derive(Clone, Debug)]
pub struct BatchRefresh<R = SeededStream> {
    rng: R,
}

impl BatchRefresh<SeededStream> {
    /// Creates a refresher whose own stream starts at `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_stream(SeededStream::new(seed))
    }

    /// Creates a refresher seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_stream(SeededStream::from_entropy())
    }
}

impl<R: RandomStream> BatchRefresh<R> {
    /// Creates a refresher drawing from `rng`.
    #[must_use]
    pub fn with_stream(rng: R) -> Self {
        Self { rng }
    }

    /// Applies the batch flags of the generator's record: re-rolls the base
    /// color (three uniform draws) when `random_color` is set, then reseeds
    /// the generator when `random_seed` is set.
    pub fn refresh<G: RandomStream>(
        &mut self,
        generator: &mut SpriteGenerator<G>,
    ) -> Result<(), ConfigError> {
        if generator.specs.random_color {
            generator.specs.randomize_color(&mut self.rng);
            generator.rebuild_palette()?;
            debug!(
                hue = generator.specs.hue,
                saturation = generator.specs.saturation,
                value = generator.specs.value,
                "base color re-rolled"
            );
        }
        if generator.specs.random_seed {
            let seed = self.rng.next_seed();
            generator.reseed(seed);
            debug!(seed, "generator reseeded");
        }
        Ok(())
    }
}
