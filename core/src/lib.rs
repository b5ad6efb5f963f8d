#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Splat sprite generator.
//!
//! This crate defines the validated parameter record ([`Specs`]) consumed by
//! every pipeline stage, the color types the stages exchange, the shaping
//! math used by more than one stage, and the [`RandomStream`] capability the
//! stages draw from. Systems never own their randomness: the pipeline hands
//! them a stream by mutable reference, and the order in which they draw from
//! it is part of their public behaviour.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod color;
pub mod random;

pub use color::{bias, clamp, gain, hsv_to_argb, hsva_to_argb, lerp, wrap_unit};
pub use random::{RandomStream, SeededStream};

/// Name of the scaler used when the parameter record does not pick one.
pub const DEFAULT_SCALER: &str = "NearestNeighbor";

/// Number of neighbour-count probabilities consumed by the cellular automaton.
pub const CA_PROBABILITY_COUNT: usize = 4;

/// Validated numeric configuration for one sprite generation.
///
/// Every field has a default, so partial configuration files deserialize
/// into a complete record. [`Specs::validate`] must succeed before the
/// record is handed to the pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Specs {
    /// Number of columns in the generated grid.
    pub width: u32,
    /// Number of rows in the generated grid.
    pub height: u32,
    /// Number of columns in the final pixel buffer.
    pub target_width: u32,
    /// Number of rows in the final pixel buffer.
    pub target_height: u32,
    /// Number of palette entries; entry 0 is the exact base color.
    pub colors: u32,
    /// Number of propagation seeds planted on the grid.
    pub seeds: u32,
    /// Registry name of the integer-ratio scaler.
    pub scaler: String,
    /// Seed of the random stream driving the whole pipeline.
    pub seed: u64,
    /// Fill probability at the grid edges.
    pub min_density: f32,
    /// Fill probability at the grid centre.
    pub max_density: f32,
    /// Perlin bias applied to the radial distance.
    pub bias: f32,
    /// Perlin gain applied after the bias.
    pub gain: f32,
    /// Probability of mirroring the left half onto the right half.
    pub mirror_x: f32,
    /// Probability of mirroring the top half onto the bottom half.
    pub mirror_y: f32,
    /// Probability of mirroring across the main diagonal (square grids only).
    pub mirror_positive: f32,
    /// Probability of mirroring across the anti-diagonal (square grids only).
    pub mirror_negative: f32,
    /// Probability that color spreads to an unvisited neighbour on each attempt.
    pub variance: f32,
    /// Probability that spreading color mutates into a fresh palette color.
    pub mutation: f32,
    /// Base hue in `[0, 1)`.
    pub hue: f32,
    /// Base saturation in `[0, 1]`.
    pub saturation: f32,
    /// Base value in `[0, 1]`.
    pub value: f32,
    /// Standard deviation of palette hue jitter.
    pub hue_sigma: f32,
    /// Standard deviation of palette saturation jitter.
    pub saturation_sigma: f32,
    /// Standard deviation of palette value jitter.
    pub value_sigma: f32,
    /// Automaton probabilities for neighbour counts 0, 1, 7 and 8.
    ///
    /// Counts 0 and 1 clear the cell (despeckle, despur); counts 7 and 8
    /// fill it (relax, devoid).
    pub ca_probabilities: [f32; CA_PROBABILITY_COUNT],
    /// Number of synchronous automaton generations.
    pub ca_generations: u32,
    /// Whether a batch reseeds the stream between images.
    pub random_seed: bool,
    /// Whether a batch re-rolls the base color between images.
    pub random_color: bool,
}

impl Default for Specs {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            target_width: 16,
            target_height: 16,
            colors: 4,
            seeds: 4,
            scaler: DEFAULT_SCALER.to_owned(),
            seed: 0,
            min_density: 0.0,
            max_density: 1.0,
            bias: 0.5,
            gain: 0.5,
            mirror_x: 0.5,
            mirror_y: 0.5,
            mirror_positive: 0.5,
            mirror_negative: 0.5,
            variance: 0.5,
            mutation: 0.5,
            hue: 0.0,
            saturation: 0.0,
            value: 0.0,
            hue_sigma: 1.0 / 6.0 / 2.0,
            saturation_sigma: 0.1,
            value_sigma: 0.1,
            ca_probabilities: [0.9, 0.5, 0.0, 0.0],
            ca_generations: 1,
            random_seed: true,
            random_color: true,
        }
    }
}

impl Specs {
    /// Checks every precondition the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.target_width == 0 || self.target_height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.target_width,
                height: self.target_height,
            });
        }
        if self.target_width < self.width || self.target_height < self.height {
            return Err(ConfigError::Downscale {
                width: self.width,
                height: self.height,
                target_width: self.target_width,
                target_height: self.target_height,
            });
        }
        if self.colors == 0 {
            return Err(ConfigError::EmptyPalette);
        }

        let probabilities = [
            ("min_density", self.min_density),
            ("max_density", self.max_density),
            ("mirror_x", self.mirror_x),
            ("mirror_y", self.mirror_y),
            ("mirror_positive", self.mirror_positive),
            ("mirror_negative", self.mirror_negative),
            ("variance", self.variance),
            ("mutation", self.mutation),
            ("saturation", self.saturation),
            ("value", self.value),
            ("despeckle", self.ca_probabilities[0]),
            ("despur", self.ca_probabilities[1]),
            ("relax", self.ca_probabilities[2]),
            ("devoid", self.ca_probabilities[3]),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { field, value });
            }
        }

        for (field, value) in [("bias", self.bias), ("gain", self.gain)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::ShapingOutOfRange { field, value });
            }
        }

        if !(0.0..1.0).contains(&self.hue) {
            return Err(ConfigError::HueOutOfRange(self.hue));
        }

        let sigmas = [
            ("hue_sigma", self.hue_sigma),
            ("saturation_sigma", self.saturation_sigma),
            ("value_sigma", self.value_sigma),
        ];
        for (field, value) in sigmas {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSigma { field, value });
            }
        }

        Ok(())
    }

    /// Number of cells in the generated grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Base color of the palette as HSV.
    #[must_use]
    pub const fn base_color(&self) -> Hsv {
        Hsv::new(self.hue, self.saturation, self.value)
    }

    /// Re-rolls (almost) every parameter from the provided stream.
    ///
    /// Dimensions, scaler, CA generation count and the batch flags are kept.
    pub fn randomize<R: RandomStream + ?Sized>(&mut self, rng: &mut R) {
        self.colors = 1 + rng.next_below(8);
        self.seeds = 1 + rng.next_below(self.width.max(1));
        self.seed = rng.next_seed();
        self.min_density = rng.next_unit();
        self.max_density = rng.next_unit();
        self.bias = open_unit(rng);
        self.gain = open_unit(rng);
        self.mirror_x = rng.next_unit();
        self.mirror_y = rng.next_unit();
        self.mirror_positive = rng.next_unit();
        self.mirror_negative = rng.next_unit();
        self.hue = rng.next_unit();
        self.saturation = (1.0 - rng.next_gaussian().abs() * 0.25).max(0.0);
        self.value = (1.0 - rng.next_gaussian().abs() * 0.33).max(0.0);
        self.variance = 0.1 + 0.9 * rng.next_unit();
        self.mutation = rng.next_unit() * 0.5;
        for probability in &mut self.ca_probabilities {
            *probability = rng.next_unit();
        }
    }

    /// Re-rolls the base color from three uniform draws.
    pub fn randomize_color<R: RandomStream + ?Sized>(&mut self, rng: &mut R) {
        self.hue = rng.next_unit();
        self.saturation = rng.next_unit();
        self.value = rng.next_unit();
    }
}

fn open_unit<R: RandomStream + ?Sized>(rng: &mut R) -> f32 {
    rng.next_unit().max(f32::EPSILON)
}

/// Errors raised when a parameter record cannot drive a generation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A grid or target dimension was zero.
    #[error("dimensions {width}x{height} must both be positive")]
    InvalidDimensions {
        /// Requested column count.
        width: u32,
        /// Requested row count.
        height: u32,
    },
    /// The target resolution is smaller than the grid on some axis.
    #[error(
        "target {target_width}x{target_height} is smaller than grid {width}x{height}; \
         only upscaling is supported"
    )]
    Downscale {
        /// Grid column count.
        width: u32,
        /// Grid row count.
        height: u32,
        /// Target column count.
        target_width: u32,
        /// Target row count.
        target_height: u32,
    },
    /// The palette was asked to hold no colors.
    #[error("palette must contain at least one color")]
    EmptyPalette,
    /// A probability-like field fell outside `[0, 1]`.
    #[error("{field} must lie in [0, 1], got {value}")]
    OutOfUnitRange {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// Bias or gain fell outside `(0, 1)`.
    #[error("{field} must lie in (0, 1), got {value}")]
    ShapingOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// The base hue fell outside `[0, 1)`.
    #[error("hue must lie in [0, 1), got {0}")]
    HueOutOfRange(f32),
    /// A color spread was negative or not finite.
    #[error("{field} must be a finite non-negative number, got {value}")]
    InvalidSigma {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
}

/// Opaque color expressed as byte RGB components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Extracts the RGB bytes of a packed `0xAARRGGBB` value, ignoring alpha.
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            red: (argb >> 16) as u8,
            green: (argb >> 8) as u8,
            blue: argb as u8,
        }
    }

    /// Packs the color as a fully opaque `0xFFRRGGBB` value.
    #[must_use]
    pub const fn to_argb(self) -> u32 {
        0xff00_0000 | self.to_packed_rgb()
    }

    /// Packs the color as `0x00RRGGBB`.
    #[must_use]
    pub const fn to_packed_rgb(self) -> u32 {
        (self.red as u32) << 16 | (self.green as u32) << 8 | self.blue as u32
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Color expressed as hue, saturation and value, each nominally in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsv {
    /// Hue; values outside `[0, 1)` wrap around.
    pub hue: f32,
    /// Saturation in `[0, 1]`.
    pub saturation: f32,
    /// Value in `[0, 1]`.
    pub value: f32,
}

impl Hsv {
    /// Creates a new HSV triple.
    #[must_use]
    pub const fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Returns the same color with its hue reduced to `[0, 1)`.
    #[must_use]
    pub fn wrapped(self) -> Self {
        Self {
            hue: wrap_unit(self.hue),
            ..self
        }
    }

    /// Converts the color to an opaque [`Rgb`].
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        Rgb::from_argb(hsv_to_argb(self.hue, self.saturation, self.value))
    }
}

/// Ordered, non-empty list of colors available to the propagation stage.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    entries: Vec<Hsv>,
    colors: Vec<Rgb>,
}

impl Palette {
    /// Builds a palette from HSV entries; entry 0 is the base color.
    pub fn new(entries: Vec<Hsv>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        let colors = entries.iter().map(|entry| entry.to_rgb()).collect();
        Ok(Self { entries, colors })
    }

    /// Builds a palette whose entry 0 is `base`, followed by `variants`.
    #[must_use]
    pub fn from_base(base: Hsv, variants: Vec<Hsv>) -> Self {
        let mut entries = Vec::with_capacity(variants.len() + 1);
        entries.push(base);
        entries.extend(variants);
        let colors = entries.iter().map(|entry| entry.to_rgb()).collect();
        Self { entries, colors }
    }

    /// Number of colors in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Palettes are never empty; provided for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// HSV entries in palette order.
    #[must_use]
    pub fn entries(&self) -> &[Hsv] {
        &self.entries
    }

    /// RGB colors in palette order.
    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Draws one bounded integer and returns the color at that index.
    pub fn pick<R: RandomStream + ?Sized>(&self, rng: &mut R) -> Rgb {
        let bound = u32::try_from(self.colors.len()).unwrap_or(u32::MAX);
        let index = rng.next_below(bound) as usize;
        self.colors[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_specs_are_valid() {
        assert_eq!(Specs::default().validate(), Ok(()));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let specs = Specs {
            width: 0,
            ..Specs::default()
        };
        assert_eq!(
            specs.validate(),
            Err(ConfigError::InvalidDimensions {
                width: 0,
                height: 16
            })
        );
    }

    #[test]
    fn downscaling_is_rejected() {
        let specs = Specs {
            width: 32,
            target_width: 16,
            ..Specs::default()
        };
        assert!(matches!(
            specs.validate(),
            Err(ConfigError::Downscale { .. })
        ));
    }

    #[test]
    fn probabilities_outside_unit_range_are_rejected() {
        let specs = Specs {
            mutation: 1.5,
            ..Specs::default()
        };
        assert_eq!(
            specs.validate(),
            Err(ConfigError::OutOfUnitRange {
                field: "mutation",
                value: 1.5
            })
        );
    }

    #[test]
    fn shaping_parameters_must_be_open_unit() {
        let specs = Specs {
            gain: 1.0,
            ..Specs::default()
        };
        assert!(matches!(
            specs.validate(),
            Err(ConfigError::ShapingOutOfRange { field: "gain", .. })
        ));
    }

    #[test]
    fn randomized_specs_remain_valid() {
        let mut rng = SeededStream::new(0x5eed);
        for _ in 0..64 {
            let mut specs = Specs::default();
            specs.randomize(&mut rng);
            assert_eq!(specs.validate(), Ok(()), "{specs:?}");
            assert!((1..=8).contains(&specs.colors));
            assert!((1..=specs.width).contains(&specs.seeds));
        }
    }

    #[test]
    fn partial_toml_fills_remaining_fields_with_defaults() {
        let specs: Specs = toml::from_str(
            "width = 8\nheight = 8\nscaler = \"Scale2x\"\n\
             ca_probabilities = [0.1, 0.2, 0.3, 0.4]\n",
        )
        .expect("config parses");

        assert_eq!(specs.width, 8);
        assert_eq!(specs.scaler, "Scale2x");
        assert_eq!(specs.ca_probabilities, [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(specs.colors, Specs::default().colors);
        assert_eq!(specs.target_width, 16);
    }

    #[test]
    fn unknown_toml_fields_are_rejected() {
        let parsed: Result<Specs, _> = toml::from_str("widht = 8\n");
        assert!(parsed.is_err(), "misspelt field must not be ignored");
    }

    #[test]
    fn rgb_packs_as_opaque_argb() {
        let color = Rgb::from_rgb(0x12, 0x34, 0x56);
        assert_eq!(color.to_argb(), 0xff12_3456);
        assert_eq!(Rgb::from_argb(0x0012_3456), color);
    }

    #[test]
    fn palette_requires_entries() {
        assert_eq!(Palette::new(Vec::new()), Err(ConfigError::EmptyPalette));
    }

    #[test]
    fn palette_pick_stays_in_bounds() {
        let palette = Palette::new(vec![
            Hsv::new(0.0, 1.0, 1.0),
            Hsv::new(1.0 / 3.0, 1.0, 1.0),
        ])
        .expect("palette builds");
        let mut rng = SeededStream::new(9);
        for _ in 0..100 {
            assert!(palette.colors().contains(&palette.pick(&mut rng)));
        }
    }
}
