#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Palette generation around a base HSV color.

use std::num::NonZeroU32;

use splat_core::{clamp, ConfigError, Hsv, Palette, RandomStream, Specs};

/// Spread of the Gaussian jitter applied to palette variants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorSpread {
    /// Standard deviation of the hue offset.
    pub hue: f32,
    /// Standard deviation of the saturation offset.
    pub saturation: f32,
    /// Standard deviation of the value offset.
    pub value: f32,
}

/// Builds palettes of one exact base color followed by jittered variants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteGenerator {
    base: Hsv,
    spread: ColorSpread,
    colors: NonZeroU32,
}

impl PaletteGenerator {
    /// Creates a generator producing `colors` entries around `base`.
    #[must_use]
    pub const fn new(base: Hsv, spread: ColorSpread, colors: NonZeroU32) -> Self {
        Self {
            base,
            spread,
            colors,
        }
    }

    /// Creates a generator from the color fields of `specs`.
    pub fn from_specs(specs: &Specs) -> Result<Self, ConfigError> {
        let colors = NonZeroU32::new(specs.colors).ok_or(ConfigError::EmptyPalette)?;
        Ok(Self::new(
            specs.base_color(),
            ColorSpread {
                hue: specs.hue_sigma,
                saturation: specs.saturation_sigma,
                value: specs.value_sigma,
            },
            colors,
        ))
    }

    /// Generates a palette.
    ///
    /// Entry 0 is the base color and draws nothing. Each further entry draws
    /// three Gaussians in order: hue, saturation, value. Saturation and
    /// value are clamped to `[0, 1]`; hue wraps into `[0, 1)`.
    pub fn generate<R: RandomStream + ?Sized>(&self, rng: &mut R) -> Palette {
        let mut variants = Vec::with_capacity(self.colors.get() as usize - 1);
        for _ in 1..self.colors.get() {
            let hue = rng.next_gaussian() * self.spread.hue + self.base.hue;
            let saturation = rng.next_gaussian() * self.spread.saturation + self.base.saturation;
            let value = rng.next_gaussian() * self.spread.value + self.base.value;
            variants.push(
                Hsv::new(hue, clamp(saturation, 0.0, 1.0), clamp(value, 0.0, 1.0)).wrapped(),
            );
        }

        Palette::from_base(self.base.wrapped(), variants)
    }
}
