//! Color conversion and Perlin-style shaping functions.

/// Natural logarithm of one half, the denominator of [`bias`].
const LOG_HALF: f32 = -std::f32::consts::LN_2;

/// Perlin bias: `t ^ (ln(b) / ln(0.5))`.
///
/// Equals `t` at `b = 0.5`; smaller `b` pulls the curve down, larger `b`
/// pushes it up. Defined for `t` and `b` in `(0, 1]`.
#[must_use]
pub fn bias(t: f32, b: f32) -> f32 {
    t.powf(b.ln() / LOG_HALF)
}

/// Perlin gain: an S-curve built from two mirrored [`bias`] halves.
///
/// Continuous and monotonic on `[0, 1]`, passing through `(0.5, 0.5)`.
#[must_use]
pub fn gain(t: f32, g: f32) -> f32 {
    if t <= 0.5 {
        0.5 * bias(t * 2.0, 1.0 - g)
    } else {
        1.0 - 0.5 * bias(2.0 - t * 2.0, 1.0 - g)
    }
}

/// Linear interpolation from `a` to `b` by `z`.
#[must_use]
pub fn lerp(a: f32, b: f32, z: f32) -> f32 {
    a + (b - a) * z
}

/// Clamps `x` into `[min, max]`.
///
/// Unlike [`f32::clamp`] this never panics; a NaN `x` yields `min`.
#[must_use]
pub fn clamp(x: f32, min: f32, max: f32) -> f32 {
    x.max(min).min(max)
}

/// Reduces `x` into `[0, 1)`, wrapping negatives around.
#[must_use]
pub fn wrap_unit(x: f32) -> f32 {
    ((x % 1.0) + 1.0) % 1.0
}

/// Converts hue, saturation, value and alpha to a packed `0xAARRGGBB`.
///
/// Hue wraps, so `-0.25` and `0.75` name the same color. Channels are
/// truncated, not rounded, to bytes.
#[must_use]
pub fn hsva_to_argb(hue: f32, saturation: f32, value: f32, alpha: f32) -> u32 {
    let scaled = wrap_unit(hue) * 6.0;
    let sextant = scaled as u32;
    let mut fraction = scaled % 1.0;
    if sextant & 1 == 1 {
        fraction = 1.0 - fraction;
    }

    let low = value * (1.0 - saturation);
    let medium = low + value * saturation * fraction;
    let (red, green, blue) = match sextant {
        0 => (value, medium, low),
        1 => (medium, value, low),
        2 => (low, value, medium),
        3 => (low, medium, value),
        4 => (medium, low, value),
        _ => (value, low, medium),
    };

    channel(alpha) << 24 | channel(red) << 16 | channel(green) << 8 | channel(blue)
}

/// Converts hue, saturation and value to an opaque `0xFFRRGGBB`.
#[must_use]
pub fn hsv_to_argb(hue: f32, saturation: f32, value: f32) -> u32 {
    hsva_to_argb(hue, saturation, value, 1.0)
}

fn channel(intensity: f32) -> u32 {
    ((intensity * 255.0) as u32).min(0xff)
}
