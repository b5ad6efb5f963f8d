use std::{collections::HashMap, io::Write};

use anyhow::{bail, Context, Result};
use splat_grid::{PixelGrid, TRANSPARENT};

/// A sprite reduced to palette indices. Index 0 is always transparent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    bits: u8,
    palette: Vec<u32>,
    indices: Vec<u8>,
}

impl IndexedImage {
    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Requested palette depth in bits.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Palette entries as `0xAARRGGBB`, in order of first appearance after
    /// the transparent entry.
    #[must_use]
    pub fn palette(&self) -> &[u32] {
        &self.palette
    }

    /// Row-major palette index of every pixel.
    #[must_use]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Smallest PNG bit depth that holds `bits`.
    #[must_use]
    pub const fn png_depth(&self) -> u8 {
        match self.bits {
            1 => 1,
            2 => 2,
            3 | 4 => 4,
            _ => 8,
        }
    }

    /// Rows packed most significant bits first, each padded to a whole
    /// byte.
    fn packed_rows(&self) -> Vec<u8> {
        let width = self.width as usize;
        if width == 0 {
            return Vec::new();
        }
        let depth = usize::from(self.png_depth());
        let per_byte = 8 / depth;
        let stride = width.div_ceil(per_byte);
        let mut data = vec![0_u8; stride * self.height as usize];
        for (y, row) in self.indices.chunks_exact(width).enumerate() {
            for (x, &index) in row.iter().enumerate() {
                let shift = 8 - depth * (x % per_byte + 1);
                data[y * stride + x / per_byte] |= index << shift;
            }
        }
        data
    }
}

/// Reduces `grid` to at most `2^bits` palette entries. Pixels that are not
/// fully opaque map to the transparent index 0.
pub fn palettize(grid: &PixelGrid, bits: u8) -> Result<IndexedImage> {
    if !(1..=8).contains(&bits) {
        bail!("palette depth must be between 1 and 8 bits, got {bits}");
    }
    let capacity = 1_usize << bits;
    let mut palette = vec![TRANSPARENT];
    let mut lookup = HashMap::from([(TRANSPARENT, 0_u8)]);
    let mut indices = Vec::with_capacity(grid.pixels().len());

    for &pixel in grid.pixels() {
        let pixel = if pixel >> 24 == 0xff {
            pixel
        } else {
            TRANSPARENT
        };
        let index = match lookup.get(&pixel) {
            Some(&index) => index,
            None => {
                if palette.len() == capacity {
                    bail!(
                        "sprite needs more than {capacity} palette entries, \
                         too many for {bits}-bit output"
                    );
                }
                // capacity <= 256, so every index fits in a byte.
                let index = palette.len() as u8;
                palette.push(pixel);
                let _ = lookup.insert(pixel, index);
                index
            }
        };
        indices.push(index);
    }

    Ok(IndexedImage {
        width: grid.width(),
        height: grid.height(),
        bits,
        palette,
        indices,
    })
}

/// Encodes `image` as an indexed PNG whose entry 0 is fully transparent.
pub fn write_indexed_png<W: Write>(image: &IndexedImage, writer: W) -> Result<()> {
    let depth = match image.png_depth() {
        1 => png::BitDepth::One,
        2 => png::BitDepth::Two,
        4 => png::BitDepth::Four,
        _ => png::BitDepth::Eight,
    };
    let palette: Vec<u8> = image
        .palette
        .iter()
        .flat_map(|entry| {
            let [_, red, green, blue] = entry.to_be_bytes();
            [red, green, blue]
        })
        .collect();

    let mut encoder = png::Encoder::new(writer, image.width, image.height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(depth);
    encoder.set_palette(palette);
    encoder.set_trns(vec![0_u8]);
    let mut writer = encoder
        .write_header()
        .context("failed to write indexed png header")?;
    writer
        .write_image_data(&image.packed_rows())
        .with_context(|| {
            format!(
                "failed to encode {}x{} sprite as {}-bit indexed png",
                image.width, image.height, image.bits
            )
        })?;
    writer.finish().context("failed to finish indexed png")
}
