#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Image encoding of generated sprites and sprite sheets.

mod format;
mod indexed;

use std::{
    fs,
    io::{Cursor, Write},
    path::Path,
};

use anyhow::{bail, Context, Result};
use image::{
    codecs::png::PngEncoder, DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage,
};
use splat_grid::PixelGrid;

pub use crate::{
    format::OutputFormat,
    indexed::{palettize, write_indexed_png, IndexedImage},
};

/// How a sprite is written: the container format and an optional palette
/// depth for indexed PNG output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Encoding {
    /// Output container.
    pub format: OutputFormat,
    /// Palette depth in bits (1 to 8). PNG only.
    pub bits: Option<u8>,
}

/// Unpacks `0xAARRGGBB` pixels into an RGBA byte buffer.
#[must_use]
pub fn to_rgba(grid: &PixelGrid) -> Vec<u8> {
    grid.pixels()
        .iter()
        .flat_map(|pixel| {
            let [alpha, red, green, blue] = pixel.to_be_bytes();
            [red, green, blue, alpha]
        })
        .collect()
}

/// Encodes `grid` as an RGBA PNG into `writer`.
pub fn write_png<W: Write>(grid: &PixelGrid, writer: W) -> Result<()> {
    PngEncoder::new(writer)
        .write_image(
            &to_rgba(grid),
            grid.width(),
            grid.height(),
            ExtendedColorType::Rgba8,
        )
        .with_context(|| {
            format!(
                "failed to encode {}x{} sprite as png",
                grid.width(),
                grid.height()
            )
        })
}

/// Encodes `grid` into an in-memory image as described by `encoding`.
pub fn encode(grid: &PixelGrid, encoding: Encoding) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match (encoding.format, encoding.bits) {
        (OutputFormat::Png, None) => write_png(grid, &mut bytes)?,
        (OutputFormat::Png, Some(bits)) => {
            write_indexed_png(&palettize(grid, bits)?, &mut bytes)?;
        }
        (format, Some(_)) => bail!("palette reduction needs png output, not {format}"),
        (format, None) => {
            let image = RgbaImage::from_raw(grid.width(), grid.height(), to_rgba(grid))
                .context("pixel buffer does not match the sprite dimensions")?;
            let mut image = DynamicImage::ImageRgba8(image);
            if format == OutputFormat::Jpeg {
                image = DynamicImage::ImageRgb8(image.to_rgb8());
            }
            image
                .write_to(&mut Cursor::new(&mut bytes), format.image_format())
                .with_context(|| {
                    format!(
                        "failed to encode {}x{} sprite as {format}",
                        grid.width(),
                        grid.height()
                    )
                })?;
        }
    }
    Ok(bytes)
}

/// Encodes `grid` into a file at `path`, replacing any existing file.
pub fn save(grid: &PixelGrid, path: impl AsRef<Path>, encoding: Encoding) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode(grid, encoding)?;
    fs::write(path, bytes)
        .with_context(|| format!("failed to write image file at {}", path.display()))
}

/// Number of columns used for a sheet of `count` sprites: the smallest
/// `c` with `c * c >= count`.
#[must_use]
pub fn sheet_columns(count: usize) -> usize {
    let mut columns = 0;
    while columns * columns < count {
        columns += 1;
    }
    columns
}

/// Lays equally sized sprites out row-major on one sheet of
/// [`sheet_columns`] columns. Unused trailing slots stay transparent.
pub fn compose_sheet(sprites: &[PixelGrid]) -> Result<PixelGrid> {
    let Some(first) = sprites.first() else {
        bail!("cannot compose a sheet without sprites");
    };
    let (width, height) = (first.width(), first.height());
    if let Some(index) = sprites
        .iter()
        .position(|sprite| sprite.width() != width || sprite.height() != height)
    {
        bail!(
            "sprite {index} is {}x{} but the sheet holds {width}x{height} sprites",
            sprites[index].width(),
            sprites[index].height()
        );
    }

    let columns = sheet_columns(sprites.len());
    let rows = sprites.len().div_ceil(columns);
    let sheet_width = u32::try_from(columns)
        .ok()
        .and_then(|columns| columns.checked_mul(width))
        .context("sprite sheet is too wide")?;
    let sheet_height = u32::try_from(rows)
        .ok()
        .and_then(|rows| rows.checked_mul(height))
        .context("sprite sheet is too tall")?;

    let mut sheet = PixelGrid::new(sheet_width, sheet_height);
    let stride = sheet_width as usize;
    let sprite_width = width as usize;
    let pixels = sheet.pixels_mut();
    for (index, sprite) in sprites.iter().enumerate() {
        let left = (index % columns) * sprite_width;
        let top = (index / columns) * height as usize;
        for y in 0..height {
            let start = (top + y as usize) * stride + left;
            pixels[start..start + sprite_width].copy_from_slice(sprite.row(y));
        }
    }
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_columns_round_up_to_square() {
        let columns: Vec<usize> = [1, 2, 4, 5, 9, 10].into_iter().map(sheet_columns).collect();
        assert_eq!(columns, vec![1, 2, 2, 3, 3, 4]);
    }

    #[test]
    fn rgba_reorders_channels() {
        let grid = PixelGrid::from_pixels(2, 1, vec![0xff11_2233, 0]).expect("grid");
        assert_eq!(to_rgba(&grid), vec![0x11, 0x22, 0x33, 0xff, 0, 0, 0, 0]);
    }
}
