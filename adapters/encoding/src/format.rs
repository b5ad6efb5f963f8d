use std::{fmt, str::FromStr};

use anyhow::{bail, Error};
use image::ImageFormat;

/// Image container a sprite is written in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossless PNG with alpha. Supports palette reduction.
    #[default]
    Png,
    /// GIF, quantised by the encoder.
    Gif,
    /// Baseline JPEG. Transparency is dropped.
    Jpeg,
    /// Uncompressed BMP with alpha.
    Bmp,
}

impl OutputFormat {
    /// File extension written after the output base name.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Jpeg => "jpg",
            Self::Bmp => "bmp",
        }
    }

    pub(crate) const fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Bmp => ImageFormat::Bmp,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Jpeg => "jpeg",
            Self::Bmp => "bmp",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            _ => bail!("unknown output format `{name}` (expected png, gif, jpeg or bmp)"),
        }
    }
}
