#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Integer-ratio upscaling of finished sprites.
//!
//! Scalers are looked up by name in a [`ScalerRegistry`]. The
//! [`ScalingOrchestrator`] applies one scaler repeatedly while the result
//! still fits inside the target, then lands exactly on the target with a
//! nearest-neighbour resize.

use std::{collections::BTreeMap, fmt};

use splat_grid::PixelGrid;
use thiserror::Error;
use tracing::{debug, warn};

pub mod scalers;

pub use scalers::{Eagle2x, Eagle3x, NearestNeighbor, Scale2x, Scale3x};

/// Upscaling transform multiplying both dimensions by a fixed integer.
pub trait Scaler: fmt::Debug {
    /// Magnification applied to each axis; at least 2.
    fn ratio(&self) -> u32;

    /// Produces a grid `ratio` times wider and taller than `grid`.
    fn scale(&self, grid: &PixelGrid) -> PixelGrid;
}

/// Constructor stored in a [`ScalerRegistry`].
pub type ScalerFactory = fn() -> Box<dyn Scaler>;

/// Errors raised while resolving a scaler.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScaleError {
    /// No scaler is registered under the requested name.
    #[error("unknown scaler `{name}`; available: {available}")]
    UnknownScaler {
        /// Requested name.
        name: String,
        /// Comma-separated registered names.
        available: String,
    },
    /// The scaler does not enlarge the grid.
    #[error("scaler `{name}` has ratio {ratio}; ratios below 2 cannot upscale")]
    InvalidRatio {
        /// Requested name.
        name: String,
        /// Ratio reported by the scaler.
        ratio: u32,
    },
}

/// Name-to-factory map of available scalers.
#[derive(Clone, Debug)]
pub struct ScalerRegistry {
    factories: BTreeMap<String, ScalerFactory>,
}

impl Default for ScalerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ScalerRegistry {
    /// Creates a registry without any scaler.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Creates a registry holding every built-in scaler.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("NearestNeighbor", || Box::new(NearestNeighbor) as Box<dyn Scaler>);
        registry.register("Scale2x", || Box::new(Scale2x) as Box<dyn Scaler>);
        registry.register("Scale3x", || Box::new(Scale3x) as Box<dyn Scaler>);
        registry.register("Eagle2x", || Box::new(Eagle2x) as Box<dyn Scaler>);
        registry.register("Eagle3x", || Box::new(Eagle3x) as Box<dyn Scaler>);
        registry
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, factory: ScalerFactory) {
        let _ = self.factories.insert(name.into(), factory);
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Instantiates the scaler registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<Box<dyn Scaler>, ScaleError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ScaleError::UnknownScaler {
                name: name.to_owned(),
                available: self.names().collect::<Vec<_>>().join(", "),
            })?;
        let scaler = factory();
        if scaler.ratio() < 2 {
            return Err(ScaleError::InvalidRatio {
                name: name.to_owned(),
                ratio: scaler.ratio(),
            });
        }
        Ok(scaler)
    }
}

/// Drives a scaler until a grid reaches its target resolution.
#[derive(Debug)]
pub struct ScalingOrchestrator {
    scaler: Box<dyn Scaler>,
    target_width: u32,
    target_height: u32,
}

impl ScalingOrchestrator {
    /// Resolves `name` in `registry` for the provided target resolution.
    pub fn new(
        registry: &ScalerRegistry,
        name: &str,
        target_width: u32,
        target_height: u32,
    ) -> Result<Self, ScaleError> {
        Ok(Self {
            scaler: registry.lookup(name)?,
            target_width,
            target_height,
        })
    }

    /// Target column count.
    #[must_use]
    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    /// Target row count.
    #[must_use]
    pub fn target_height(&self) -> u32 {
        self.target_height
    }

    /// Upscales `grid` to exactly the target resolution.
    ///
    /// The scaler runs while both scaled dimensions stay within the target;
    /// any remaining difference is closed with [`resize_nearest`]. A grid
    /// already at the target is returned unchanged.
    #[must_use]
    pub fn apply(&self, mut grid: PixelGrid) -> PixelGrid {
        let ratio = self.scaler.ratio();
        let mut steps = 0u32;

        while fits(grid.width(), ratio, self.target_width)
            && fits(grid.height(), ratio, self.target_height)
        {
            let scaled = self.scaler.scale(&grid);
            if scaled.width() != grid.width() * ratio || scaled.height() != grid.height() * ratio {
                warn!(
                    scaler = ?self.scaler,
                    width = scaled.width(),
                    height = scaled.height(),
                    "scaler broke its ratio contract; falling back to resize"
                );
                break;
            }
            grid = scaled;
            steps += 1;
        }

        debug!(
            steps,
            width = grid.width(),
            height = grid.height(),
            "integer scaling finished"
        );

        if grid.width() != self.target_width || grid.height() != self.target_height {
            grid = resize_nearest(&grid, self.target_width, self.target_height);
        }
        grid
    }
}

fn fits(extent: u32, ratio: u32, target: u32) -> bool {
    extent.checked_mul(ratio).is_some_and(|scaled| scaled <= target)
}

/// Resizes `grid` to an arbitrary resolution by nearest-neighbour sampling.
///
/// Target pixel `(x, y)` reads source pixel `(x * w / tw, y * h / th)`.
#[must_use]
pub fn resize_nearest(grid: &PixelGrid, target_width: u32, target_height: u32) -> PixelGrid {
    let mut resized = PixelGrid::new(target_width, target_height);
    if grid.width() == 0 || grid.height() == 0 {
        return resized;
    }

    for y in 0..target_height {
        let source_y = (u64::from(y) * u64::from(grid.height()) / u64::from(target_height)) as u32;
        for x in 0..target_width {
            let source_x =
                (u64::from(x) * u64::from(grid.width()) / u64::from(target_width)) as u32;
            resized.set_pixel(x, y, grid.pixel(source_x, source_y));
        }
    }
    resized
}
