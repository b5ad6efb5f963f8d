//! Command-line options and their translation into a parameter record.

use std::{fmt, fs, path::Path, path::PathBuf, str::FromStr};

use anyhow::{bail, Context, Result};
use clap::Parser;
use splat_core::{RandomStream, Specs};
use splat_encoding::{Encoding, OutputFormat};

/// Generate procedural pixel-art sprites.
///
/// Numeric options accept `X` to draw a random value in an option-specific
/// range.
#[derive(Debug, Parser)]
#[command(name = "splat", version)]
pub(crate) struct Args {
    /// TOML file supplying parameters; options given here override it.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Re-roll (almost) every parameter before applying options.
    #[arg(long)]
    pub(crate) randomize_all: bool,

    /// Width of the generated grid in cells.
    #[arg(short, long)]
    pub(crate) width: Option<u32>,

    /// Height of the generated grid in cells.
    #[arg(long)]
    pub(crate) height: Option<u32>,

    /// Width of the output image; defaults to the grid width.
    #[arg(long)]
    pub(crate) scaled_width: Option<u32>,

    /// Height of the output image; defaults to the grid height.
    #[arg(long)]
    pub(crate) scaled_height: Option<u32>,

    /// Number of palette colors.
    #[arg(short, long)]
    pub(crate) colors: Option<Setting<u32>>,

    /// Number of cells where color propagation starts.
    #[arg(long)]
    pub(crate) seeds: Option<Setting<u32>>,

    /// Probability that color spreads to a neighbour.
    #[arg(long)]
    pub(crate) color_speed: Option<Setting<f32>>,

    /// Probability that spreading color mutates.
    #[arg(long)]
    pub(crate) mutation: Option<Setting<f32>>,

    /// Fill density at the grid edges.
    #[arg(long)]
    pub(crate) edge: Option<Setting<f32>>,

    /// Fill density at the grid centre.
    #[arg(long)]
    pub(crate) center: Option<Setting<f32>>,

    /// Probability of mirroring across the vertical axis.
    #[arg(long)]
    pub(crate) mirror_x: Option<Setting<f32>>,

    /// Probability of mirroring across the horizontal axis.
    #[arg(long)]
    pub(crate) mirror_y: Option<Setting<f32>>,

    /// Probability of mirroring across the main diagonal.
    #[arg(long)]
    pub(crate) mirror_positive: Option<Setting<f32>>,

    /// Probability of mirroring across the anti-diagonal.
    #[arg(long)]
    pub(crate) mirror_negative: Option<Setting<f32>>,

    /// Density bias parameter, strictly between 0 and 1.
    #[arg(long)]
    pub(crate) bias: Option<Setting<f32>>,

    /// Density gain parameter, strictly between 0 and 1.
    #[arg(long)]
    pub(crate) gain: Option<Setting<f32>>,

    /// Hue of the base color.
    #[arg(long)]
    pub(crate) hue: Option<Setting<f32>>,

    /// Saturation of the base color.
    #[arg(long)]
    pub(crate) saturation: Option<Setting<f32>>,

    /// Value of the base color.
    #[arg(long)]
    pub(crate) value: Option<Setting<f32>>,

    /// Standard deviation of palette hue jitter.
    #[arg(long)]
    pub(crate) hue_sigma: Option<Setting<f32>>,

    /// Standard deviation of palette saturation jitter.
    #[arg(long)]
    pub(crate) saturation_sigma: Option<Setting<f32>>,

    /// Standard deviation of palette value jitter.
    #[arg(long)]
    pub(crate) value_sigma: Option<Setting<f32>>,

    /// Probability of clearing cells with no occupied neighbour.
    #[arg(long)]
    pub(crate) despeckle: Option<Setting<f32>>,

    /// Probability of clearing cells with one occupied neighbour.
    #[arg(long)]
    pub(crate) despur: Option<Setting<f32>>,

    /// Probability of filling cells with seven occupied neighbours.
    #[arg(long)]
    pub(crate) relax: Option<Setting<f32>>,

    /// Probability of filling cells with eight occupied neighbours.
    #[arg(long)]
    pub(crate) devoid: Option<Setting<f32>>,

    /// Number of automaton generations.
    #[arg(long)]
    pub(crate) generations: Option<u32>,

    /// Random seed; drawn from system entropy when omitted.
    #[arg(short = 'z', long)]
    pub(crate) seed: Option<u64>,

    /// Scaler used to reach the output resolution.
    #[arg(long, value_name = "NAME")]
    pub(crate) scaler: Option<String>,

    /// Use a fresh seed for every image of a batch.
    #[arg(long)]
    pub(crate) random_seed: bool,

    /// Re-roll the base color for every image of a batch.
    #[arg(long)]
    pub(crate) random_color: bool,

    /// Output path without extension; image bytes go to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub(crate) output: Option<PathBuf>,

    /// Image format: png, gif, jpeg or bmp.
    #[arg(short, long, value_name = "FORMAT", default_value_t = OutputFormat::Png)]
    pub(crate) format: OutputFormat,

    /// Reduce the palette to this many bits and write an indexed PNG.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub(crate) bits: Option<u8>,

    /// Number of images to generate.
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub(crate) num_images: u32,

    /// Combine a batch into a single sprite sheet.
    #[arg(long)]
    pub(crate) sheet: bool,

    /// Print the available scalers and exit.
    #[arg(long)]
    pub(crate) list_scalers: bool,
}

/// Numeric option value: either fixed or drawn at random.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Setting<T> {
    /// Use this exact value.
    Fixed(T),
    /// Draw a value from the option's range.
    Random,
}

impl<T> FromStr for Setting<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("x") {
            return Ok(Self::Random);
        }
        value
            .parse()
            .map(Self::Fixed)
            .map_err(|error| format!("expected a number or `X`: {error}"))
    }
}

impl Setting<f32> {
    fn resolve<R: RandomStream + ?Sized>(self, low: f32, high: f32, rng: &mut R) -> f32 {
        match self {
            Self::Fixed(value) => value,
            Self::Random => low + rng.next_unit() * (high - low),
        }
    }
}

impl Setting<u32> {
    fn resolve<R: RandomStream + ?Sized>(self, low: u32, high: u32, rng: &mut R) -> u32 {
        match self {
            Self::Fixed(value) => value,
            Self::Random => low + rng.next_below(high - low),
        }
    }
}

fn assign<T, R: RandomStream + ?Sized>(
    field: &mut T,
    setting: Option<Setting<T>>,
    resolve: impl FnOnce(Setting<T>, &mut R) -> T,
    rng: &mut R,
) {
    if let Some(setting) = setting {
        *field = resolve(setting, rng);
    }
}

/// Parameter record loaded from disk with the keys it set explicitly.
#[derive(Debug)]
pub(crate) struct ConfigFile {
    specs: Specs,
    keys: toml::Table,
}

impl ConfigFile {
    /// Reads and parses a TOML parameter file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let specs = toml::from_str(contents).context("invalid sprite parameters")?;
        let keys = toml::from_str(contents).context("invalid toml")?;
        Ok(Self { specs, keys })
    }

    fn sets(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }
}

impl Args {
    /// Output encoding; palette reduction is only offered for PNG.
    pub(crate) fn encoding(&self) -> Result<Encoding> {
        if self.bits.is_some() && self.format != OutputFormat::Png {
            bail!("--bits needs png output, not {}", self.format);
        }
        Ok(Encoding {
            format: self.format,
            bits: self.bits,
        })
    }

    /// Builds the parameter record: config file (or defaults with batch
    /// flags off), optional full randomisation, then option overrides.
    /// `X` values, the entropy seed and `--randomize-all` draw from `rng`.
    pub(crate) fn build_specs<R: RandomStream + ?Sized>(&self, rng: &mut R) -> Result<Specs> {
        let config = match &self.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile {
                specs: Specs {
                    random_seed: false,
                    random_color: false,
                    ..Specs::default()
                },
                keys: toml::Table::new(),
            },
        };
        Ok(self.apply(config, rng))
    }

    fn apply<R: RandomStream + ?Sized>(&self, config: ConfigFile, rng: &mut R) -> Specs {
        let mut specs = config.specs.clone();
        if self.randomize_all {
            specs.randomize(rng);
        }

        if let Some(width) = self.width {
            specs.width = width;
        }
        if let Some(height) = self.height {
            specs.height = height;
        }
        specs.target_width = match self.scaled_width {
            Some(width) => width,
            None if config.sets("target_width") => specs.target_width,
            None => specs.width,
        };
        specs.target_height = match self.scaled_height {
            Some(height) => height,
            None if config.sets("target_height") => specs.target_height,
            None => specs.height,
        };

        let count = |low, high| {
            move |setting: Setting<u32>, rng: &mut R| setting.resolve(low, high, rng)
        };
        let unit = |low, high| {
            move |setting: Setting<f32>, rng: &mut R| setting.resolve(low, high, rng)
        };

        assign(&mut specs.colors, self.colors, count(2, 15), rng);
        assign(&mut specs.seeds, self.seeds, count(4, 16), rng);
        assign(&mut specs.variance, self.color_speed, unit(0.1, 1.0), rng);
        assign(&mut specs.mutation, self.mutation, unit(0.0, 1.0), rng);
        assign(&mut specs.min_density, self.edge, unit(0.0, 0.33), rng);
        assign(&mut specs.max_density, self.center, unit(0.5, 1.0), rng);
        assign(&mut specs.mirror_x, self.mirror_x, unit(0.0, 1.0), rng);
        assign(&mut specs.mirror_y, self.mirror_y, unit(0.0, 1.0), rng);
        assign(&mut specs.mirror_positive, self.mirror_positive, unit(0.0, 1.0), rng);
        assign(&mut specs.mirror_negative, self.mirror_negative, unit(0.0, 1.0), rng);
        assign(&mut specs.bias, self.bias, unit(f32::EPSILON, 1.0 - f32::EPSILON), rng);
        assign(&mut specs.gain, self.gain, unit(f32::EPSILON, 1.0 - f32::EPSILON), rng);
        assign(&mut specs.hue, self.hue, unit(0.0, 1.0), rng);
        assign(&mut specs.saturation, self.saturation, unit(0.0, 1.0), rng);
        assign(&mut specs.value, self.value, unit(0.0, 1.0), rng);
        assign(&mut specs.hue_sigma, self.hue_sigma, unit(0.0, 1.0), rng);
        assign(&mut specs.saturation_sigma, self.saturation_sigma, unit(0.0, 1.0), rng);
        assign(&mut specs.value_sigma, self.value_sigma, unit(0.0, 1.0), rng);
        let [despeckle, despur, relax, devoid] = &mut specs.ca_probabilities;
        assign(despeckle, self.despeckle, unit(0.0, 1.0), rng);
        assign(despur, self.despur, unit(0.0, 1.0), rng);
        assign(relax, self.relax, unit(0.0, 1.0), rng);
        assign(devoid, self.devoid, unit(0.0, 1.0), rng);

        if let Some(generations) = self.generations {
            specs.ca_generations = generations;
        }
        if let Some(scaler) = &self.scaler {
            specs.scaler.clone_from(scaler);
        }

        let drawn = rng.next_seed();
        specs.seed = match self.seed {
            Some(seed) => seed,
            None if config.sets("seed") || self.randomize_all => specs.seed,
            None => drawn,
        };

        specs.random_seed |= self.random_seed;
        specs.random_color |= self.random_color;
        specs
    }
}
