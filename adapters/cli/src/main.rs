#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that writes generated sprites as image files.

mod options;

use std::{
    ffi::OsString,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use splat_core::SeededStream;
use splat_encoding::{compose_sheet, encode, save, Encoding};
use splat_grid::PixelGrid;
use splat_system_pipeline::{BatchRefresh, SpriteGenerator};
use splat_system_scaling::ScalerRegistry;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::options::Args;

/// Entry point for the splat command-line interface.
fn main() -> Result<()> {
    init_tracing();
    run(Args::parse())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let registry = ScalerRegistry::builtin();
    if args.list_scalers {
        let mut stdout = io::stdout().lock();
        for name in registry.names() {
            writeln!(stdout, "{name}").context("failed to list scalers")?;
        }
        return Ok(());
    }

    let encoding = args.encoding()?;
    let mut rng = SeededStream::from_entropy();
    let specs = args.build_specs(&mut rng)?;
    debug!(?specs, "parameters resolved");

    let mut generator =
        SpriteGenerator::new(specs, &registry).context("invalid sprite parameters")?;
    let mut refresh = BatchRefresh::with_stream(rng);
    let batch = args.num_images > 1;
    let output = args.output.as_deref();

    let mut sheet = Vec::new();
    for index in 0..args.num_images {
        let sprite = generator.generate();
        if args.sheet && batch {
            sheet.push(sprite);
        } else {
            emit(&sprite, encoding, output, batch.then_some(index))?;
        }
        refresh
            .refresh(&mut generator)
            .context("batch refresh produced invalid parameters")?;
    }

    if !sheet.is_empty() {
        let sheet = compose_sheet(&sheet)?;
        emit(&sheet, encoding, output, None)?;
    }
    Ok(())
}

fn emit(
    grid: &PixelGrid,
    encoding: Encoding,
    output: Option<&Path>,
    index: Option<u32>,
) -> Result<()> {
    match output {
        Some(base) => {
            let path = image_path(base, index, encoding.format.extension());
            save(grid, &path, encoding)?;
            info!(path = %path.display(), format = %encoding.format, "sprite written");
        }
        None => {
            let bytes = encode(grid, encoding)?;
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|()| stdout.flush())
                .context("failed to write image to stdout")?;
        }
    }
    Ok(())
}

/// `<base>.<ext>` for single images and sheets, `<base>_<index>.<ext>` inside
/// a batch.
fn image_path(base: &Path, index: Option<u32>, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    if let Some(index) = index {
        name.push(format!("_{index}"));
    }
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
