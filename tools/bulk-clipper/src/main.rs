//! Clip a list of identically gridded files and extract the data within a
//! region, defined by a mask raster, a bounding-box file or a literal box.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{ArgGroup, Parser};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use clipper::bulk::{box_clip, mask_clip, OutputOptions};
use domain_io::bbox_file;
use subset_common::{BoundingBox, Padding};

#[derive(Parser, Debug)]
#[command(name = "bulk-clipper")]
#[command(about = "Clip a list of identically gridded files within a region")]
#[command(group = ArgGroup::new("region").required(true).multiple(false))]
struct Args {
    /// Classified mask raster defining the region
    #[arg(short, long, group = "region")]
    mask_file: Option<PathBuf>,

    /// Bounding-box file defining the region
    #[arg(short, long, group = "region")]
    bbox_file: Option<PathBuf>,

    /// Literal 1-based box: x1 y1 nx ny
    #[arg(short = 'i', long = "box", num_args = 4, value_names = ["X1", "Y1", "NX", "NY"], group = "region")]
    box_def: Option<Vec<i64>>,

    /// The gridded data files (.bin or .sa) to clip from
    #[arg(short, long, required = true, num_args = 1..)]
    data_files: Vec<PathBuf>,

    /// Directory to write outputs to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// No-data padding in cells around a box clip, clockwise from top
    #[arg(short, long, num_args = 4, value_names = ["TOP", "RIGHT", "BOTTOM", "LEFT"], default_values_t = [0, 0, 0, 0])]
    padding: Vec<usize>,

    /// Write packed binary outputs
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    write_binary: bool,

    /// Write simple ascii outputs
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    write_ascii: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level: Level = args.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting tracing subscriber")?;

    let start = Utc::now();
    info!(%start, "starting bulk clip");
    run(&args)?;
    let end = Utc::now();
    info!(%end, runtime = %(end - start), "completed bulk clip");
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let options = OutputOptions {
        write_binary: args.write_binary,
        write_ascii: args.write_ascii,
    };

    if let Some(mask_file) = &args.mask_file {
        mask_clip(mask_file, &args.data_files, &args.out_dir, &options)
            .context("mask-defined clip")?;
        return Ok(());
    }

    let padding = Padding::new(
        args.padding[0],
        args.padding[1],
        args.padding[2],
        args.padding[3],
    );
    let bbox = if let Some(bbox_path) = &args.bbox_file {
        bbox_file::read(bbox_path)
            .with_context(|| format!("reading bounding box {}", bbox_path.display()))?
    } else {
        // clap guarantees exactly one region source, so box_def is present
        let values = args
            .box_def
            .as_ref()
            .context("one of --mask-file, --bbox-file or --box is required")?;
        BoundingBox::new(values[0], values[1], values[2], values[3])
            .context("invalid --box values")?
    };
    box_clip(
        &bbox.with_padding(padding),
        &args.data_files,
        &args.out_dir,
        &options,
    )
    .context("box-defined clip")?;
    Ok(())
}
