//! Subset a regional model domain out of a continental one.
//!
//! Pipeline: read the full-extent classified mask raster, stamp a
//! decomposition-friendly bounding box around the inner region, generate the
//! solid-geometry file through the external mesh tool, clip every manifest
//! input to the region, and write the bounding-box artifact.

mod manifest;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use clipper::bulk::{clip_inputs, OutputOptions};
use clipper::lsm::{self, LsmClipper};
use clipper::MaskClipper;
use domain_io::{bbox_file, read_grid};
use manifest::{Manifest, DOMAIN_MASK_KEY, LAND_COVER_KEY, LAT_LON_KEY};
use mask_geometry::SubsetMask;
use solid_builder::{make_solid_file, AsciiRasterGeometry, MeshTool};
use subset_common::{GeoTransform, Padding};

#[derive(Parser, Debug)]
#[command(name = "subset-domain")]
#[command(about = "Subset a regional model domain out of a continental one")]
struct Args {
    /// Full-extent classified mask raster (.bin or .sa)
    #[arg(short, long)]
    mask_file: PathBuf,

    /// YAML manifest naming the domain input files
    #[arg(short = 'f', long)]
    manifest: PathBuf,

    /// Directory holding the manifest's input files
    #[arg(short, long, default_value = ".")]
    input_dir: PathBuf,

    /// Directory to write outputs to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Name to give the outputs (default: mask file stem)
    #[arg(short = 'n', long)]
    out_name: Option<String>,

    /// Bounding-box padding in cells, clockwise from top (top right bottom left)
    #[arg(short, long, num_args = 4, value_names = ["TOP", "RIGHT", "BOTTOM", "LEFT"], default_values_t = [0, 0, 0, 0])]
    padding: Vec<usize>,

    /// Expand the bounding box to a multiple of this side length instead of
    /// using explicit padding
    #[arg(long)]
    multiple: Option<usize>,

    /// Mesh tool executable (default: $MASK_UTILS_HOME, then PATH)
    #[arg(long, env = "MESH_TOOL")]
    mesh_tool: Option<PathBuf>,

    /// Top elevation of the solid domain
    #[arg(long, default_value_t = 1000.0)]
    z_top: f64,

    /// Bottom elevation of the solid domain
    #[arg(long, default_value_t = 0.0)]
    z_bottom: f64,

    /// Also write clipped outputs as simple ascii
    #[arg(long, default_value_t = false)]
    write_ascii: bool,

    /// Also clip the land-surface-model inputs (LAT_LON, LAND_COVER)
    #[arg(long, default_value_t = false)]
    lsm: bool,

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
    info!(%start, "starting domain subset");
    run(&args)?;
    let end = Utc::now();
    info!(%end, runtime = %(end - start), "completed domain subset");
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let out_name = args.out_name.clone().unwrap_or_else(|| {
        args.mask_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("subset")
            .to_string()
    });

    let manifest = Manifest::load(&args.manifest)?;
    let inputs = manifest.resolve(&args.input_dir)?;

    // Step 1: load the mask and stamp the bounding box
    let mask_array = read_grid(&args.mask_file)
        .with_context(|| format!("reading mask {}", args.mask_file.display()))?;
    let mask = SubsetMask::with_defaults(mask_array, GeoTransform::default())
        .context("building subset mask")?;
    let (mask, _extent) = match args.multiple {
        Some(multiple) => mask.add_bbox_for_multiple(multiple)?,
        None => {
            let padding = Padding::new(
                args.padding[0],
                args.padding[1],
                args.padding[2],
                args.padding[3],
            );
            mask.add_bbox(&padding)?
        }
    };
    let region_clipper = MaskClipper::new(&mask);

    // Step 2: generate the solid file
    let tool = match &args.mesh_tool {
        Some(path) => MeshTool::new(path.clone()),
        None => MeshTool::new(MeshTool::locate()?),
    };
    let geo = region_clipper.geo_transform();
    let raster_geometry = AsciiRasterGeometry {
        xllcorner: geo.origin_x,
        yllcorner: geo.origin_y,
        cellsize: geo.pixel_width,
        no_data: mask.no_data_value(),
    };
    let solid = make_solid_file(
        region_clipper.clipped_mask(),
        &tool,
        &args.out_dir,
        &out_name,
        &raster_geometry,
        args.z_top,
        args.z_bottom,
    )?;
    info!(batches = %solid.batch_string(), solid = %solid.solid_path.display(), "solid file ready");

    // Step 3: clip every domain input except the mask itself
    let data_files: Vec<PathBuf> = inputs
        .required
        .iter()
        .filter(|(key, _)| key.as_str() != DOMAIN_MASK_KEY)
        .map(|(_, path)| path.clone())
        .collect();
    clip_inputs(
        &region_clipper,
        &data_files,
        &args.out_dir,
        &OutputOptions {
            write_binary: true,
            write_ascii: args.write_ascii,
        },
    )?;

    // Step 4: land-surface-model inputs
    if args.lsm {
        let (Some(latlon_path), Some(cover_path)) = (
            inputs.optional.get(LAT_LON_KEY),
            inputs.optional.get(LAND_COVER_KEY),
        ) else {
            bail!("--lsm requires {LAT_LON_KEY} and {LAND_COVER_KEY} manifest entries");
        };
        let lsm_clipper = LsmClipper::new(region_clipper.bounding_box());
        let latlon = lsm_clipper.clip_latlon(&read_grid(latlon_path)?)?;
        let cover = lsm_clipper.clip_land_cover(&read_grid(cover_path)?)?;
        lsm::write_latlon(&args.out_dir.join(format!("{out_name}_latlon.sa")), &latlon)?;
        let vegm = lsm::vegetation_map(&latlon, &cover)?;
        lsm::write_vegetation_map(&args.out_dir.join(format!("{out_name}_vegm.dat")), &vegm)?;
    }

    // Step 5: the bounding-box artifact
    bbox_file::write(
        &args.out_dir.join("bbox.txt"),
        &region_clipper.bounding_box(),
    )?;
    Ok(())
}
