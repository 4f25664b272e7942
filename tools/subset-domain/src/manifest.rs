//! Input-file manifest loading.
//!
//! A YAML manifest names the domain's input files by logical key:
//!
//! ```yaml
//! model: continental-v1
//! version: 1
//! required_files:
//!   DOMAIN_MASK: domain_mask.bin
//!   SLOPE_X: slope_x.bin
//! optional_files:
//!   LAT_LON: latlon.sa
//!   LAND_COVER: land_cover.bin
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

/// Manifest key naming the full-extent domain mask raster.
pub const DOMAIN_MASK_KEY: &str = "DOMAIN_MASK";
/// Manifest key naming the lat/lon grid for land-surface clips.
pub const LAT_LON_KEY: &str = "LAT_LON";
/// Manifest key naming the land-cover grid for land-surface clips.
pub const LAND_COVER_KEY: &str = "LAND_COVER";

/// The parsed manifest file.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub model: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub required_files: BTreeMap<String, String>,
    #[serde(default)]
    pub optional_files: BTreeMap<String, String>,
}

fn default_version() -> u32 {
    1
}

/// Manifest entries resolved to existing paths under the input directory.
#[derive(Debug, Clone)]
pub struct ResolvedInputs {
    pub required: BTreeMap<String, PathBuf>,
    pub optional: BTreeMap<String, PathBuf>,
}

impl Manifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let manifest: Manifest = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        info!(
            model = %manifest.model,
            version = manifest.version,
            required = manifest.required_files.len(),
            optional = manifest.optional_files.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// Resolve every entry against `input_dir`.
    ///
    /// Missing required files abort with the full list of what was not
    /// found; missing optional files are only warned about and dropped.
    pub fn resolve(&self, input_dir: &Path) -> Result<ResolvedInputs> {
        let mut required = BTreeMap::new();
        let mut missing = Vec::new();
        for (key, file) in &self.required_files {
            let path = input_dir.join(file);
            if path.is_file() {
                required.insert(key.clone(), path);
            } else {
                missing.push(path.display().to_string());
            }
        }
        if !missing.is_empty() {
            bail!("missing required model input file(s): {}", missing.join(", "));
        }

        let mut optional = BTreeMap::new();
        for (key, file) in &self.optional_files {
            let path = input_dir.join(file);
            if path.is_file() {
                optional.insert(key.clone(), path);
            } else {
                warn!(key = %key, path = %path.display(), "optional model input file not found");
            }
        }
        Ok(ResolvedInputs { required, optional })
    }
}
