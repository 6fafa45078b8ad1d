//! On-disk catalog of precomputed fluid simulations.
//!
//! Layout under the base folder:
//!
//! ```text
//! <base>/
//!   <prefix>_<ROWS>x<COLS>_<suffix>/
//!     state_phys_t0.000.nc
//!     state_phys_t0.050.nc
//!     ...
//! ```
//!
//! Every subdirectory is one simulation. Frames are read in file-name order
//! and the timestamp is the text between `state_phys_t` and `.nc`. Each
//! frame stores `ux` and `uy` in the `state_phys` group.
//!
//! Simulations load lazily on first use and stay cached for the lifetime of
//! the catalog. A catalog is meant to be wrapped in an [`Arc`] and shared by
//! every environment reading the same folder.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rand::Rng;
use tracing::info;

use crate::constants::{FRAME_FILE_EXT, FRAME_FILE_PREFIX};
use crate::disturbance::precomputed::SimulationData;
use crate::error::{FormationError, Result};
use crate::types::SimRng;

pub type SharedCatalog = Arc<SimulationCatalog>;

// ============================================================================
// Frame Reading
// ============================================================================

/// Velocity components of one frame, `rows * cols` values each, row-major.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VelocityFrame {
    pub ux: Vec<f64>,
    pub uy: Vec<f64>,
}

/// Decodes one frame file.
pub trait FrameReader: Send + Sync {
    fn read_frame(&self, path: &Path, rows: usize, cols: usize) -> Result<VelocityFrame>;
}

/// Reads `state_phys/ux` and `state_phys/uy` with the NetCDF C library.
#[cfg(feature = "netcdf")]
#[derive(Clone, Copy, Debug, Default)]
pub struct NetcdfFrameReader;

#[cfg(feature = "netcdf")]
impl FrameReader for NetcdfFrameReader {
    fn read_frame(&self, path: &Path, rows: usize, cols: usize) -> Result<VelocityFrame> {
        use crate::constants::FRAME_GROUP;

        let file_label = || path.display().to_string();
        let file = netcdf::open(path)?;
        let group = file
            .group(FRAME_GROUP)?
            .ok_or_else(|| FormationError::MissingVariable {
                file: file_label(),
                variable: FRAME_GROUP.to_owned(),
            })?;

        let read = |name: &str| -> Result<Vec<f64>> {
            let variable = format!("{FRAME_GROUP}/{name}");
            let var = group
                .variable(name)
                .ok_or_else(|| FormationError::MissingVariable {
                    file: file_label(),
                    variable: variable.clone(),
                })?;

            let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
            if !is_grid_shape(&dims, rows, cols) {
                return Err(FormationError::DimensionMismatch {
                    file: file_label(),
                    variable,
                    expected: [rows, cols],
                    actual: dims,
                });
            }
            Ok(var.get_values::<f64, _>(..)?)
        };

        Ok(VelocityFrame {
            ux: read("ux")?,
            uy: read("uy")?,
        })
    }
}

/// `dims` is `[rows, cols]`, optionally behind leading length-1 axes.
#[cfg_attr(not(feature = "netcdf"), allow(dead_code))]
fn is_grid_shape(dims: &[usize], rows: usize, cols: usize) -> bool {
    match dims {
        [lead @ .., r, c] => lead.iter().all(|&d| d == 1) && *r == rows && *c == cols,
        _ => false,
    }
}

// ============================================================================
// Name Parsing
// ============================================================================

/// Grid resolution from the field between the first and second underscore,
/// e.g. `sim_128x64_re100` -> `(128, 64)`.
pub fn parse_resolution(name: &str) -> Result<(usize, usize)> {
    let malformed = || FormationError::MalformedSimulationName {
        name: name.to_owned(),
    };

    let mut parts = name.split('_');
    parts.next();
    let field = parts.next().ok_or_else(malformed)?;
    // the field must be closed by a second underscore
    parts.next().ok_or_else(malformed)?;

    let (rows, cols) = field.split_once('x').ok_or_else(malformed)?;
    let rows: usize = rows.parse().map_err(|_| malformed())?;
    let cols: usize = cols.parse().map_err(|_| malformed())?;
    if rows == 0 || cols == 0 {
        return Err(malformed());
    }
    Ok((rows, cols))
}

/// Simulation time encoded in a frame file name, e.g.
/// `state_phys_t1.250.nc` -> `1.25`.
pub fn parse_frame_time(file_name: &str) -> Result<f64> {
    let malformed = || FormationError::MalformedTimestamp {
        file: file_name.to_owned(),
    };

    let start = file_name.find(FRAME_FILE_PREFIX).ok_or_else(malformed)? + FRAME_FILE_PREFIX.len();
    let suffix = format!(".{FRAME_FILE_EXT}");
    let len = file_name[start..].find(&suffix).ok_or_else(malformed)?;
    file_name[start..start + len].parse().map_err(|_| malformed())
}

fn is_frame_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext == FRAME_FILE_EXT)
}

// ============================================================================
// Catalog
// ============================================================================

pub struct SimulationCatalog {
    base_folder: PathBuf,
    names: Vec<String>,
    cache: RwLock<HashMap<String, Arc<SimulationData>>>,
    reader: Box<dyn FrameReader>,
}

impl SimulationCatalog {
    /// Discover simulations under `base_folder`, reading frames as NetCDF.
    #[cfg(feature = "netcdf")]
    pub fn open(base_folder: impl Into<PathBuf>) -> Result<Self> {
        Self::with_reader(base_folder, NetcdfFrameReader)
    }

    /// Without NetCDF support there is no way to decode frames.
    #[cfg(not(feature = "netcdf"))]
    pub fn open(base_folder: impl Into<PathBuf>) -> Result<Self> {
        Err(FormationError::NetcdfUnavailable {
            folder: base_folder.into(),
        })
    }

    /// Discover simulations under `base_folder` with a custom frame decoder.
    ///
    /// Fails if the folder has no subdirectories.
    pub fn with_reader<F: FrameReader + 'static>(
        base_folder: impl Into<PathBuf>,
        reader: F,
    ) -> Result<Self> {
        let base_folder = base_folder.into();
        let entries = fs::read_dir(&base_folder).map_err(|e| FormationError::io(&base_folder, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FormationError::io(&base_folder, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| FormationError::io(entry.path(), e))?
                .is_dir();
            if let (true, Ok(name)) = (is_dir, entry.file_name().into_string()) {
                names.push(name);
            }
        }
        if names.is_empty() {
            return Err(FormationError::NoSimulations { folder: base_folder });
        }
        names.sort();

        info!(
            folder = %base_folder.display(),
            simulations = names.len(),
            "discovered precomputed simulations"
        );

        Ok(Self {
            base_folder,
            names,
            cache: RwLock::new(HashMap::new()),
            reader: Box::new(reader),
        })
    }

    pub fn base_folder(&self) -> &Path {
        &self.base_folder
    }

    /// Simulation names in sorted order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Uniformly random simulation name.
    pub fn choose(&self, rng: &mut SimRng) -> &str {
        &self.names[rng.gen_range(0..self.names.len())]
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.cache.read().contains_key(name)
    }

    pub fn loaded_count(&self) -> usize {
        self.cache.read().len()
    }

    /// Cached simulation, reading it from disk on first request.
    ///
    /// Concurrent first requests may both read; the first insert wins and
    /// every caller gets the same `Arc`.
    pub fn load(&self, name: &str) -> Result<Arc<SimulationData>> {
        if let Some(sim) = self.cache.read().get(name) {
            return Ok(Arc::clone(sim));
        }
        if !self.names.iter().any(|n| n == name) {
            return Err(FormationError::UnknownSimulation {
                name: name.to_owned(),
            });
        }

        let sim = Arc::new(self.read_simulation(name)?);
        let mut cache = self.cache.write();
        Ok(Arc::clone(cache.entry(name.to_owned()).or_insert(sim)))
    }

    fn read_simulation(&self, name: &str) -> Result<SimulationData> {
        let (rows, cols) = parse_resolution(name)?;
        let dir = self.base_folder.join(name);

        let mut files: Vec<String> = fs::read_dir(&dir)
            .map_err(|e| FormationError::io(&dir, e))?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|file_name| is_frame_file(file_name))
            .collect();
        if files.is_empty() {
            return Err(FormationError::EmptySimulation {
                name: name.to_owned(),
            });
        }
        files.sort();

        let frame_len = rows * cols;
        let mut times = Vec::with_capacity(files.len());
        let mut ux = Vec::with_capacity(files.len() * frame_len);
        let mut uy = Vec::with_capacity(files.len() * frame_len);

        for file_name in &files {
            times.push(parse_frame_time(file_name)?);
            let frame = self.reader.read_frame(&dir.join(file_name), rows, cols)?;
            for component in [&frame.ux, &frame.uy] {
                if component.len() != frame_len {
                    return Err(FormationError::ShapeMismatch {
                        file: file_name.clone(),
                        expected: frame_len,
                        actual: component.len(),
                    });
                }
            }
            ux.extend_from_slice(&frame.ux);
            uy.extend_from_slice(&frame.uy);
        }

        let sim = SimulationData::new(name, rows, cols, times, ux, uy)?;
        info!(
            simulation = %name,
            frames = sim.num_frames(),
            rows,
            cols,
            t_max = sim.max_time(),
            "loaded simulation"
        );
        Ok(sim)
    }
}

impl std::fmt::Debug for SimulationCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationCatalog")
            .field("base_folder", &self.base_folder)
            .field("names", &self.names)
            .field("loaded", &self.loaded_count())
            .finish()
    }
}
