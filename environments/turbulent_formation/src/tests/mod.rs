//! Behavioral tests for the formation environment.
//!
//! ## Organization
//!
//! - `physics_tests`: drag, pressure and integration
//! - `disturbance_tests`: calm and vortex fields, model selection
//! - `precomputed_tests`: on-disk catalog, caching and space-time interpolation
//! - `reward_tests`: formation shape reward and composition
//! - `termination_tests`: step-limit truncation
//! - `environment_tests`: reset/step lifecycle and closed-loop behavior

pub mod physics_tests;
pub mod reward_tests;
pub mod termination_tests;

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::disturbance::{parse_frame_time, FrameReader, VelocityFrame};
use crate::error::Result;

/// Synthetic frame decoder.
///
/// `ux` equals the column index and `uy` equals `10 * row + t`, where `t`
/// is the timestamp in the file name. Counts how many frames it decodes.
#[derive(Clone, Default)]
pub struct GridReader {
    pub calls: Arc<AtomicUsize>,
}

impl GridReader {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FrameReader for GridReader {
    fn read_frame(&self, path: &Path, rows: usize, cols: usize) -> Result<VelocityFrame> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let t = parse_frame_time(name)?;

        let mut frame = VelocityFrame::default();
        for r in 0..rows {
            for c in 0..cols {
                frame.ux.push(c as f64);
                frame.uy.push(10.0 * r as f64 + t);
            }
        }
        Ok(frame)
    }
}

/// Create `<base>/<name>/state_phys_t<stamp>.nc` for each stamp.
pub fn write_simulation(base: &Path, name: &str, stamps: &[&str]) {
    let dir = base.join(name);
    fs::create_dir_all(&dir).unwrap();
    for stamp in stamps {
        fs::write(dir.join(format!("state_phys_t{stamp}.nc")), b"").unwrap();
    }
}
