//! Dataset sources and their fingerprints

use crate::LoadError;
use motion_log::{MapTable, TrajectoryTable};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::info;

/// Size and modification time of one source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileStamp {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileStamp {
    /// `None` when the file cannot be stat'ed
    pub fn of(path: &Path) -> Option<Self> {
        let meta = fs::metadata(path).ok()?;
        Some(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Identity plus version of a source; any edit on disk changes it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFingerprint {
    pub identity: Vec<String>,
    pub stamps: Vec<Option<FileStamp>>,
}

/// A parsed multi-scenario dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub trajectories: TrajectoryTable,
    pub map: MapTable,
}

/// Producer of trajectory and map tables.
///
/// `read` returns `Ok(None)` when no trajectory data exists at all.
pub trait DatasetSource {
    fn fingerprint(&self) -> SourceFingerprint;

    fn read(&self) -> Result<Option<Dataset>, LoadError>;
}

/// Trajectory and map CSV files on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSource {
    pub traj_path: PathBuf,
    pub map_path: PathBuf,
}

impl CsvSource {
    pub fn new(traj_path: impl Into<PathBuf>, map_path: impl Into<PathBuf>) -> Self {
        Self {
            traj_path: traj_path.into(),
            map_path: map_path.into(),
        }
    }
}

impl DatasetSource for CsvSource {
    fn fingerprint(&self) -> SourceFingerprint {
        SourceFingerprint {
            identity: vec![
                self.traj_path.display().to_string(),
                self.map_path.display().to_string(),
            ],
            stamps: vec![FileStamp::of(&self.traj_path), FileStamp::of(&self.map_path)],
        }
    }

    fn read(&self) -> Result<Option<Dataset>, LoadError> {
        let Some(trajectories) = TrajectoryTable::open(&self.traj_path)? else {
            info!("Trajectory file {} not found", self.traj_path.display());
            return Ok(None);
        };

        let map = match MapTable::open(&self.map_path)? {
            Some(map) => map,
            None => {
                info!("Map file {} not found, continuing without map", self.map_path.display());
                MapTable::default()
            }
        };

        info!(
            "Parsed {} trajectory rows and {} map points",
            trajectories.len(),
            map.len()
        );
        Ok(Some(Dataset { trajectories, map }))
    }
}
