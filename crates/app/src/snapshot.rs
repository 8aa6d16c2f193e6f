//! Record snapshots
//!
//! A snapshot is the JSON the backend returned for the appointment and
//! promotion listings, saved as one document.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use salon_status::{appointments::Appointment, promotions::Promotion};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse snapshot {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Snapshot {
    #[serde(default, alias = "citas")]
    pub appointments: Vec<Appointment>,

    #[serde(default, alias = "promociones")]
    pub promotions: Vec<Promotion>,
}

impl Snapshot {
    pub(crate) fn load(path: &Path) -> Result<Self, SnapshotError> {
        let document = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&document).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
