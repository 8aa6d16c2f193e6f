//! Application errors

use std::{io, path::PathBuf};

use salon_status::{
    config::ConfigError,
    labels::{PaletteError, UnmappedCategoryError},
    promotions::SavingsError,
};
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use crate::{shutdown::ShutdownSignalError, snapshot::SnapshotError};

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read category palette {}: {source}", .path.display())]
    PaletteRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Palette(#[from] PaletteError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Category(#[from] UnmappedCategoryError),

    #[error(transparent)]
    Savings(#[from] SavingsError),

    #[error("unknown currency `{0}`")]
    Currency(String),

    #[error("failed to initialise logging: {0}")]
    Logging(#[from] TryInitError),

    #[error(transparent)]
    Shutdown(#[from] ShutdownSignalError),

    #[error("failed to write report: {0}")]
    Output(#[source] io::Error),
}
