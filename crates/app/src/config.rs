//! Engine & Logging Config

use std::{fs, path::PathBuf};

use clap::Args;
use salon_status::{
    config::{DEFAULT_SALON_TIMEZONE, EngineConfig},
    labels::CategoryPalette,
};

use crate::error::AppError;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Classification settings.
#[derive(Debug, Args)]
pub(crate) struct EngineArgs {
    /// IANA timezone the salon operates in
    #[arg(long, env = "SALON_TIMEZONE", default_value = DEFAULT_SALON_TIMEZONE, global = true)]
    pub timezone: String,

    /// YAML file mapping every urgency to a category token
    #[arg(long, env = "CATEGORY_PALETTE", global = true)]
    pub palette: Option<PathBuf>,
}

impl EngineArgs {
    /// Resolve the timezone and load the optional palette.
    pub(crate) fn engine_config(&self) -> Result<EngineConfig, AppError> {
        let config = EngineConfig::for_zone(&self.timezone)?;

        let Some(path) = &self.palette else {
            return Ok(config);
        };

        let document = fs::read_to_string(path).map_err(|source| AppError::PaletteRead {
            path: path.clone(),
            source,
        })?;

        Ok(config.with_palette(CategoryPalette::from_yaml(&document)?)?)
    }
}
