//! Engine Configuration

use jiff::tz::TimeZone;
use thiserror::Error;

use crate::{
    appointments::Urgency,
    labels::{CategoryPalette, UnmappedCategoryError, urgency_category},
};

/// Timezone assumed when none is configured.
pub const DEFAULT_SALON_TIMEZONE: &str = "America/Bogota";

/// Errors raised while building an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The timezone name is not in the timezone database.
    #[error("unknown salon timezone `{name}`")]
    Timezone {
        /// Requested name.
        name: String,

        /// Lookup failure.
        #[source]
        source: jiff::Error,
    },

    /// The category palette misses an urgency.
    #[error(transparent)]
    Palette(#[from] UnmappedCategoryError),
}

/// Settings threaded through every classification.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    timezone: TimeZone,
    palette: Option<CategoryPalette>,
}

impl EngineConfig {
    /// Classify in `timezone` with the default category tokens.
    pub fn new(timezone: TimeZone) -> Self {
        Self {
            timezone,
            palette: None,
        }
    }

    /// Classify in the IANA timezone `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Timezone`] for unknown names.
    pub fn for_zone(name: &str) -> Result<Self, ConfigError> {
        let timezone = TimeZone::get(name).map_err(|source| ConfigError::Timezone {
            name: name.to_owned(),
            source,
        })?;

        Ok(Self::new(timezone))
    }

    /// Replace the default category tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Palette`] if `palette` misses any urgency.
    pub fn with_palette(mut self, palette: CategoryPalette) -> Result<Self, ConfigError> {
        palette.validate()?;
        self.palette = Some(palette);

        Ok(self)
    }

    /// Salon timezone.
    pub fn timezone(&self) -> &TimeZone {
        &self.timezone
    }

    /// Category token for `urgency`.
    ///
    /// # Errors
    ///
    /// Returns [`UnmappedCategoryError`] when a custom palette has no entry.
    pub fn urgency_token(&self, urgency: Urgency) -> Result<&str, UnmappedCategoryError> {
        match &self.palette {
            Some(palette) => palette.token_for(urgency),
            None => Ok(urgency_category(urgency)),
        }
    }
}
