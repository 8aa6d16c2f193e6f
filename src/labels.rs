//! Label Formatting
//!
//! Human-readable relative dates and the stable category tokens consumed by
//! presentation code.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    appointments::{LifecycleState, Urgency},
    promotions::PromotionStatus,
};

/// Relative, Spanish-language label for a day delta.
///
/// `0` is "Hoy", `1` is "Mañana", past deltas read "Hace N días" and later
/// deltas read "En N días".
pub fn relative_label(day_delta: i32) -> String {
    match day_delta {
        0 => "Hoy".to_string(),
        1 => "Mañana".to_string(),
        delta if delta < 0 => format!("Hace {}", days(delta.unsigned_abs())),
        delta => format!("En {}", days(delta.unsigned_abs())),
    }
}

fn days(count: u32) -> String {
    if count == 1 {
        "1 día".to_string()
    } else {
        format!("{count} días")
    }
}

/// Default category token for an urgency.
pub const fn urgency_category(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Overdue => "overdue",
        Urgency::Today => "today",
        Urgency::Tomorrow => "tomorrow",
        Urgency::Upcoming => "upcoming",
        Urgency::Future => "future",
    }
}

/// Category token for an appointment lifecycle state.
pub const fn status_category(state: LifecycleState) -> &'static str {
    match state {
        LifecycleState::Scheduled => "scheduled",
        LifecycleState::Completed => "completed",
        LifecycleState::Cancelled => "cancelled",
    }
}

/// Category token for a promotion status.
pub const fn promotion_category(status: PromotionStatus) -> &'static str {
    match status {
        PromotionStatus::Scheduled => "scheduled",
        PromotionStatus::Active => "active",
        PromotionStatus::Expired => "expired",
    }
}

/// An urgency with no entry in a category palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no category token is mapped for urgency `{urgency}`")]
pub struct UnmappedCategoryError {
    /// The urgency that could not be mapped.
    pub urgency: Urgency,
}

/// Errors raised while loading a category palette.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// The palette document is malformed.
    #[error("invalid category palette: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The palette misses an urgency.
    #[error(transparent)]
    Unmapped(#[from] UnmappedCategoryError),
}

/// Urgency to category token overrides.
///
/// A palette must map every urgency; gaps are programming errors and surface
/// as [`UnmappedCategoryError`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryPalette {
    tokens: FxHashMap<Urgency, String>,
}

impl CategoryPalette {
    /// Palette with the default token for every urgency.
    pub fn standard() -> Self {
        Urgency::ALL
            .into_iter()
            .map(|urgency| (urgency, urgency_category(urgency).to_string()))
            .collect()
    }

    /// Load and validate a palette from YAML, e.g. `overdue: red`.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::Yaml`] for malformed documents and
    /// [`PaletteError::Unmapped`] when any urgency is missing.
    pub fn from_yaml(document: &str) -> Result<Self, PaletteError> {
        let palette: Self = serde_norway::from_str(document)?;

        palette.validate()?;

        Ok(palette)
    }

    /// Set the token for `urgency`.
    #[must_use]
    pub fn with(mut self, urgency: Urgency, token: impl Into<String>) -> Self {
        self.tokens.insert(urgency, token.into());
        self
    }

    /// Check that every urgency has a token.
    ///
    /// # Errors
    ///
    /// Returns [`UnmappedCategoryError`] for the first missing urgency.
    pub fn validate(&self) -> Result<(), UnmappedCategoryError> {
        Urgency::ALL
            .into_iter()
            .try_for_each(|urgency| self.token_for(urgency).map(|_token| ()))
    }

    /// Token for `urgency`.
    ///
    /// # Errors
    ///
    /// Returns [`UnmappedCategoryError`] when the palette has no entry.
    pub fn token_for(&self, urgency: Urgency) -> Result<&str, UnmappedCategoryError> {
        self.tokens
            .get(&urgency)
            .map(String::as_str)
            .ok_or(UnmappedCategoryError { urgency })
    }
}

impl FromIterator<(Urgency, String)> for CategoryPalette {
    fn from_iter<I: IntoIterator<Item = (Urgency, String)>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}
