//! Promotions
//!
//! Promotion records, their inclusive validity window and the status derived
//! from it.

use std::fmt;

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dates::{InvalidDateError, local_today, parse_calendar_date};

/// Promotion identifier
pub type PromotionId = u64;

/// Status of a promotion relative to its validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromotionStatus {
    /// The window has not opened yet.
    #[serde(rename = "Programada", alias = "Scheduled")]
    Scheduled,

    /// Today falls inside the window.
    #[serde(rename = "Activa", alias = "Active")]
    Active,

    /// The window has closed.
    #[serde(rename = "Expirada", alias = "Expired")]
    Expired,
}

impl PromotionStatus {
    /// The backend tag for this status.
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::Scheduled => "Programada",
            Self::Active => "Activa",
            Self::Expired => "Expirada",
        }
    }
}

impl fmt::Display for PromotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A promotion whose end date precedes its start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("promotion window ends on {end} before it starts on {start}")]
pub struct InvalidWindowError {
    /// First valid day.
    pub start: Date,

    /// Last valid day.
    pub end: Date,
}

/// Inclusive range of days on which a promotion applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionWindow {
    start: Date,
    end: Date,
}

impl PromotionWindow {
    /// Create a window, rejecting an end date before the start date.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWindowError`] when `start > end`.
    pub fn new(start: Date, end: Date) -> Result<Self, InvalidWindowError> {
        if start > end {
            return Err(InvalidWindowError { start, end });
        }

        Ok(Self { start, end })
    }

    /// Create a window without checking its ordering.
    ///
    /// Status derivation stays deterministic for inverted windows.
    pub const fn unchecked(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// First valid day.
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Last valid day.
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Status of this window at `now`.
    pub fn status(&self, now: Timestamp, timezone: &TimeZone) -> PromotionStatus {
        promotion_status(self.start, self.end, now, timezone)
    }
}

/// Status of a promotion at `now`, compared at calendar-date granularity.
///
/// Both ends of the window are inclusive: the promotion is active for the
/// whole of its start and end days in the salon timezone.
pub fn promotion_status(
    start: Date,
    end: Date,
    now: Timestamp,
    timezone: &TimeZone,
) -> PromotionStatus {
    let today = local_today(now, timezone);

    if today < start {
        PromotionStatus::Scheduled
    } else if today > end {
        PromotionStatus::Expired
    } else {
        PromotionStatus::Active
    }
}

/// Promotion as fetched from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    /// Identifier
    #[serde(alias = "pro_id")]
    pub id: PromotionId,

    /// Display name
    #[serde(default, alias = "pro_nombre")]
    pub name: String,

    /// First valid day.
    #[serde(alias = "pro_fecha_inicio")]
    pub start_date: String,

    /// Last valid day.
    #[serde(alias = "pro_fecha_fin")]
    pub end_date: String,

    /// Discount percentage, between 0 and 100.
    #[serde(alias = "pro_descuento_porcentaje")]
    pub discount_percent: Decimal,

    /// Times the promotion has been redeemed.
    #[serde(default, alias = "usos")]
    pub usage_count: u32,

    /// Discounted service.
    #[serde(default, alias = "ser_id", skip_serializing_if = "Option::is_none")]
    pub service_id: Option<u64>,
}

impl Promotion {
    /// Parse the validity window.
    ///
    /// The ordering of the dates is not checked.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidDateError`] when either date is malformed.
    pub fn window(&self) -> Result<PromotionWindow, InvalidDateError> {
        Ok(PromotionWindow::unchecked(
            parse_calendar_date(&self.start_date)?,
            parse_calendar_date(&self.end_date)?,
        ))
    }
}

/// Promotions active at `now`. Records with malformed dates are skipped.
pub fn active_promotions<'p>(
    promotions: &'p [Promotion],
    now: Timestamp,
    timezone: &'p TimeZone,
) -> impl Iterator<Item = &'p Promotion> {
    promotions.iter().filter(move |promotion| {
        promotion
            .window()
            .is_ok_and(|window| window.status(now, timezone) == PromotionStatus::Active)
    })
}

/// Errors raised while estimating promotion savings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SavingsError {
    /// A discount percentage lies outside 0..=100.
    #[error("promotion {id} has discount {percent}% outside 0..=100")]
    PercentOutOfRange {
        /// Offending promotion.
        id: PromotionId,

        /// Discount as recorded.
        percent: Decimal,
    },

    /// The running total no longer fits in minor units.
    #[error("estimated savings overflowed")]
    Overflow,
}

/// Estimate the money customers saved through `promotions`.
///
/// Each redemption is assumed to discount one service at `average_price`.
///
/// # Errors
///
/// Returns [`SavingsError::PercentOutOfRange`] for an invalid discount, or
/// [`SavingsError::Overflow`] if the total cannot be represented.
pub fn estimated_savings<'a>(
    promotions: &[Promotion],
    average_price: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, SavingsError> {
    let price_minor = average_price.to_minor_units();

    let mut total: i64 = 0;

    for promotion in promotions {
        let per_use = percent_of_minor(promotion, price_minor)?;

        let saved = per_use
            .checked_mul(i64::from(promotion.usage_count))
            .ok_or(SavingsError::Overflow)?;

        total = total.checked_add(saved).ok_or(SavingsError::Overflow)?;
    }

    Ok(Money::from_minor(total, average_price.currency()))
}

/// Discount on `minor` units for one redemption, rounded half away from zero.
fn percent_of_minor(promotion: &Promotion, minor: i64) -> Result<i64, SavingsError> {
    let percent = promotion.discount_percent;

    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(SavingsError::PercentOutOfRange {
            id: promotion.id,
            percent,
        });
    }

    let Some(minor) = Decimal::from_i64(minor) else {
        return Err(SavingsError::Overflow);
    };

    let Some(applied) = minor
        .checked_mul(percent)
        .and_then(|value| value.checked_div(Decimal::ONE_HUNDRED))
    else {
        return Err(SavingsError::Overflow);
    };

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(SavingsError::Overflow)
}
