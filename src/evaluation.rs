//! Batch Re-evaluation
//!
//! Projects a snapshot of appointment and promotion records into derived,
//! non-persisted views. Malformed records are flagged individually and never
//! prevent their siblings from being derived.

use jiff::{
    Timestamp,
    civil::{Date, Time},
};
use tracing::{debug, warn};

use crate::{
    appointments::{
        Appointment, AppointmentDetail, AppointmentId, LifecycleState, Urgency, effective_status,
    },
    clock::Clock,
    config::EngineConfig,
    dates::InvalidDateError,
    labels::{UnmappedCategoryError, promotion_category, relative_label, status_category},
    promotions::{Promotion, PromotionId, PromotionStatus, PromotionWindow},
};

/// Derived view of one appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAppointment {
    /// Identifier
    pub id: AppointmentId,

    /// Parsed calendar date.
    pub date: Date,

    /// Parsed clock time.
    pub time: Time,

    /// Instant the slot begins.
    pub scheduled_at: Timestamp,

    /// Persisted state, as received.
    pub state: LifecycleState,

    /// State after the elapsed-time completion rule.
    pub effective_status: LifecycleState,

    /// Category token for `effective_status`.
    pub status_token: &'static str,

    /// Urgency at evaluation time.
    pub urgency: Urgency,

    /// Category token for `urgency`.
    pub category_token: String,

    /// Whole days from today to `date`.
    pub day_delta: i32,

    /// Human-readable `day_delta`.
    pub relative_label: String,

    /// Enrichment carried over from the record.
    pub detail: Option<AppointmentDetail>,
}

impl DerivedAppointment {
    /// Whether the projection completes a record that is still scheduled.
    pub fn proposes_completion(&self) -> bool {
        self.state == LifecycleState::Scheduled && self.effective_status == LifecycleState::Completed
    }
}

/// Derived view of one promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPromotion {
    /// Identifier
    pub id: PromotionId,

    /// Display name
    pub name: String,

    /// Parsed validity window.
    pub window: PromotionWindow,

    /// Status at evaluation time.
    pub status: PromotionStatus,

    /// Category token for `status`.
    pub category_token: &'static str,
}

/// Record a flag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    /// An appointment
    Appointment(AppointmentId),

    /// A promotion
    Promotion(PromotionId),
}

/// A record excluded from derivation.
#[derive(Debug, Clone)]
pub struct FlaggedRecord {
    /// The offending record.
    pub record: RecordRef,

    /// Why it could not be derived.
    pub error: InvalidDateError,
}

/// Appointments per urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrgencySummary {
    /// Still scheduled but past their slot.
    pub overdue: usize,

    /// On today's date.
    pub today: usize,

    /// Tomorrow.
    pub tomorrow: usize,

    /// Within the week.
    pub upcoming: usize,

    /// Further out.
    pub future: usize,
}

/// Result of one re-evaluation pass.
#[derive(Debug, Clone)]
pub struct Reevaluation {
    /// Instant the pass was evaluated at.
    pub evaluated_at: Timestamp,

    /// Derived appointments, in input order.
    pub appointments: Vec<DerivedAppointment>,

    /// Derived promotions, in input order.
    pub promotions: Vec<DerivedPromotion>,

    /// Records that could not be derived.
    pub flagged: Vec<FlaggedRecord>,
}

impl Reevaluation {
    /// Appointments whose completion a collaborator may persist.
    pub fn pending_completions(&self) -> Vec<AppointmentId> {
        self.appointments
            .iter()
            .filter(|appointment| appointment.proposes_completion())
            .map(|appointment| appointment.id)
            .collect()
    }

    /// Appointment counts per urgency.
    ///
    /// Cancelled appointments are not counted. `today` counts every
    /// appointment on today's date, whatever its slot; `overdue` only counts
    /// appointments still scheduled past their slot.
    pub fn urgency_summary(&self) -> UrgencySummary {
        self.appointments
            .iter()
            .filter(|appointment| appointment.state != LifecycleState::Cancelled)
            .fold(UrgencySummary::default(), |mut summary, appointment| {
                if appointment.day_delta == 0 {
                    summary.today += 1;
                }

                match appointment.urgency {
                    Urgency::Overdue if appointment.state == LifecycleState::Scheduled => {
                        summary.overdue += 1;
                    }
                    Urgency::Tomorrow => summary.tomorrow += 1,
                    Urgency::Upcoming => summary.upcoming += 1,
                    Urgency::Future => summary.future += 1,
                    Urgency::Overdue | Urgency::Today => {}
                }

                summary
            })
    }

    /// Promotions active at evaluation time.
    pub fn active_promotions(&self) -> impl Iterator<Item = &DerivedPromotion> {
        self.promotions
            .iter()
            .filter(|promotion| promotion.status == PromotionStatus::Active)
    }

    /// Whether `record` was flagged.
    pub fn is_flagged(&self, record: RecordRef) -> bool {
        self.flagged.iter().any(|flagged| flagged.record == record)
    }
}

/// Derive views for every record at `now`.
///
/// # Errors
///
/// Returns [`UnmappedCategoryError`] when the configured palette cannot map an
/// urgency. Per-record date errors are collected in
/// [`Reevaluation::flagged`] instead.
pub fn reevaluate(
    appointments: &[Appointment],
    promotions: &[Promotion],
    now: Timestamp,
    config: &EngineConfig,
) -> Result<Reevaluation, UnmappedCategoryError> {
    let mut flagged = Vec::new();
    let mut derived_appointments = Vec::with_capacity(appointments.len());
    let mut derived_promotions = Vec::with_capacity(promotions.len());

    for appointment in appointments {
        match derive_appointment(appointment, now, config)? {
            Ok(derived) => derived_appointments.push(derived),
            Err(error) => {
                warn!(appointment_id = appointment.id, %error, "flagged appointment");

                flagged.push(FlaggedRecord {
                    record: RecordRef::Appointment(appointment.id),
                    error,
                });
            }
        }
    }

    for promotion in promotions {
        match derive_promotion(promotion, now, config) {
            Ok(derived) => derived_promotions.push(derived),
            Err(error) => {
                warn!(promotion_id = promotion.id, %error, "flagged promotion");

                flagged.push(FlaggedRecord {
                    record: RecordRef::Promotion(promotion.id),
                    error,
                });
            }
        }
    }

    debug!(
        appointments = derived_appointments.len(),
        promotions = derived_promotions.len(),
        flagged = flagged.len(),
        "re-evaluated records"
    );

    Ok(Reevaluation {
        evaluated_at: now,
        appointments: derived_appointments,
        promotions: derived_promotions,
        flagged,
    })
}

/// The outer result carries programming errors, the inner one record errors.
fn derive_appointment(
    appointment: &Appointment,
    now: Timestamp,
    config: &EngineConfig,
) -> Result<Result<DerivedAppointment, InvalidDateError>, UnmappedCategoryError> {
    let timezone = config.timezone();

    let schedule = match appointment.schedule(timezone) {
        Ok(schedule) => schedule,
        Err(error) => return Ok(Err(error)),
    };

    let urgency = schedule.urgency(now, timezone);
    let day_delta = schedule.day_delta(now, timezone);
    let effective = effective_status(appointment.state, schedule.at, now);

    Ok(Ok(DerivedAppointment {
        id: appointment.id,
        date: schedule.date,
        time: schedule.time,
        scheduled_at: schedule.at,
        state: appointment.state,
        effective_status: effective,
        status_token: status_category(effective),
        urgency,
        category_token: config.urgency_token(urgency)?.to_owned(),
        day_delta,
        relative_label: relative_label(day_delta),
        detail: appointment.detail.clone(),
    }))
}

fn derive_promotion(
    promotion: &Promotion,
    now: Timestamp,
    config: &EngineConfig,
) -> Result<DerivedPromotion, InvalidDateError> {
    let window = promotion.window()?;
    let status = window.status(now, config.timezone());

    Ok(DerivedPromotion {
        id: promotion.id,
        name: promotion.name.clone(),
        window,
        status,
        category_token: promotion_category(status),
    })
}

/// Engine bound to a configuration and a clock.
///
/// Every call reads the clock afresh; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct StatusEngine<C> {
    config: EngineConfig,
    clock: C,
}

impl<C: Clock> StatusEngine<C> {
    /// Create an engine.
    pub fn new(config: EngineConfig, clock: C) -> Self {
        Self { config, clock }
    }

    /// Configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Re-evaluate a snapshot at the clock's current instant.
    ///
    /// # Errors
    ///
    /// See [`reevaluate`].
    pub fn reevaluate(
        &self,
        appointments: &[Appointment],
        promotions: &[Promotion],
    ) -> Result<Reevaluation, UnmappedCategoryError> {
        reevaluate(appointments, promotions, self.clock.now(), &self.config)
    }

    /// Effective status of a single appointment right now.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidDateError`] when the record is malformed.
    pub fn effective_status(
        &self,
        appointment: &Appointment,
    ) -> Result<LifecycleState, InvalidDateError> {
        let schedule = appointment.schedule(self.config.timezone())?;

        Ok(effective_status(appointment.state, schedule.at, self.clock.now()))
    }

    /// Status of a single promotion right now.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidDateError`] when the record is malformed.
    pub fn promotion_status(&self, promotion: &Promotion) -> Result<PromotionStatus, InvalidDateError> {
        Ok(promotion
            .window()?
            .status(self.clock.now(), self.config.timezone()))
    }
}
