//! Appointments
//!
//! Appointment records as delivered by the salon backend, their persisted
//! lifecycle, and the time-derived urgency and effective status.

use std::fmt;

use jiff::{
    Timestamp,
    civil::{Date, Time},
    tz::TimeZone,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    dates::{
        InvalidDateError, days_between, local_today, parse_calendar_date, parse_clock_time,
        scheduled_instant,
    },
    labels::urgency_category,
};

/// Days ahead (inclusive) that still count as upcoming.
pub const UPCOMING_WINDOW_DAYS: i32 = 7;

/// Appointment identifier
pub type AppointmentId = u64;

/// Persisted appointment lifecycle.
///
/// Serialised with the backend's tags; the English names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Booked and not yet attended.
    #[serde(rename = "Programada", alias = "Scheduled")]
    Scheduled,

    /// Attended.
    #[serde(rename = "Completada", alias = "Completed")]
    Completed,

    /// Called off. Terminal.
    #[serde(rename = "Cancelada", alias = "Cancelled")]
    Cancelled,
}

impl LifecycleState {
    /// The backend tag for this state.
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::Scheduled => "Programada",
            Self::Completed => "Completada",
            Self::Cancelled => "Cancelada",
        }
    }

    /// Validate an explicit staff transition.
    ///
    /// Only a scheduled appointment may be marked completed or cancelled.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] for any other combination.
    pub fn transition(self, to: LifecycleState) -> Result<LifecycleState, TransitionError> {
        match (self, to) {
            (Self::Scheduled, Self::Completed | Self::Cancelled) => Ok(to),
            _ => Err(TransitionError { from: self, to }),
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Rejected lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("appointment cannot move from {from} to {to}")]
pub struct TransitionError {
    /// Current state.
    pub from: LifecycleState,

    /// Requested state.
    pub to: LifecycleState,
}

/// How soon, or how overdue, an appointment is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// The scheduled instant has passed.
    Overdue,

    /// Later today.
    Today,

    /// Tomorrow.
    Tomorrow,

    /// Within the next week.
    Upcoming,

    /// Further out.
    Future,
}

impl Urgency {
    /// Every urgency, in order of increasing distance.
    pub const ALL: [Urgency; 5] = [
        Self::Overdue,
        Self::Today,
        Self::Tomorrow,
        Self::Upcoming,
        Self::Future,
    ];
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(urgency_category(*self))
    }
}

/// Employee and service details joined onto an appointment by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDetail {
    /// Attending employee.
    #[serde(default, alias = "empleado", skip_serializing_if = "Option::is_none")]
    pub employee: Option<String>,

    /// Booked service.
    #[serde(default, alias = "servicio", skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    /// Client name.
    #[serde(default, alias = "cliente", skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

/// Appointment as fetched from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Identifier
    #[serde(alias = "cit_id")]
    pub id: AppointmentId,

    /// Scheduled day, possibly carrying a time or offset suffix.
    #[serde(alias = "cit_fecha")]
    pub date: String,

    /// Salon-local clock time.
    #[serde(alias = "cit_hora")]
    pub time: String,

    /// Persisted lifecycle state.
    #[serde(alias = "estado")]
    pub state: LifecycleState,

    /// Optional enrichment.
    #[serde(default, alias = "detalle", skip_serializing_if = "Option::is_none")]
    pub detail: Option<AppointmentDetail>,
}

impl Appointment {
    /// Create a scheduled appointment without enrichment.
    pub fn scheduled(id: AppointmentId, date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            id,
            date: date.into(),
            time: time.into(),
            state: LifecycleState::Scheduled,
            detail: None,
        }
    }

    /// Replace the persisted state.
    #[must_use]
    pub fn with_state(mut self, state: LifecycleState) -> Self {
        self.state = state;
        self
    }

    /// Attach employee/service enrichment.
    #[must_use]
    pub fn with_detail(mut self, detail: AppointmentDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Parse the date and time and place them on the timeline.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidDateError`] when either value is malformed.
    pub fn schedule(&self, timezone: &TimeZone) -> Result<Schedule, InvalidDateError> {
        let date = parse_calendar_date(&self.date)?;
        let time = parse_clock_time(&self.time)?;
        let at = scheduled_instant(date, time, timezone)?;

        Ok(Schedule { date, time, at })
    }
}

/// Parsed appointment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Calendar date.
    pub date: Date,

    /// Salon-local clock time.
    pub time: Time,

    /// Instant the slot begins.
    pub at: Timestamp,
}

impl Schedule {
    /// Whole days between the salon's current date and this slot.
    pub fn day_delta(&self, now: Timestamp, timezone: &TimeZone) -> i32 {
        days_between(local_today(now, timezone), self.date)
    }

    /// Urgency of this slot at `now`.
    pub fn urgency(&self, now: Timestamp, timezone: &TimeZone) -> Urgency {
        classify_urgency(self.day_delta(now, timezone), self.at, now)
    }
}

/// Urgency of a salon-local `date` and `time` at `now`.
///
/// # Errors
///
/// Returns [`InvalidDateError::OutOfRange`] if the slot cannot be resolved.
pub fn appointment_urgency(
    date: Date,
    time: Time,
    now: Timestamp,
    timezone: &TimeZone,
) -> Result<Urgency, InvalidDateError> {
    let at = scheduled_instant(date, time, timezone)?;
    let delta = days_between(local_today(now, timezone), date);

    Ok(classify_urgency(delta, at, now))
}

/// The elapsed-time check runs first, so a slot earlier today is overdue.
fn classify_urgency(day_delta: i32, scheduled_at: Timestamp, now: Timestamp) -> Urgency {
    if scheduled_at < now {
        Urgency::Overdue
    } else if day_delta == 0 {
        Urgency::Today
    } else if day_delta == 1 {
        Urgency::Tomorrow
    } else if (1..=UPCOMING_WINDOW_DAYS).contains(&day_delta) {
        Urgency::Upcoming
    } else {
        Urgency::Future
    }
}

/// Lifecycle state after the elapsed-time completion rule.
///
/// Completed and cancelled states are returned unchanged. A scheduled
/// appointment whose slot has passed is projected as completed; the persisted
/// state is not touched.
pub fn effective_status(
    state: LifecycleState,
    scheduled_at: Timestamp,
    now: Timestamp,
) -> LifecycleState {
    match state {
        LifecycleState::Scheduled if scheduled_at < now => LifecycleState::Completed,
        state => state,
    }
}

#[cfg(test)]
mod tests {
    use jiff::{ToSpan, civil::date, civil::time, tz};
    use testresult::TestResult;

    use super::*;

    fn bogota() -> TimeZone {
        TimeZone::fixed(tz::offset(-5))
    }

    fn local(date: Date, hour: i8, minute: i8) -> Result<Timestamp, jiff::Error> {
        Ok(date.at(hour, minute, 0, 0).to_zoned(bogota())?.timestamp())
    }

    #[test]
    fn urgency_today_before_slot() -> TestResult {
        let today = date(2024, 1, 20);
        let now = local(today, 9, 0)?;

        let urgency = appointment_urgency(today, time(10, 0, 0, 0), now, &bogota())?;

        assert_eq!(urgency, Urgency::Today);

        Ok(())
    }

    #[test]
    fn urgency_today_after_slot_is_overdue() -> TestResult {
        let today = date(2024, 1, 20);
        let now = local(today, 9, 0)?;

        let urgency = appointment_urgency(today, time(8, 0, 0, 0), now, &bogota())?;

        assert_eq!(urgency, Urgency::Overdue);

        Ok(())
    }

    #[test]
    fn urgency_exact_slot_instant_is_not_overdue() -> TestResult {
        let today = date(2024, 1, 20);
        let now = local(today, 10, 0)?;

        let urgency = appointment_urgency(today, time(10, 0, 0, 0), now, &bogota())?;

        assert_eq!(urgency, Urgency::Today);

        Ok(())
    }

    #[test]
    fn urgency_by_day_distance() -> TestResult {
        let today = date(2024, 1, 20);
        let now = local(today, 12, 0)?;
        let slot = time(9, 0, 0, 0);

        let cases = [
            (today.checked_sub(1.day())?, Urgency::Overdue),
            (today.checked_add(1.day())?, Urgency::Tomorrow),
            (today.checked_add(2.days())?, Urgency::Upcoming),
            (today.checked_add(7.days())?, Urgency::Upcoming),
            (today.checked_add(8.days())?, Urgency::Future),
            (today.checked_add(90.days())?, Urgency::Future),
        ];

        for (day, expected) in cases {
            assert_eq!(
                appointment_urgency(day, slot, now, &bogota())?,
                expected,
                "unexpected urgency for {day}"
            );
        }

        Ok(())
    }

    #[test]
    fn effective_status_completes_past_scheduled() -> TestResult {
        let slot = local(date(2024, 1, 20), 10, 0)?;
        let before = local(date(2024, 1, 20), 9, 59)?;
        let after = local(date(2024, 1, 20), 10, 1)?;

        assert_eq!(
            effective_status(LifecycleState::Scheduled, slot, before),
            LifecycleState::Scheduled
        );
        assert_eq!(
            effective_status(LifecycleState::Scheduled, slot, after),
            LifecycleState::Completed
        );

        Ok(())
    }

    #[test]
    fn effective_status_never_overrides_terminal_states() -> TestResult {
        let slot = local(date(2024, 1, 20), 10, 0)?;
        let before = local(date(2024, 1, 19), 10, 0)?;
        let after = local(date(2024, 2, 20), 10, 0)?;

        for now in [before, after] {
            assert_eq!(
                effective_status(LifecycleState::Cancelled, slot, now),
                LifecycleState::Cancelled
            );
            assert_eq!(
                effective_status(LifecycleState::Completed, slot, now),
                LifecycleState::Completed
            );
        }

        Ok(())
    }

    #[test]
    fn transitions_only_leave_scheduled() -> TestResult {
        use LifecycleState::{Cancelled, Completed, Scheduled};

        assert_eq!(Scheduled.transition(Completed)?, Completed);
        assert_eq!(Scheduled.transition(Cancelled)?, Cancelled);

        for (from, to) in [
            (Scheduled, Scheduled),
            (Completed, Scheduled),
            (Completed, Cancelled),
            (Cancelled, Scheduled),
            (Cancelled, Completed),
        ] {
            assert_eq!(from.transition(to), Err(TransitionError { from, to }));
        }

        Ok(())
    }

    #[test]
    fn deserializes_backend_payload() -> TestResult {
        let appointment: Appointment = serde_json::from_str(
            r#"{
                "cit_id": 7,
                "cit_fecha": "2024-01-20T00:00:00Z",
                "cit_hora": "14:00",
                "estado": "Programada",
                "detalle": { "empleado": "María González", "servicio": "Coloración" }
            }"#,
        )?;

        assert_eq!(appointment.id, 7);
        assert_eq!(appointment.state, LifecycleState::Scheduled);
        assert_eq!(
            appointment.detail.and_then(|detail| detail.employee),
            Some("María González".to_string())
        );

        Ok(())
    }

    #[test]
    fn urgency_displays_as_its_category_token() {
        for urgency in Urgency::ALL {
            assert_eq!(urgency.to_string(), urgency_category(urgency));
        }

        assert_eq!(Urgency::Overdue.to_string(), "overdue");
    }

    #[test]
    fn deserializes_english_state_names() -> TestResult {
        let state: LifecycleState = serde_json::from_str(r#""Cancelled""#)?;

        assert_eq!(state, LifecycleState::Cancelled);
        assert_eq!(serde_json::to_string(&state)?, r#""Cancelada""#);

        Ok(())
    }

    #[test]
    fn schedule_reports_malformed_fields() {
        let bad_date = Appointment::scheduled(1, "2024-02-31", "10:00");
        let bad_time = Appointment::scheduled(2, "2024-02-01", "10h");

        assert!(matches!(
            bad_date.schedule(&bogota()),
            Err(InvalidDateError::Date { .. })
        ));
        assert!(matches!(
            bad_time.schedule(&bogota()),
            Err(InvalidDateError::Time { .. })
        ));
    }
}
