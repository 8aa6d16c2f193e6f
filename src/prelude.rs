//! Salon Status prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    appointments::{
        Appointment, AppointmentDetail, AppointmentId, LifecycleState, Schedule, TransitionError,
        Urgency, appointment_urgency, effective_status,
    },
    clock::{Clock, FixedClock, SystemClock},
    config::{ConfigError, DEFAULT_SALON_TIMEZONE, EngineConfig},
    dates::{InvalidDateError, day_delta, parse_calendar_date, parse_clock_time},
    evaluation::{
        DerivedAppointment, DerivedPromotion, FlaggedRecord, RecordRef, Reevaluation,
        StatusEngine, UrgencySummary, reevaluate,
    },
    labels::{
        CategoryPalette, PaletteError, UnmappedCategoryError, promotion_category, relative_label,
        status_category, urgency_category,
    },
    promotions::{
        InvalidWindowError, Promotion, PromotionId, PromotionStatus, PromotionWindow,
        SavingsError, active_promotions, estimated_savings, promotion_status,
    },
};
