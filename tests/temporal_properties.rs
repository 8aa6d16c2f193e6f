//! Integration tests for promotion and appointment temporal status

use jiff::{
    Timestamp, ToSpan,
    civil::{Date, date, time},
    tz::{self, TimeZone},
};
use rust_decimal::Decimal;
use testresult::TestResult;

use salon_status::{
    appointments::{Appointment, LifecycleState, Urgency, appointment_urgency, effective_status},
    clock::FixedClock,
    config::EngineConfig,
    dates::{InvalidDateError, day_delta},
    evaluation::{RecordRef, StatusEngine, reevaluate},
    labels::relative_label,
    promotions::{Promotion, PromotionStatus, promotion_status},
};

fn salon() -> TimeZone {
    TimeZone::fixed(tz::offset(-5))
}

fn local(day: Date, hour: i8, minute: i8, second: i8) -> Result<Timestamp, jiff::Error> {
    Ok(day.at(hour, minute, second, 0).to_zoned(salon())?.timestamp())
}

#[test]
fn promotion_window_is_inclusive_at_both_ends() -> TestResult {
    let start = date(2024, 3, 1);
    let end = date(2024, 3, 8);

    let cases = [
        (local(date(2024, 2, 29), 12, 0, 0)?, PromotionStatus::Scheduled),
        (local(date(2024, 2, 29), 23, 59, 59)?, PromotionStatus::Scheduled),
        (local(date(2024, 3, 1), 0, 0, 0)?, PromotionStatus::Active),
        (local(date(2024, 3, 4), 12, 0, 0)?, PromotionStatus::Active),
        (local(date(2024, 3, 8), 23, 59, 59)?, PromotionStatus::Active),
        (local(date(2024, 3, 9), 0, 0, 0)?, PromotionStatus::Expired),
    ];

    for (now, expected) in cases {
        assert_eq!(
            promotion_status(start, end, now, &salon()),
            expected,
            "unexpected status at {now}"
        );
    }

    Ok(())
}

#[test]
fn same_day_appointment_past_its_time_is_overdue() -> TestResult {
    let today = date(2024, 1, 20);
    let now = local(today, 9, 0, 0)?;

    assert_eq!(
        appointment_urgency(today, time(8, 0, 0, 0), now, &salon())?,
        Urgency::Overdue
    );
    assert_eq!(
        appointment_urgency(today, time(10, 0, 0, 0), now, &salon())?,
        Urgency::Today
    );

    Ok(())
}

#[test]
fn relative_labels_round_trip_their_day_count() -> TestResult {
    for delta in -30..=30 {
        let label = relative_label(delta);

        let recovered: Option<u32> = if let Some(rest) = label.strip_prefix("Hace ") {
            Some(rest.split(' ').next().ok_or("missing count")?.parse()?)
        } else if let Some(rest) = label.strip_prefix("En ") {
            Some(rest.split(' ').next().ok_or("missing count")?.parse()?)
        } else {
            None
        };

        match delta {
            0 => assert_eq!(label, "Hoy"),
            1 => assert_eq!(label, "Mañana"),
            _ => assert_eq!(recovered, Some(delta.unsigned_abs()), "label `{label}`"),
        }

        if delta < 0 {
            assert!(label.starts_with("Hace "), "label `{label}`");
        } else if delta > 1 {
            assert!(label.starts_with("En "), "label `{label}`");
        }
    }

    Ok(())
}

#[test]
fn day_delta_ignores_time_of_day_noise() -> TestResult {
    let day = date(2024, 1, 20);
    let just_after_midnight = local(day, 0, 0, 1)?;
    let just_before_midnight = local(day, 23, 59, 59)?;

    for target in ["2024-01-10", "2024-01-20", "2024-01-21", "2024-02-20T00:00:00Z"] {
        assert_eq!(
            day_delta(target, just_after_midnight, &salon())?,
            day_delta(target, just_before_midnight, &salon())?,
            "delta drifted for {target}"
        );
    }

    assert_eq!(day_delta("2024-02-20T00:00:00Z", just_before_midnight, &salon())?, 31);

    Ok(())
}

#[test]
fn day_delta_is_whole_days_across_dst() -> TestResult {
    let new_york = TimeZone::get("America/New_York")?;
    let now = date(2024, 3, 9).at(12, 0, 0, 0).to_zoned(new_york.clone())?.timestamp();

    // 2024-03-10 is 23 hours long in New York.
    assert_eq!(day_delta("2024-03-11", now, &new_york)?, 2);

    Ok(())
}

#[test]
fn auto_completion_is_monotonic() -> TestResult {
    let appointment = Appointment::scheduled(1, "2024-01-20", "10:00");
    let schedule = appointment.schedule(&salon())?;

    let first_completed = schedule.at.checked_add(1.second())?;

    assert_eq!(
        effective_status(appointment.state, schedule.at, schedule.at),
        LifecycleState::Scheduled
    );

    for offset in [0_i64, 1, 60, 3_600, 86_400, 31_536_000] {
        let later = first_completed.checked_add(offset.seconds())?;

        assert_eq!(
            effective_status(appointment.state, schedule.at, later),
            LifecycleState::Completed,
            "reverted at {later}"
        );
    }

    Ok(())
}

#[test]
fn cancelled_records_never_change() -> TestResult {
    let slot = local(date(2024, 1, 20), 10, 0, 0)?;

    for now in [
        local(date(2023, 1, 1), 0, 0, 0)?,
        slot,
        local(date(2030, 1, 1), 0, 0, 0)?,
    ] {
        assert_eq!(
            effective_status(LifecycleState::Cancelled, slot, now),
            LifecycleState::Cancelled
        );
    }

    Ok(())
}

#[test]
fn one_malformed_record_does_not_blank_the_batch() -> TestResult {
    let now = local(date(2024, 1, 20), 9, 0, 0)?;
    let appointments = [
        Appointment::scheduled(1, "2024-01-19", "10:00"),
        Appointment::scheduled(2, "2024-01-20", "10:00"),
        Appointment::scheduled(3, "20-01-2024", "10:00"),
        Appointment::scheduled(4, "2024-01-21T00:00:00-05:00", "10:00"),
        Appointment::scheduled(5, "2024-02-20", "10:00"),
    ];

    let result = reevaluate(&appointments, &[], now, &EngineConfig::new(salon()))?;

    let urgencies: Vec<(u64, Urgency)> = result
        .appointments
        .iter()
        .map(|derived| (derived.id, derived.urgency))
        .collect();

    assert_eq!(
        urgencies,
        vec![
            (1, Urgency::Overdue),
            (2, Urgency::Today),
            (4, Urgency::Tomorrow),
            (5, Urgency::Future),
        ]
    );

    assert_eq!(result.flagged.len(), 1);

    let flagged = result.flagged.first().ok_or("expected a flagged record")?;

    assert_eq!(flagged.record, RecordRef::Appointment(3));
    assert!(matches!(flagged.error, InvalidDateError::Date { .. }));

    Ok(())
}

#[test]
fn engine_snapshot_from_backend_payload() -> TestResult {
    let appointments: Vec<Appointment> = serde_json::from_str(
        r#"[
            { "cit_id": 1, "cit_fecha": "2024-01-20T00:00:00Z", "cit_hora": "10:00", "estado": "Programada" },
            { "cit_id": 2, "cit_fecha": "2024-01-20T00:00:00Z", "cit_hora": "14:00", "estado": "Cancelada" }
        ]"#,
    )?;
    let promotions = [Promotion {
        id: 1,
        name: "Corte + Barba".to_string(),
        start_date: "2024-01-15".to_string(),
        end_date: "2024-01-20".to_string(),
        discount_percent: Decimal::from(20),
        usage_count: 4,
        service_id: Some(1),
    }];

    let engine = StatusEngine::new(
        EngineConfig::new(salon()),
        FixedClock::new(local(date(2024, 1, 20), 12, 0, 0)?),
    );

    let result = engine.reevaluate(&appointments, &promotions)?;

    assert_eq!(result.pending_completions(), vec![1]);
    let promotion = promotions.first().ok_or("missing promotion")?;

    assert_eq!(engine.promotion_status(promotion)?, PromotionStatus::Active);
    assert_eq!(result.urgency_summary().overdue, 1);

    Ok(())
}
