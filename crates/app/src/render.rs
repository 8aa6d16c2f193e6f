//! Report rendering

use std::io;

use rusty_money::{Money, iso::Currency};
use salon_status::{
    appointments::Urgency,
    evaluation::{DerivedAppointment, DerivedPromotion, RecordRef, Reevaluation},
};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Color, Style, Theme,
        object::{Columns, Rows},
    },
};

/// Write the appointment and promotion tables followed by a summary.
pub(crate) fn write_report(
    out: &mut impl io::Write,
    reevaluation: &Reevaluation,
    savings: Option<&Money<'_, Currency>>,
) -> io::Result<()> {
    writeln!(out, "Evaluado: {}", reevaluation.evaluated_at)?;

    if reevaluation.appointments.is_empty() {
        writeln!(out, "\nSin citas")?;
    } else {
        writeln!(out, "\n{}", appointments_table(&reevaluation.appointments))?;
    }

    if !reevaluation.promotions.is_empty() {
        writeln!(out, "\n{}", promotions_table(&reevaluation.promotions))?;
    }

    write_summary(out, reevaluation, savings)
}

fn appointments_table(appointments: &[DerivedAppointment]) -> String {
    let mut builder = Builder::default();

    builder.push_record([
        "Cita", "Fecha", "Hora", "Cuándo", "Urgencia", "Estado", "Empleado", "Servicio",
    ]);

    let mut colors = Vec::with_capacity(appointments.len());

    for (row, appointment) in appointments.iter().enumerate() {
        let detail = appointment.detail.as_ref();

        builder.push_record([
            appointment.id.to_string(),
            appointment.date.to_string(),
            appointment.time.strftime("%H:%M").to_string(),
            appointment.relative_label.clone(),
            appointment.category_token.clone(),
            appointment.effective_status.to_string(),
            detail
                .and_then(|detail| detail.employee.clone())
                .unwrap_or_else(|| "-".to_string()),
            detail
                .and_then(|detail| detail.service.clone())
                .unwrap_or_else(|| "-".to_string()),
        ]);

        colors.push((row + 1, urgency_color(appointment.urgency)));
    }

    let mut table = builder.build();

    table.with(theme());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::first(), color_dark_grey());

    for (row, color) in colors {
        table.modify((row, 4), color);
    }

    table.to_string()
}

fn promotions_table(promotions: &[DerivedPromotion]) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Promoción", "Nombre", "Inicio", "Fin", "Estado"]);

    for promotion in promotions {
        builder.push_record([
            promotion.id.to_string(),
            promotion.name.clone(),
            promotion.window.start().to_string(),
            promotion.window.end().to_string(),
            promotion.status.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(theme());
    table.modify(Rows::first(), Color::BOLD);

    table.to_string()
}

fn write_summary(
    out: &mut impl io::Write,
    reevaluation: &Reevaluation,
    savings: Option<&Money<'_, Currency>>,
) -> io::Result<()> {
    let summary = reevaluation.urgency_summary();

    writeln!(out)?;
    writeln!(out, "Citas hoy: {}", summary.today)?;
    writeln!(out, "Citas vencidas: {}", summary.overdue)?;
    writeln!(
        out,
        "Próximas: {} mañana, {} esta semana, {} después",
        summary.tomorrow, summary.upcoming, summary.future
    )?;
    writeln!(
        out,
        "Promociones activas: {}",
        reevaluation.active_promotions().count()
    )?;

    if let Some(savings) = savings {
        writeln!(out, "Ahorro estimado: {savings}")?;
    }

    let pending = reevaluation.pending_completions();

    if !pending.is_empty() {
        writeln!(out, "Por completar: {}", join_ids(pending))?;
    }

    for flagged in &reevaluation.flagged {
        let record = match flagged.record {
            RecordRef::Appointment(id) => format!("cita {id}"),
            RecordRef::Promotion(id) => format!("promoción {id}"),
        };

        writeln!(out, "Registro inválido ({record}): {}", flagged.error)?;
    }

    Ok(())
}

fn theme() -> Theme {
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    theme
}

fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Overdue => Color::FG_RED,
        Urgency::Today => Color::FG_YELLOW,
        Urgency::Tomorrow => Color::FG_CYAN,
        Urgency::Upcoming => Color::FG_BLUE,
        Urgency::Future => color_dark_grey(),
    }
}

fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}

fn join_ids(ids: impl IntoIterator<Item = u64>) -> String {
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, tz::TimeZone};
    use rust_decimal::Decimal;
    use rusty_money::iso::COP;
    use salon_status::{
        appointments::{Appointment, AppointmentDetail, LifecycleState},
        config::EngineConfig,
        evaluation::reevaluate,
        promotions::Promotion,
    };
    use testresult::TestResult;

    use super::*;

    fn render(reevaluation: &Reevaluation, savings: Option<&Money<'_, Currency>>) -> TestResult<String> {
        let mut out = Vec::new();
        write_report(&mut out, reevaluation, savings)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn renders_appointments_promotions_and_summary() -> TestResult {
        let now: Timestamp = "2024-01-20T14:00:00Z".parse()?;
        let appointments = [
            Appointment::scheduled(1, "2024-01-20", "08:00").with_detail(AppointmentDetail {
                employee: Some("Carlos Rodríguez".to_string()),
                service: Some("Corte de Cabello".to_string()),
                client: None,
            }),
            Appointment::scheduled(2, "2024-01-21", "10:00"),
            Appointment::scheduled(3, "mañana", "10:00"),
        ];
        let promotions = [Promotion {
            id: 7,
            name: "Martes de Color".to_string(),
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-31".to_string(),
            discount_percent: Decimal::from(25),
            usage_count: 2,
            service_id: None,
        }];

        let reevaluation = reevaluate(
            &appointments,
            &promotions,
            now,
            &EngineConfig::new(TimeZone::UTC),
        )?;
        let savings = Money::from_minor(2_000_000, COP);

        let output = render(&reevaluation, Some(&savings))?;

        assert!(output.contains("Carlos Rodríguez"));
        assert!(output.contains("Mañana"));
        assert!(output.contains("Martes de Color"));
        assert!(output.contains("Activa"));
        assert!(output.contains("Por completar: 1"));
        assert!(output.contains("Registro inválido (cita 3)"));
        assert!(output.contains("Ahorro estimado"));

        Ok(())
    }

    #[test]
    fn joins_ids_in_order() {
        assert_eq!(join_ids([3, 1, 2]), "3, 1, 2");
        assert_eq!(join_ids(Vec::new()), "");
    }

    #[test]
    fn summary_counts_finished_appointments_as_today_not_overdue() -> TestResult {
        let now: Timestamp = "2024-01-20T15:00:00Z".parse()?;
        let appointments = [
            Appointment::scheduled(1, "2024-01-20", "09:00").with_state(LifecycleState::Completed),
            Appointment::scheduled(2, "2024-01-20", "11:00"),
            Appointment::scheduled(3, "2024-01-20", "16:00"),
        ];

        let reevaluation = reevaluate(&appointments, &[], now, &EngineConfig::new(TimeZone::UTC))?;
        let output = render(&reevaluation, None)?;

        assert!(output.contains("Citas hoy: 3"), "report: {output}");
        assert!(output.contains("Citas vencidas: 1"), "report: {output}");

        Ok(())
    }

    #[test]
    fn renders_empty_snapshot() -> TestResult {
        let now: Timestamp = "2024-01-20T14:00:00Z".parse()?;
        let reevaluation = reevaluate(&[], &[], now, &EngineConfig::new(TimeZone::UTC))?;

        let output = render(&reevaluation, None)?;

        assert!(output.contains("Sin citas"));
        assert!(output.contains("Citas hoy: 0"));
        assert!(!output.contains("Ahorro estimado"));

        Ok(())
    }
}
