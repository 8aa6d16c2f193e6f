use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::Args;
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use salon_status::{
    clock::{Clock, SystemClock},
    evaluation::StatusEngine,
    promotions::estimated_savings,
};
use tracing::info;

use crate::{config::EngineArgs, error::AppError, render, snapshot::Snapshot};

#[derive(Debug, Clone, Args)]
pub(crate) struct EvaluateArgs {
    /// JSON snapshot of the appointment and promotion listings
    #[arg(long, env = "SNAPSHOT_PATH")]
    pub(crate) snapshot: PathBuf,

    /// Average service price used to estimate promotion savings
    #[arg(long, env = "AVERAGE_SERVICE_PRICE", default_value = "40000")]
    average_service_price: Decimal,

    /// ISO 4217 currency of the service price
    #[arg(long, env = "CURRENCY", default_value = "COP")]
    currency: String,
}

impl EvaluateArgs {
    fn average_price(&self) -> Result<Money<'static, Currency>, AppError> {
        let currency =
            iso::find(&self.currency).ok_or_else(|| AppError::Currency(self.currency.clone()))?;

        Ok(Money::from_decimal(self.average_service_price, currency))
    }
}

pub(crate) fn run(engine: &EngineArgs, args: &EvaluateArgs) -> Result<(), AppError> {
    let engine = StatusEngine::new(engine.engine_config()?, SystemClock);

    evaluate_once(&engine, args, &mut io::stdout().lock())
}

/// Load the snapshot, classify it and write the report to `out`.
pub(super) fn evaluate_once<C: Clock>(
    engine: &StatusEngine<C>,
    args: &EvaluateArgs,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let snapshot = Snapshot::load(&args.snapshot)?;
    let reevaluation = engine.reevaluate(&snapshot.appointments, &snapshot.promotions)?;
    let savings = estimated_savings(&snapshot.promotions, args.average_price()?)?;

    let pending = reevaluation.pending_completions();

    if !pending.is_empty() {
        info!(appointments = ?pending, "appointments past their slot can be marked completed");
    }

    render::write_report(out, &reevaluation, Some(&savings)).map_err(AppError::Output)
}
