use std::{io, time::Duration};

use clap::Args;
use salon_status::{clock::SystemClock, evaluation::StatusEngine};
use tracing::{error, info};

use super::evaluate::{EvaluateArgs, evaluate_once};
use crate::{
    config::EngineArgs,
    error::AppError,
    refresh::{self, DEFAULT_REFRESH_INTERVAL},
    shutdown,
};

#[derive(Debug, Args)]
pub(crate) struct WatchArgs {
    #[command(flatten)]
    evaluate: EvaluateArgs,

    /// Seconds between re-evaluation passes
    #[arg(
        long,
        env = "REFRESH_INTERVAL_SECONDS",
        default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval_seconds: u64,
}

pub(crate) async fn run(engine: &EngineArgs, args: WatchArgs) -> Result<(), AppError> {
    let engine = StatusEngine::new(engine.engine_config()?, SystemClock);
    let period = Duration::from_secs(args.interval_seconds);
    let evaluate = args.evaluate;

    info!(interval_seconds = args.interval_seconds, "watching snapshot");

    let handle = refresh::spawn(period, move || {
        if let Err(error) = evaluate_once(&engine, &evaluate, &mut io::stdout().lock()) {
            error!(%error, "re-evaluation failed");
        }
    });

    shutdown::wait_for_signal().await?;
    handle.cancel().await;

    Ok(())
}
