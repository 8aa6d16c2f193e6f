use clap::{Parser, Subcommand};

use crate::{
    config::{EngineArgs, LoggingConfig},
    error::AppError,
};

mod evaluate;
mod watch;

#[derive(Debug, Parser)]
#[command(
    name = "salon-status",
    about = "Promotion and appointment status for the salon",
    long_about = None
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify a snapshot once and print the report
    Evaluate(evaluate::EvaluateArgs),

    /// Re-classify a snapshot on a fixed interval until interrupted
    Watch(watch::WatchArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), AppError> {
        match self.command {
            Commands::Evaluate(args) => evaluate::run(&self.engine, &args),
            Commands::Watch(args) => watch::run(&self.engine, args).await,
        }
    }
}
