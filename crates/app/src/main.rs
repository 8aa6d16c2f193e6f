//! Salon Status CLI

use std::process;

use clap::Parser;

use crate::{cli::Cli, error::AppError};

mod cli;
mod config;
mod error;
mod logging;
mod refresh;
mod render;
mod shutdown;
mod snapshot;

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    logging::init_subscriber(&cli.logging)?;

    cli.run().await
}
