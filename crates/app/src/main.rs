use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod error;
mod settings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("{err:?}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: cli::Cli) -> error::Result<()> {
    let settings = settings::load(&cli.global)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "fintrack={level},api_client={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = commands::Context::new(settings)?;
    commands::run(cli.command, &mut ctx).await
}
