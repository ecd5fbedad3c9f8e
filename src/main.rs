use anyhow::Result;
use clap::Parser;
use icoforge::cli::{Cli, Commands};
use icoforge::commands;
use icoforge::commands::convert::ConvertArgs;
use icoforge::commands::AlreadyReported;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Init { force } => commands::init::run(&cli, *force),
        Commands::Convert {
            input,
            output,
            transparency,
            tolerance,
            bleed,
            timeout,
            json,
            force,
        } => {
            let args = ConvertArgs {
                input: input.clone(),
                output: output.clone(),
                transparency: *transparency,
                tolerance: *tolerance,
                bleed: *bleed,
                timeout: *timeout,
                json: *json,
                force: *force,
            };
            commands::convert::run(&cli, args).await
        }
        Commands::Check { input } => commands::check::run(&cli, input).await,
    };

    match result {
        Err(e) if e.is::<AlreadyReported>() => std::process::exit(1),
        other => other,
    }
}
