use clap::Parser;
use tracing::info;

use petdoor_cli::cli::{Cli, Command};
use petdoor_cli::{DaemonConfig, RunOptions, commands, logging, run_until};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_json)?;

    let config = DaemonConfig::load_or_default(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            info!(version = petdoor_core::VERSION, "starting petdoord");
            run_until(config, RunOptions { console: true }, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "failed to listen for ctrl-c");
                }
            })
            .await
        }
        Command::Provision(args) => commands::provision(&config.store, &args),
        Command::Show => {
            for line in commands::show(&config.store)? {
                println!("{line}");
            }
            Ok(())
        }
        Command::Erase => commands::erase(&config.store),
    }
}
