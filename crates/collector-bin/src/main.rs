//! `daily-collector`: links files created in a vault into today's daily note.

mod cli;
mod commands;
mod watch;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, ConfigCommand};
use collector_core::settings::Toggle;
use collector_core::CollectorConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config_path();
    let config = CollectorConfig::load(&config_path)?;

    env_logger::Builder::new()
        .filter_level(config.logging.level.as_filter())
        .parse_env("RUST_LOG")
        .init();

    match cli.command {
        Command::Watch => watch::run(cli.root, config_path, config).await,
        Command::Today(args) => commands::today(&cli.root, &config, args.create),
        Command::Config(ConfigCommand::Show) => {
            commands::show(&config);
            Ok(())
        }
        Command::Config(ConfigCommand::Set { category, state }) => {
            commands::set_category(&config_path, category, state.enabled())
        }
        Command::Config(ConfigCommand::OnlyMarkdown { state }) => {
            commands::set(&config_path, Toggle::OnlyMarkdown, state.enabled())
        }
    }
}
