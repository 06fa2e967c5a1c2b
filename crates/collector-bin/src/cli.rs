use clap::{Args, Parser, Subcommand, ValueEnum};
use collector_core::Category;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "daily-collector", version, about = "Link new vault files into today's daily note")]
pub struct Cli {
    /// Vault root
    #[arg(short, long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file [default: <root>/.daily-collector.yaml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Watch the vault and keep today's daily note in sync
    Watch,
    /// Print the path of today's daily note
    Today(TodayArgs),
    /// Show or change which file types are collected
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
pub struct TodayArgs {
    /// Create the note if it does not exist yet
    #[arg(long)]
    pub create: bool,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the collection settings
    Show,
    /// Turn one file category on or off
    Set {
        #[arg(value_parser = parse_category)]
        category: Category,
        state: Switch,
    },
    /// Collect only markdown files (on), or every file type (off)
    OnlyMarkdown { state: Switch },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn enabled(self) -> bool {
        self == Switch::On
    }
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse()
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.root.join(collector_core::CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from(["daily-collector", "config", "set", "images", "off"]).unwrap();
        match cli.command {
            Command::Config(ConfigCommand::Set { category, state }) => {
                assert_eq!(category, Category::Image);
                assert_eq!(state, Switch::Off);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        assert!(Cli::try_parse_from(["daily-collector", "config", "set", "spreadsheets", "on"]).is_err());
    }

    #[test]
    fn test_default_config_path_is_under_root() {
        let cli = Cli::try_parse_from(["daily-collector", "--root", "/vault", "watch"]).unwrap();
        assert_eq!(cli.config_path(), PathBuf::from("/vault/.daily-collector.yaml"));

        let cli = Cli::try_parse_from(["daily-collector", "watch", "--config", "/etc/dc.yaml"]).unwrap();
        assert_eq!(cli.config_path(), PathBuf::from("/etc/dc.yaml"));
    }
}
