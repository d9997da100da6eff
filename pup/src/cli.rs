// pup/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use pup_common::error::Result;
use pup_common::Config;

pub mod list;
pub mod update;

use crate::cli::list::List;
use crate::cli::update::Update;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "pup", bin_name = "pup")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./pup.toml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory plugin files are written to
    #[arg(long, global = true, value_name = "DIR")]
    pub plugin_dir: Option<PathBuf>,

    /// Version ledger file
    #[arg(long, global = true, value_name = "FILE")]
    pub ledger: Option<PathBuf>,

    /// Log file
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl CliArgs {
    /// Loads the configuration and applies command-line overrides on top.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(dir) = &self.plugin_dir {
            config.plugin_dir = dir.clone();
        }
        if let Some(ledger) = &self.ledger {
            config.ledger_file = ledger.clone();
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = log_file.clone();
        }
        Ok(config)
    }

    /// `update` is what runs when no subcommand is given.
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Update(Update))
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check every catalog entry and download what changed (default)
    Update(Update),
    /// Show the catalog and the recorded version of each file
    List(List),
}

impl Command {
    pub async fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Update(command) => command.run(config).await,
            Self::List(command) => command.run(config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn defaults_to_update() {
        let args = CliArgs::try_parse_from(["pup"]).unwrap();
        assert!(matches!(args.command_or_default(), Command::Update(_)));
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "pup",
            "list",
            "-vv",
            "--plugin-dir",
            "/srv/mc/plugins",
            "--ledger",
            "versions.json",
        ])
        .unwrap();
        assert!(matches!(args.command_or_default(), Command::List(_)));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.plugin_dir, Some(PathBuf::from("/srv/mc/plugins")));
        assert_eq!(args.ledger, Some(PathBuf::from("versions.json")));
    }
}
