pub mod cache;
pub mod fetch;
pub mod show;

use crate::State;
use appmeta_config::Config;
use cache::CacheCommand;
use clap::{Parser, Subcommand};
use fetch::FetchArgs;
use show::ShowArgs;
use std::{env, path::PathBuf};

/// Fetch application metadata from the Flathub catalog.
#[derive(Debug, Parser)]
#[clap(name = "appmeta")]
#[clap(bin_name = "appmeta")]
#[clap(version = "0.0.1")]
#[clap(about = "Fetch application metadata from the Flathub catalog")]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: CliCommand,

    /// Directory in which `.appmetarc` is looked up.
    #[clap(short = 'C', long, default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Fetch the catalog metadata of one or more applications.
    Fetch(FetchArgs),
    /// Print the cached metadata of an application.
    Show(ShowArgs),
    /// Managing the disk cache.
    #[clap(subcommand)]
    Cache(CacheCommand),
}

impl CliArgs {
    /// Execute the command
    pub async fn run(self) -> miette::Result<()> {
        let CliArgs { command, dir } = self;
        let current_dir = || env::current_dir().map(|cwd| cwd.join(&dir));
        let config = || -> &'static Config {
            Config::current(current_dir, home::home_dir, Default::default).leak()
        };

        match command {
            CliCommand::Fetch(args) => args.run(State::init(config())).await,
            CliCommand::Show(args) => args.run(config()),
            CliCommand::Cache(command) => command.run(config),
        }
    }
}
