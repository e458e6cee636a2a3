mod cli_args;
mod reporter;
mod state;

use appmeta_diagnostics::enable_tracing_by_env;
use clap::Parser;
use cli_args::CliArgs;
use state::State;

pub async fn run_cli() -> miette::Result<()> {
    enable_tracing_by_env();
    CliArgs::parse().run().await
}
