use anyhow::Context;
use clap::Parser;
use cpool_cli::{Cli, load_settings, run};

#[cpool_runtime::main(compact)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log = cli.logger(env!("CARGO_BIN_NAME")).init()?;

    let settings =
        load_settings(cli.config.as_deref()).context("Critical: Configuration is malformed")?;

    run(settings, cli.command, &mut std::io::stdout().lock()).await
}
