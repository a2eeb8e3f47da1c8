mod cli;
mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    platform::logging::initialize(cli.log.into(), cli.verbose);

    let config = platform::config::AppConfig::from_env().with_overrides(&cli);
    platform::run(cli.command, config)
}
