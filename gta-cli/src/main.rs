//! GTA CLI - Command line tool for exploring gridded temperature anomalies.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "gta-cli",
    version,
    about = "Global temperature anomaly grid toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: gta_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[GTA] cli: starting");
    gta_cmd::run(cli.command)
}
