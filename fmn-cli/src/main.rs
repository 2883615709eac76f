//! fmn-cli - Command line tool for forecasting flood-monitoring readings.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "fmn-cli",
    version,
    about = "Flood monitoring forecasting toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: fmn_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    fmn_cmd::run(cli.command).await
}
