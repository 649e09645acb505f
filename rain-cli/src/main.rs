//! rain-cli - analyse daily rainfall CSV files into monthly stacked charts.

use clap::Parser;
use rain_cmd::settings::Settings;

#[derive(Parser)]
#[command(
    name = "rain-cli",
    version,
    about = "Monthly minimum, maximum and total rainfall from daily CSV files"
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: rain_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("cli: cache dir {}", cli.settings.cache_dir.display());
    rain_cmd::run(cli.command, &cli.settings)
}
