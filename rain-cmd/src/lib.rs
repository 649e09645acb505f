//! Command implementations for the rainfall CLI.
//!
//! Each subcommand opens the configured store, runs against a fresh
//! [`Session`](session::Session) and writes its report to the given writer.

use clap::Subcommand;
use rain_cache::CacheKey;
use rain_chart::Stacking;
use rain_core::Aggregator;
use std::io::Write;
use std::path::PathBuf;

pub mod report;
pub mod session;
pub mod settings;

use session::Session;
use settings::Settings;

/// Printed by `analyse --save` when the dataset has no source name.
pub const NOTHING_TO_SAVE: &str = "No file loaded to save";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Aggregate a daily rainfall CSV into monthly minimum, maximum and total
    Analyse {
        /// Daily rainfall CSV file
        input: PathBuf,

        /// Save the analysed data, keyed by the input file name
        #[arg(long)]
        save: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show previously saved analysed data
    Load {
        /// File name the data was saved under
        key: String,

        #[arg(long)]
        json: bool,
    },

    /// List saved analysed data
    List,

    /// Decompose monthly statistics into stacked chart segments
    Chart {
        /// Daily rainfall CSV file to analyse
        #[arg(short, long, conflicts_with = "key", required_unless_present = "key")]
        input: Option<PathBuf>,

        /// Saved analysed data to chart
        #[arg(short, long)]
        key: Option<String>,

        /// End each bar at the monthly total (top segment total - max)
        /// instead of total + min
        #[arg(long)]
        true_total: bool,

        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: Command, settings: &Settings) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_to(command, settings, &mut out)
}

/// Run `command` and write its report to `out`.
pub fn run_to<W: Write>(command: Command, settings: &Settings, out: &mut W) -> anyhow::Result<()> {
    let aggregator = Aggregator::new(settings.input_format()?);
    let mut session = Session::new(aggregator, settings.open_store()?);

    match command {
        Command::Analyse { input, save, json } => {
            let dataset = session.open_file(&input)?;
            log::info!("analyse: {} months from {}", dataset.len(), input.display());
            if json {
                report::write_dataset_json(out, &dataset)?;
            } else {
                writeln!(out, "{} successfully loaded", display_name(dataset.source_name()))?;
                report::write_dataset(out, &dataset)?;
            }
            if save {
                let message = match session.save_current()? {
                    Some(key) => format!("{key} successfully saved"),
                    None => NOTHING_TO_SAVE.to_string(),
                };
                if json {
                    log::info!("analyse: {message}");
                } else {
                    writeln!(out, "{message}")?;
                }
            }
        }
        Command::Load { key, json } => {
            let key = parse_key(&key)?;
            let dataset = session.open_cached(&key)?;
            if json {
                report::write_dataset_json(out, &dataset)?;
            } else {
                writeln!(out, "{key} successfully loaded")?;
                report::write_dataset(out, &dataset)?;
            }
        }
        Command::List => {
            let keys = session.saved_keys()?;
            report::write_keys(out, &keys)?;
        }
        Command::Chart {
            input,
            key,
            true_total,
            json,
        } => {
            match (input, key) {
                (Some(input), _) => {
                    session.open_file(&input)?;
                }
                (None, Some(key)) => {
                    session.open_cached(&parse_key(&key)?)?;
                }
                (None, None) => anyhow::bail!("chart needs --input or --key"),
            }
            let stacking = if true_total {
                Stacking::TrueTotal
            } else {
                Stacking::OffsetTotal
            };
            let chart = session.chart(stacking);
            log::info!("chart: {} bars, {:?}", chart.categories.len(), stacking);
            if json {
                report::write_chart_json(out, &chart)?;
            } else {
                report::write_chart(out, &chart)?;
            }
        }
    }
    Ok(())
}

fn parse_key(key: &str) -> anyhow::Result<CacheKey> {
    key.parse::<CacheKey>().map_err(anyhow::Error::msg)
}

fn display_name(source_name: Option<&str>) -> &str {
    source_name.unwrap_or("<unnamed>")
}
