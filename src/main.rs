//! Command-line front end for the positioning engine
//!
//! ```text
//! rssi-positioning replay reports.jsonl --format csv
//! rssi-positioning simulate --transmitters 4 --rounds 10 --seed 1
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rssi_positioning::api::formatting::TextFormatter;
use rssi_positioning::simulation::spawn_transmitters;
use rssi_positioning::{EngineConfig, EngineError, EstimateEvent, EventFormatter, OutputFormat, PositioningEngine, ReportParser};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Estimate a receiver position from transmitter signal-strength reports.
#[derive(Parser, Debug)]
#[command(name = "rssi-positioning", version)]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Output format for estimates
    #[arg(short, long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Feed newline-delimited JSON payloads through the engine
    Replay {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Reject payloads with missing numeric fields instead of reading them as NaN
        #[arg(long)]
        strict: bool,
    },
    /// Drive simulated transmitters through the engine
    Simulate {
        /// Number of simulated transmitters
        #[arg(short, long, default_value_t = 3)]
        transmitters: usize,

        /// Number of reporting rounds (one report per transmitter each round)
        #[arg(short, long, default_value_t = 5)]
        rounds: usize,

        /// Seed for reproducible placement and noise
        #[arg(long)]
        seed: Option<u64>,

        /// Print the final transmitter scene
        #[arg(long)]
        scene: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Csv => OutputFormat::Csv,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::WARN);

    tracing_subscriber::fmt()
        .with_max_level(log_level_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = match cli.config.as_deref() {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            EngineConfig::load_from_file(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let formatter = EventFormatter::new(cli.format.into());

    match cli.command {
        Command::Replay { input, strict } => {
            let parser = if strict { ReportParser::strict() } else { ReportParser::new() };
            let engine = PositioningEngine::new(config)?.with_parser(parser);
            let reader: Box<dyn BufRead> = if input == "-" {
                Box::new(BufReader::new(io::stdin()))
            } else {
                let file = std::fs::File::open(&input)
                    .with_context(|| format!("failed to open {}", input))?;
                Box::new(BufReader::new(file))
            };
            replay(&engine, &formatter, reader)
        }
        Command::Simulate { transmitters, rounds, seed, scene } => {
            let engine = PositioningEngine::new(config)?;
            simulate(&engine, &formatter, transmitters, rounds, seed)?;
            if scene {
                print!("{}", TextFormatter::new().format_scene(&engine.scene()));
            }
            Ok(())
        }
    }
}

/// Print estimate lines as the engine produces them, via an observer
fn attach_printer(engine: &PositioningEngine, formatter: &EventFormatter) {
    let formatter = formatter.clone();
    engine.subscribe(Box::new(move |event: &EstimateEvent| match formatter.event_line(event) {
        Ok(line) => println!("{}", line),
        Err(e) => error!("failed to format estimate: {}", e),
    }));
}

fn replay(engine: &PositioningEngine, formatter: &EventFormatter, reader: Box<dyn BufRead>) -> Result<()> {
    let stdout = io::stdout();
    if let Some(line) = formatter.preamble() {
        writeln!(stdout.lock(), "{}", line)?;
    }
    attach_printer(engine, formatter);

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        let report = match engine.decode(&line) {
            Ok(report) => report,
            Err(EngineError::MalformedReport(e)) => {
                warn!("line {}: {}", line_no + 1, e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if let Some(report_line) = formatter.report_line(&report) {
            writeln!(stdout.lock(), "{}", report_line)?;
        }
        engine.submit(&report);
    }

    let stats = engine.stats();
    info!(
        reports = stats.reports_received,
        rejected = stats.rejected_payloads,
        estimates = stats.estimates_produced,
        degenerate = stats.degenerate_solves,
        "replay complete"
    );
    Ok(())
}

fn simulate(
    engine: &PositioningEngine,
    formatter: &EventFormatter,
    transmitters: usize,
    rounds: usize,
    seed: Option<u64>,
) -> Result<()> {
    if let Some(line) = formatter.preamble() {
        println!("{}", line);
    }
    attach_printer(engine, formatter);

    let mut fleet = spawn_transmitters(transmitters, seed);
    for tx in &fleet {
        info!("{} placed at ({:.2}, {:.2})", tx.identifier(), tx.position().x, tx.position().y);
    }

    for _ in 0..rounds {
        for tx in fleet.iter_mut() {
            let report = engine.decode(&tx.next_payload()?)?;
            if let Some(line) = formatter.report_line(&report) {
                println!("{}", line);
            }
            engine.submit(&report);
        }
    }
    Ok(())
}
