//! Command line front-end.
//!
//! ```text
//! skyplan schedule [--config FILE] [--output-dir DIR]
//! skyplan radial-velocity [--frequency MHZ]
//! skyplan default-config
//! ```
//!
//! Environment:
//! - `RUST_LOG`: log filter directives, e.g. `debug` or `skyplan=debug` (default: info)
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use skyplan::config::ObservationConfig;
use skyplan::export::export_schedules;
use skyplan::radial_velocity::{parse_frequency_mhz, RadialVelocityCalculator};
use skyplan::scheduler::VisibilityScheduler;

#[derive(Parser)]
#[command(
    name = "skyplan",
    about = "Galactic visibility tables and 21 cm radial velocities"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one altitude/azimuth table per target Galactic longitude
    Schedule {
        /// TOML configuration file (built-in reference run when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory receiving the CSV tables (overrides the configuration)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Radial velocity of a hydrogen cloud from its observed 21 cm frequency
    RadialVelocity {
        /// Observed frequency in MHz (prompted for when omitted)
        #[arg(long)]
        frequency: Option<String>,
        /// Use c = 299 792 458 m/s instead of the rounded 3e8 m/s
        #[arg(long)]
        exact_c: bool,
    },
    /// Print the built-in reference configuration as TOML
    DefaultConfig,
}

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(log_filter(env::var("RUST_LOG").ok()))
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schedule { config, output_dir } => {
            let mut config = match config {
                Some(path) => {
                    info!(path = %path.display(), "loading configuration");
                    ObservationConfig::from_file(&path)?
                }
                None => ObservationConfig::default(),
            };
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }

            let scheduler = VisibilityScheduler::new(config.resolve()?);
            let schedules = scheduler.run()?;
            let paths = export_schedules(&config.output_dir, &config.file_prefix, &schedules)?;
            info!(files = paths.len(), "export finished");
            println!("Done");
        }
        Commands::RadialVelocity { frequency, exact_c } => {
            let input = match frequency {
                Some(text) => text,
                None => prompt("Observed frequency of radio signal (MHz): ")?,
            };
            let observed = parse_frequency_mhz(&input)?;

            let calculator = if exact_c {
                RadialVelocityCalculator::default().with_exact_speed_of_light()
            } else {
                RadialVelocityCalculator::default()
            };
            println!("{}", calculator.report(observed));
        }
        Commands::DefaultConfig => {
            print!("{}", ObservationConfig::default().to_toml_string()?);
        }
    }

    Ok(())
}

/// Filter built from `RUST_LOG` directives, `info` when unset or unparsable.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn prompt(message: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(message.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
