mod error;

use crate::error::CliError;
use clap::Parser;
use flyby::{Coordinate, FlybyPredictor, HttpAssetSource, Reporter, config::Config};
use std::{path::PathBuf, process::ExitCode};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Predict the next time a satellite image will be taken of a location
#[derive(Parser, Debug)]
#[command(version, about = "Predict the next satellite image capture for a location", long_about = None)]
struct Args {
    /// Latitude of location
    #[arg(long, visible_alias = "lat", allow_hyphen_values = true)]
    latitude: String,

    /// Longitude of location
    #[arg(long, visible_alias = "lon", allow_hyphen_values = true)]
    longitude: String,

    /// Imagery API access key (overrides FLYBY_API__KEY and the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// Configuration file (defaults to ./flyby.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log request and computation details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_predictor(args: &Args) -> Result<FlybyPredictor<HttpAssetSource>, CliError> {
    let config =
        Config::load(args.config.as_deref(), args.api_key.as_deref()).map_err(CliError::Config)?;
    let endpoint = config.api.endpoint().map_err(CliError::Config)?;
    debug!(
        url = %endpoint,
        timeout_seconds = config.api.timeout_seconds,
        "loaded configuration"
    );
    let source = HttpAssetSource::new(config.api.timeout()).map_err(CliError::HttpClient)?;

    Ok(FlybyPredictor::new(source, endpoint, config.api.key))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let reporter = Reporter::new(&args.latitude, &args.longitude);

    // Input is checked before configuration so a bad coordinate is always
    // reported as such.
    let coordinate = match Coordinate::parse(&args.latitude, &args.longitude) {
        Ok(coordinate) => coordinate,
        Err(err) => {
            let err = flyby::FlybyError::from(err);
            eprintln!("{}", reporter.failure(&err));
            return ExitCode::from(err.exit_code());
        }
    };

    let predictor = match build_predictor(&args) {
        Ok(predictor) => predictor,
        Err(err) => {
            eprintln!("{}", reporter.unexpected(&err));
            return ExitCode::from(CliError::EXIT_CODE);
        }
    };

    match predictor.predict_at(coordinate) {
        Ok(prediction) => {
            for report in reporter.skipped(&prediction) {
                eprintln!("{report}");
            }
            println!("{}", reporter.success(&prediction));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", reporter.failure(&err));
            ExitCode::from(err.exit_code())
        }
    }
}
