//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod distance;
pub mod interactive;
pub mod serve;

use crate::config::Config;
use crate::distance::DistanceUnit;
use crate::error::{Error, Result};
use crate::geo::RegionHint;
use clap::{Args, Parser, Subcommand};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Straight-line distance between two places
#[derive(Parser)]
#[command(name = "place-distance")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up two places and print the distance between them
    Distance(distance::DistanceArgs),

    /// Read "from | to" lines from stdin and search as they arrive
    Interactive(interactive::InteractiveArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Options shared by every command that runs searches
#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Distance unit: km or miles
    #[arg(long, short = 'u')]
    pub unit: Option<String>,

    /// Output format (see --list-formats)
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Map link provider for the url format
    #[arg(long)]
    pub provider: Option<String>,

    /// Region to try first, as "Name:cc" (e.g. "India:in")
    #[arg(long, conflicts_with = "no_region")]
    pub region: Option<RegionHint>,

    /// Search without a region qualifier
    #[arg(long)]
    pub no_region: bool,
}

impl SearchArgs {
    /// Region to pass to the geocoder, after flags and config
    pub fn region(&self, config: &Config) -> Option<RegionHint> {
        if self.no_region {
            None
        } else {
            self.region.clone().or_else(|| config.geocoder.region())
        }
    }

    pub fn unit(&self, config: &Config) -> Result<DistanceUnit> {
        let unit = self.unit.as_deref().unwrap_or(&config.defaults.unit);
        DistanceUnit::from_str(unit).map_err(Error::Config)
    }

    pub fn format_name<'a>(&'a self, config: &'a Config) -> &'a str {
        self.format.as_deref().unwrap_or(&config.defaults.format)
    }

    /// Formatter for this run, honouring `--provider` for map links
    pub fn formatter(&self, config: &Config) -> Result<Box<dyn crate::format::OutputFormatter>> {
        let name = self.format_name(config);
        if name.eq_ignore_ascii_case("url") {
            if let Some(provider) = &self.provider {
                return Ok(Box::new(crate::format::url::UrlFormatter::with_provider(
                    provider.clone(),
                )));
            }
        }
        crate::format::get_formatter(name)
            .ok_or_else(|| Error::Config(format!("Unknown format: {}", name)))
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins over `default_level`. Logs go to stderr so command output
/// on stdout stays clean.
pub fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            init_logging("info");
            serve::run(args).await
        }
        Commands::Distance(args) => {
            init_logging("warn");
            distance::run(args).await
        }
        Commands::Interactive(args) => {
            init_logging("warn");
            interactive::run(args).await
        }
        Commands::Config(args) => {
            init_logging("warn");
            config::run(args)
        }
    }
}
