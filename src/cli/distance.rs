//! Distance command handler
//!
//! Looks up two places once and prints the result.

use crate::cli::SearchArgs;
use crate::config::Config;
use crate::error::Result;
use crate::format::available_formats;
use crate::geo::get_geocoder;
use crate::search::controller::{SearchController, Submission};
use crate::search::SearchOrchestrator;
use clap::Args;

/// Distance command arguments
#[derive(Args)]
pub struct DistanceArgs {
    /// First place
    #[arg(required_unless_present = "list_formats")]
    pub from: Option<String>,

    /// Second place
    #[arg(required_unless_present = "list_formats")]
    pub to: Option<String>,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the distance command
pub async fn run(args: DistanceArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let unit = args.search.unit(&config)?;
    let formatter = args.search.formatter(&config)?;

    let orchestrator = SearchOrchestrator::new(get_geocoder(&config)?, args.search.region(&config));
    let controller = SearchController::new(orchestrator);

    let from = args.from.as_deref().unwrap_or_default();
    let to = args.to.as_deref().unwrap_or_default();

    let report = match controller.submit(from, to, unit).await {
        Ok(Submission::Applied(report)) => report,
        Ok(Submission::Superseded { .. }) => return Ok(()),
        Err(crate::error::Error::InvalidInput(_)) => {
            eprintln!("{}", crate::search::messages::EMPTY_INPUT);
            std::process::exit(2);
        }
        Err(e) => return Err(e),
    };

    let output = formatter.format(&report, &config)?;

    if let Some(path) = args.output {
        std::fs::write(&path, &output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output.trim_end());
    }

    if !report.outcome.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:<8} - {}", format.name, format.description);
    }
}
