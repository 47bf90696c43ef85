//! Interactive command handler
//!
//! Reads `from | to` lines from stdin. A burst of lines arriving within the
//! debounce window collapses to the last one, and a new search supersedes any
//! still running.

use crate::cli::SearchArgs;
use crate::config::Config;
use crate::distance::DistanceUnit;
use crate::error::{Error, Result};
use crate::geo::{get_geocoder, GeoBackend};
use crate::search::controller::{SearchController, Submission};
use crate::search::report::SearchReport;
use crate::search::{debounce, messages, SearchOrchestrator};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::debug;

/// Interactive command arguments
#[derive(Args)]
pub struct InteractiveArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Quiet period before a typed line is searched, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Search { from: String, to: String },
    Clear,
    Quit,
    Blank,
    Invalid,
}

impl InputLine {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Blank;
        }
        match line.to_lowercase().as_str() {
            "clear" => return Self::Clear,
            "quit" | "exit" => return Self::Quit,
            _ => {}
        }
        match line.split_once('|') {
            Some((from, to)) => Self::Search {
                from: from.trim().to_string(),
                to: to.trim().to_string(),
            },
            None => Self::Invalid,
        }
    }
}

/// Run the interactive command
pub async fn run(args: InteractiveArgs) -> Result<()> {
    let config = Config::load()?;
    let unit = args.search.unit(&config)?;
    let formatter = args.search.formatter(&config)?;
    let quiet = args
        .debounce_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.search.debounce());

    let orchestrator = SearchOrchestrator::new(get_geocoder(&config)?, args.search.region(&config));
    let controller = Arc::new(SearchController::new(orchestrator));

    eprintln!("Enter two places as 'from | to'. Type 'clear' to reset, 'quit' to exit.");

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    drive(input, controller, quiet, unit, move |report| {
        match formatter.format(report, &config) {
            Ok(output) => println!("{}", output.trim_end()),
            Err(e) => eprintln!("Error: {}", e),
        }
    })
    .await
}

/// Feed input lines through the debouncer into `controller`
///
/// `render` is called for every search whose result is applied. Returns once
/// the input ends and every started search has settled.
pub async fn drive<R, G, F>(
    input: R,
    controller: Arc<SearchController<G>>,
    quiet: Duration,
    unit: DistanceUnit,
    render: F,
) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    G: GeoBackend + 'static,
    F: Fn(&SearchReport) + Send + Sync + 'static,
{
    let (trigger, mut debounced) = debounce::channel(quiet);
    let render = Arc::new(render);

    let reader = tokio::spawn(async move {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match InputLine::parse(&line) {
                InputLine::Blank => {}
                InputLine::Invalid => eprintln!("Enter two places as: from | to"),
                InputLine::Quit => break,
                line => {
                    if !trigger.fire(line) {
                        break;
                    }
                }
            }
        }
        Ok::<(), Error>(())
    });

    let mut searches = JoinSet::new();
    while let Some(line) = debounced.next().await {
        match line {
            InputLine::Search { from, to } => {
                let controller = controller.clone();
                let render = render.clone();
                searches.spawn(async move {
                    match controller.submit(&from, &to, unit).await {
                        Ok(Submission::Applied(report)) => render(&report),
                        Ok(Submission::Superseded { token }) => debug!(token, "Search superseded"),
                        Err(Error::InvalidInput(_)) => eprintln!("{}", messages::EMPTY_INPUT),
                        Err(e) => eprintln!("Error: {}", e),
                    }
                });
            }
            InputLine::Clear => {
                controller.reset();
                eprintln!("Cleared.");
            }
            InputLine::Quit | InputLine::Blank | InputLine::Invalid => {}
        }
    }

    while searches.join_next().await.is_some() {}

    reader.await.map_err(std::io::Error::from)??;
    Ok(())
}
