// Entry point and high-level CLI flow.
//
// - Parse options and set up logging.
// - Load the dataset once; any ingestion error ends the program here.
// - Hand the frozen repository to the menu loop until the user exits.
use anyhow::{Context, Result};
use clap::Parser;
use park_reviews::app::App;
use park_reviews::menu::Console;
use park_reviews::Repository;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "park_reviews")]
#[command(about = "Browse statistics of theme-park customer reviews", long_about = None)]
struct Cli {
    /// CSV dataset to load
    #[arg(long, env = "PARK_REVIEWS_DATA", default_value = "data/disneyland_reviews.csv")]
    data: PathBuf,

    /// Directory the export files are written to
    #[arg(long, env = "PARK_REVIEWS_EXPORT_DIR", default_value = ".")]
    export_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    println!("Loading reviews...");
    let repo = Repository::load(&cli.data)
        .with_context(|| format!("failed to load reviews from {}", cli.data.display()))?;
    println!("Loading finished!");

    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout());
    let mut app = App::new(&repo, console, cli.export_dir);
    app.run()?;
    info!("Exiting");
    Ok(())
}
