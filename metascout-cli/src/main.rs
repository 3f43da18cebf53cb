use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use metascout::{report::write_report, ConfigOverrides, ScoutConfig, SessionController};
use std::{io, path::PathBuf, sync::Arc};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Index file metadata under a directory and search the paths.
///
/// The first run walks the root directory and persists the index; later runs
/// reload it. Prints the match count, then every matching path if there are
/// fewer than the threshold.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Substring to search for in indexed paths
    #[arg(short = 'p', long)]
    pattern: Option<String>,

    /// Root directory to index
    #[arg(short = 'd', long)]
    root: Option<PathBuf>,

    /// Location of the persisted index
    #[arg(short = 'x', long)]
    index: Option<PathBuf>,

    /// Number of parallel search chunks
    #[arg(short = 'j', long)]
    fan_out: Option<usize>,

    /// Print paths only when there are fewer matches than this
    #[arg(short = 't', long)]
    threshold: Option<usize>,

    /// Paths to leave out of the index (glob format)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Rebuild the index even if one exists
    #[arg(short = 'r', long)]
    reindex: bool,

    /// Configuration file layered over the default locations
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            root_path: self.root.clone(),
            index_path: self.index.clone(),
            fan_out: self.fan_out,
            print_threshold: self.threshold,
            pattern: self.pattern.clone(),
            ignore_patterns: self.ignore.clone(),
            force_reindex: self.reindex,
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ScoutConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge_with_cli(cli.overrides());

    init_logging(&config.log_level);
    debug!("Effective configuration: {:?}", config);

    if cli.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    run(config)
}

fn init_logging(level: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(config: ScoutConfig) -> Result<()> {
    let threshold = config.print_threshold;
    let root = config.root_path.clone();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]),
    );
    let ticker = spinner.clone();

    let mut session = SessionController::new(config).with_progress(Arc::new(move |indexed: usize| {
        ticker.set_message(format!("Indexed {} files", indexed));
        ticker.tick();
    }));

    let result = session.run();
    spinner.finish_and_clear();
    let report = result.with_context(|| format!("session over {} failed", root.display()))?;

    let stdout = io::stdout();
    write_report(&mut stdout.lock(), &report.output.matches, threshold)
        .context("failed to write results")?;
    Ok(())
}
