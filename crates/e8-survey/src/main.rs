//! E8 Survey Binary
//!
//! Command-line interface for surveying E8 shells.
//!
//! ## Usage
//!
//! ```bash
//! e8-survey --start 2 --end 20 --step 2
//! e8-survey --norm 4 --show-vectors
//! ```

use clap::Parser;
use e8_core::NormSq;
use e8_survey::{Survey, SurveyConfig};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

/// E8 Survey - sizes and coordinate-product sums of E8 lattice shells
#[derive(Parser, Debug)]
#[command(name = "e8-survey")]
#[command(version)]
#[command(about = "Enumerate E8 lattice shells and cross-check them against σ₃", long_about = None)]
struct Args {
    /// First squared norm
    #[arg(short = 's', long, default_value_t = 2, allow_negative_numbers = true)]
    start: i64,

    /// Stop before this squared norm
    #[arg(short = 'e', long, default_value_t = 20, allow_negative_numbers = true)]
    end: i64,

    /// Step between squared norms
    #[arg(long, default_value_t = 2)]
    step: u64,

    /// Survey a single squared norm instead of a range
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    norm: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Generate on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Skip the divisor-sum cross-check
    #[arg(long)]
    no_verify: bool,

    /// Print every vector of each combined shell
    #[arg(long)]
    show_vectors: bool,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    /// Generate sample configuration file
    #[arg(long)]
    generate_config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Handle generate-config option
    if let Some(path) = &args.generate_config {
        let config = SurveyConfig::default();
        config.save_to_file(path)?;
        println!("Generated sample configuration at: {}", path.display());
        return Ok(());
    }

    let config = resolve_config(&args)?;

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Some(path) = &args.config {
        info!("Loaded configuration from: {}", path.display());
    }

    info!(
        "Surveying norms {}..{} step {} ({}, verify: {})",
        config.start,
        config.end,
        config.step,
        if config.parallel { "parallel" } else { "sequential" },
        config.verify
    );

    let survey = Survey::new(config);
    match survey.run() {
        Ok(summary) => {
            info!("Surveyed {} norms, {} vectors", summary.norms, summary.total_vectors);
            Ok(())
        }
        Err(e) => {
            error!("Survey failed: {}", e);
            Err(e.into())
        }
    }
}

/// Build the run configuration from a config file or the flags
///
/// `--log-level` and `--norm` apply on top of a loaded file.
fn resolve_config(args: &Args) -> Result<SurveyConfig, Box<dyn std::error::Error>> {
    let mut config = if let Some(config_path) = &args.config {
        let mut config = SurveyConfig::load_from_file(config_path)?;
        if let Some(level) = &args.log_level {
            config.log_level = level.clone();
        }
        config
    } else {
        SurveyConfig::builder()
            .start(args.start)
            .end(args.end)
            .step(args.step)
            .parallel(!args.sequential)
            .verify(!args.no_verify)
            .show_vectors(args.show_vectors)
            .log_level(args.log_level.as_deref().unwrap_or("info"))
            .build()?
    };

    if let Some(norm) = &args.norm {
        let norm: NormSq = norm.parse()?;
        let n = i64::try_from(norm.get())?;
        config.start = n;
        config.end = n + 1;
        config.step = 1;
    }

    config.validate()?;
    Ok(config)
}
