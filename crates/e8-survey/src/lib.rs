//! # E8 Survey
//!
//! Walks a range of squared norms, generates the integer, half-integer and
//! combined E8 shells at each, and reports their sizes and coordinate-product
//! sums next to the sizes the divisor-sum formulas predict.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                      E8 Survey                       │
//! ├──────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────┐  │
//! │  │ SurveyConfig │──►│  ShellCache  │──►│  Report  │  │
//! │  │ (TOML / CLI) │   │ (n, regime)  │   │ + σ₃ chk │  │
//! │  └──────────────┘   └──────────────┘   └──────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod report;
pub mod errors;

pub use config::*;
pub use report::*;
pub use errors::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::report::*;
    pub use crate::errors::*;
}

use e8_core::{NormSq, Regime};
use e8_shell::{Execution, Shell, ShellCache};
use tracing::{error, info, warn};

/// Outcome of a full run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveySummary {
    /// Norms attempted
    pub norms: usize,
    /// Norms whose report failed
    pub failures: usize,
    /// Vectors across every combined shell reported
    pub total_vectors: usize,
}

/// Shell survey driver
pub struct Survey {
    config: SurveyConfig,
    cache: ShellCache,
}

impl Survey {
    /// Create a survey from a configuration
    pub fn new(config: SurveyConfig) -> Self {
        let execution = if config.parallel {
            Execution::Parallel
        } else {
            Execution::Sequential
        };

        Self {
            config,
            cache: ShellCache::with_execution(execution),
        }
    }

    /// Get survey configuration
    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Get the shell cache
    pub fn cache(&self) -> &ShellCache {
        &self.cache
    }

    /// Report every regime at one norm
    ///
    /// # Errors
    /// `Lattice(InvalidArgument)` for a negative norm, `CrossCheckFailed` when
    /// verification is on and a size disagrees with its formula.
    pub fn report(&self, norm_sq: i64) -> SurveyResult<NormReport> {
        let norm = NormSq::try_from(norm_sq)?;
        let shells: Vec<Shell> = Regime::ALL
            .iter()
            .map(|&regime| self.cache.get_or_compute(norm, regime))
            .collect();
        NormReport::from_shells(norm, &shells, self.config.verify)
    }

    /// Run over every configured norm, printing each report to stdout
    ///
    /// A failing norm is logged and skipped; the run still visits the rest.
    pub fn run(&self) -> SurveyResult<SurveySummary> {
        self.config.validate()?;
        let mut summary = SurveySummary::default();

        for n in self.config.norms() {
            summary.norms += 1;
            match self.report(n) {
                Ok(report) => {
                    print!("{}", report);
                    if let Some(both) = report.get(Regime::Both) {
                        summary.total_vectors += both.count;
                    }
                    if self.config.show_vectors {
                        self.print_vectors(report.norm_sq);
                    }
                }
                Err(e) => {
                    error!("norm² {}: {}", n, e);
                    summary.failures += 1;
                }
            }
        }

        let stats = self.cache.stats();
        info!(
            norms = summary.norms,
            failures = summary.failures,
            vectors = summary.total_vectors,
            shells = stats.computations,
            cache_hits = stats.hits,
            "survey finished"
        );

        if summary.failures > 0 {
            warn!("{} of {} norms failed", summary.failures, summary.norms);
            return Err(SurveyError::RunFailed {
                failed: summary.failures,
                total: summary.norms,
            });
        }
        Ok(summary)
    }

    fn print_vectors(&self, norm_sq: NormSq) {
        let shell = self.cache.get_or_compute(norm_sq, Regime::Both);
        for (i, v) in shell.iter().enumerate() {
            println!("    [{:>6}] {}", i, v);
        }
    }
}
