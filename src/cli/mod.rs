//! Command-line interface for orphan-scan.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **classify**: Classify query genes by synteny and validate alignment hits
//! - **stats**: Summarize a synteny block table (and optionally a gene set)
//!
//! ## Usage
//!
//! ```text
//! # Presence and simplicity of every gene
//! orphan-scan classify query.gff3 blocks.tsv
//!
//! # Validate exonerate-style hits and flag gaps in the target assembly
//! orphan-scan classify query.gff3 blocks.tsv --hits hits.tsv --nstrings target.nstr
//!
//! # JSON output for scripting
//! orphan-scan classify query.gff3 blocks.tsv --format json
//!
//! # Block counts after dropping low-identity blocks
//! orphan-scan stats blocks.tsv --min-identity 0.8
//! ```

use clap::{Parser, Subcommand};

use crate::utils::validation::check_identity;

pub mod classify;
pub mod stats;

#[derive(Parser)]
#[command(name = "orphan-scan")]
#[command(version)]
#[command(about = "Find query genes without syntenic context in a target genome")]
#[command(
    long_about = "orphan-scan uses whole-genome synteny blocks between a query and a target genome to decide, for each query gene, whether any block covers it and whether its neighborhood maps simply onto the target.\n\nCandidate homology hits (for example from exonerate) are kept only when enough of the gene's flanking blocks map near the hit, which filters out hits to paralogs and unrelated loci."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify query genes against synteny blocks
    Classify(classify::ClassifyArgs),

    /// Summarize synteny blocks and genes
    Stats(stats::StatsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Size the global rayon pool; `None` keeps rayon's default of one thread per core
pub(crate) fn configure_threads(threads: Option<usize>) -> anyhow::Result<()> {
    if let Some(threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }
    Ok(())
}

pub(crate) fn parse_identity(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    check_identity(value).map_err(|e| e.to_string())
}

pub(crate) fn parse_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{s}' is not a positive integer")),
    }
}

pub(crate) fn parse_ratio(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(r) if r.is_finite() && r >= 0.0 => Ok(r),
        _ => Err(format!("'{s}' is not a non-negative number")),
    }
}
