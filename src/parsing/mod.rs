//! Parsers for the tabular inputs of a classification run.
//!
//! This module provides parsers for:
//!
//! - **GFF files**: gene models of the query genome
//! - **Synteny tables**: reciprocal query/target block pairs with identity and strand
//! - **Alignment hits**: basic (8 column) or spliced (14 column) hit tables
//! - **N-run tables**: unsequenced gap positions of the target genome
//!
//! All inputs share the conventions handled by [`tsv`]: `#` comment lines and
//! blank lines are skipped, an optional header row is skipped, and files ending
//! in `.gz` are decompressed on the fly. Every record is validated before it
//! leaves the parser; errors name the file and the 1-based line.
//!
//! ## Example
//!
//! ```rust,no_run
//! use orphan_scan::parsing::{gff, synteny};
//! use std::path::Path;
//!
//! let genes = gff::parse_gff_file(Path::new("query.gff3")).unwrap();
//! let blocks = synteny::parse_synteny_file(Path::new("blocks.tsv.gz")).unwrap();
//! println!("{} genes, {} blocks", genes.len(), blocks.len());
//! ```

pub mod gff;
pub mod hits;
pub mod nstrings;
pub mod synteny;
pub mod tsv;

use thiserror::Error;

use crate::utils::validation::ValidationError;

/// Errors raised while reading an input table
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}:{line}: malformed record: {reason}")]
    MalformedRecord {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{file}:{line}: identity {score} is outside [0, 1]")]
    OutOfRangeScore {
        file: String,
        line: usize,
        score: f64,
    },

    #[error("{file}:{line}: interval stop {stop} precedes start {start}")]
    InvertedInterval {
        file: String,
        line: usize,
        start: u64,
        stop: u64,
    },

    #[error("{file}:{line}: duplicate gene name '{name}'")]
    DuplicateGene {
        file: String,
        line: usize,
        name: String,
    },
}

impl ParseError {
    /// Attach a file and line to a value-level validation failure
    pub(crate) fn from_validation(file: &str, line: usize, err: ValidationError) -> Self {
        match err {
            ValidationError::InvertedInterval { start, stop } => ParseError::InvertedInterval {
                file: file.to_string(),
                line,
                start,
                stop,
            },
            ValidationError::OutOfRangeScore(score) => ParseError::OutOfRangeScore {
                file: file.to_string(),
                line,
                score,
            },
        }
    }

    /// 1-based line of the offending record, if the error has one
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Io { .. } => None,
            ParseError::MalformedRecord { line, .. }
            | ParseError::OutOfRangeScore { line, .. }
            | ParseError::InvertedInterval { line, .. }
            | ParseError::DuplicateGene { line, .. } => Some(*line),
        }
    }
}
