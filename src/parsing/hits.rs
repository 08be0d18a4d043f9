//! Parser for alignment hit tables.
//!
//! Two layouts are accepted, chosen per row from the field count:
//!
//! | Columns | Layout |
//! |---------|--------|
//! | 8  | `gene contig start stop target_contig target_start target_stop score` |
//! | 14 | `gene start stop strand target_contig target_start target_stop target_strand score first_stop frameshift split_codons introns max_intron` |
//!
//! Eight-column rows become [`AlignmentHit::Basic`]. Fourteen-column rows are
//! spliced protein-to-genome alignments and become [`AlignmentHit::Spliced`];
//! their gene coordinates are in the gene's own frame, so the gene name
//! doubles as the contig. A `first_stop` of zero or less means the alignment
//! has no premature stop codon.

use std::path::Path;

use crate::core::hit::{AlignmentHit, HitRegion, SplicedFeatures};
use crate::core::interval::Interval;
use crate::core::types::Strand;
use crate::parsing::tsv::{read_text, rows, Delimiter, Row};
use crate::parsing::ParseError;
use crate::utils::validation::{check_interval, parse_flag};

const BASIC_COLUMNS: usize = 8;
const SPLICED_COLUMNS: usize = 14;
const HEADER_KEYWORDS: &[&str] = &["gene", "gene_name", "name", "query"];

/// Parse an alignment hit file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or the first record
/// error otherwise.
pub fn parse_hits_file(path: &Path) -> Result<Vec<AlignmentHit>, ParseError> {
    let text = read_text(path)?;
    parse_hits_text(&path.display().to_string(), &text)
}

/// Parse alignment hit text; `file` is used only in error messages
///
/// # Errors
///
/// Returns `ParseError::MalformedRecord` for rows with neither 8 nor 14
/// columns or with unparseable fields, and `ParseError::InvertedInterval` for
/// inverted coordinates.
pub fn parse_hits_text(file: &str, text: &str) -> Result<Vec<AlignmentHit>, ParseError> {
    rows(file, text, Delimiter::Whitespace, HEADER_KEYWORDS)
        .map(|row| parse_row(&row))
        .collect()
}

fn parse_row(row: &Row) -> Result<AlignmentHit, ParseError> {
    row.expect_len(&[BASIC_COLUMNS, SPLICED_COLUMNS])?;
    if row.len() == BASIC_COLUMNS {
        return Ok(AlignmentHit::Basic(basic_region(row)?));
    }

    let (region, features) = spliced_region(row)?;
    Ok(AlignmentHit::Spliced { region, features })
}

fn basic_region(row: &Row) -> Result<HitRegion, ParseError> {
    Ok(HitRegion {
        gene: row.fields[0].to_string(),
        query: interval(row, 1, 2, "gene")?,
        target: interval(row, 4, 5, "target")?,
        score: score(row, 7)?,
        line: row.line,
    })
}

fn spliced_region(row: &Row) -> Result<(HitRegion, SplicedFeatures), ParseError> {
    for (index, column) in [(3, "gene strand"), (7, "target strand")] {
        Strand::parse(row.fields[index])
            .ok_or_else(|| row.malformed(format!("invalid {column}: '{}'", row.fields[index])))?;
    }

    let region = HitRegion {
        gene: row.fields[0].to_string(),
        query: interval(row, 0, 1, "gene")?,
        target: interval(row, 4, 5, "target")?,
        score: score(row, 8)?,
        line: row.line,
    };

    let first_stop: i64 = row.parse(9, "first stop")?;
    let features = SplicedFeatures {
        first_stop: u64::try_from(first_stop).ok().filter(|&pos| pos > 0),
        has_frameshift: parse_flag(row.fields[10])
            .ok_or_else(|| row.malformed(format!("invalid frameshift flag: '{}'", row.fields[10])))?,
        split_codon_count: row.parse(11, "split codon count")?,
        intron_count: row.parse(12, "intron count")?,
        max_intron_length: row.parse(13, "max intron length")?,
    };

    Ok((region, features))
}

fn score(row: &Row, index: usize) -> Result<f64, ParseError> {
    let score: f64 = row.parse(index, "score")?;
    if !score.is_finite() {
        return Err(row.malformed(format!("invalid score: '{}'", row.fields[index])));
    }
    Ok(score)
}

/// Read an interval named by field `contig` with start and stop at `at`, `at + 1`
fn interval(row: &Row, contig: usize, at: usize, side: &str) -> Result<Interval, ParseError> {
    let start: u64 = row.parse(at, &format!("{side} start"))?;
    let stop: u64 = row.parse(at + 1, &format!("{side} stop"))?;
    check_interval(start, stop).map_err(|e| row.invalid(e))?;
    Ok(Interval::new(row.fields[contig], start, stop))
}
