//! Parser for N-run (assembly gap) tables.
//!
//! Format: `contig start length`, one run of `N` per line. A run of length `L`
//! starting at `s` covers positions `s..=s + L - 1`. Zero-length runs are
//! ignored.

use std::path::Path;

use crate::core::interval::Interval;
use crate::parsing::tsv::{read_text, rows, Delimiter};
use crate::parsing::ParseError;

const HEADER_KEYWORDS: &[&str] = &["contig", "seqid", "chrom", "chr", "name"];

/// Parse an N-run file into gap intervals
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or the first record
/// error otherwise.
pub fn parse_nstrings_file(path: &Path) -> Result<Vec<Interval>, ParseError> {
    let text = read_text(path)?;
    parse_nstrings_text(&path.display().to_string(), &text)
}

/// Parse N-run text; `file` is used only in error messages
///
/// # Errors
///
/// Returns `ParseError::MalformedRecord` for rows without three columns or
/// with non-numeric start or length.
pub fn parse_nstrings_text(file: &str, text: &str) -> Result<Vec<Interval>, ParseError> {
    let mut gaps = Vec::new();
    for row in rows(file, text, Delimiter::Whitespace, HEADER_KEYWORDS) {
        row.expect_len(&[3])?;
        let start: u64 = row.parse(1, "start")?;
        let length: u64 = row.parse(2, "length")?;
        if length == 0 {
            continue;
        }
        let stop = start
            .checked_add(length - 1)
            .ok_or_else(|| row.malformed("gap extends past the end of the coordinate range"))?;
        gaps.push(Interval::new(row.fields[0], start, stop));
    }
    Ok(gaps)
}
