//! Parser for synteny block tables.
//!
//! Format: eight whitespace-separated columns,
//! `query_contig query_start query_stop target_contig target_start target_stop identity strand`.

use std::path::Path;

use crate::core::types::{Strand, SyntenyRecord};
use crate::parsing::tsv::{read_text, rows, Delimiter, Row};
use crate::parsing::ParseError;
use crate::utils::validation::{check_identity, check_interval};

const HEADER_KEYWORDS: &[&str] = &["query", "query_contig", "qseqid", "qchr"];

/// Parse a synteny block file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or the first record
/// error otherwise.
pub fn parse_synteny_file(path: &Path) -> Result<Vec<SyntenyRecord>, ParseError> {
    let text = read_text(path)?;
    parse_synteny_text(&path.display().to_string(), &text)
}

/// Parse synteny block text; `file` is used only in error messages
///
/// # Errors
///
/// Returns `ParseError::MalformedRecord` for rows without eight columns, with
/// non-numeric fields or an unknown strand, `ParseError::InvertedInterval` for
/// inverted coordinates on either side, and `ParseError::OutOfRangeScore` for
/// identities outside `[0, 1]`.
pub fn parse_synteny_text(file: &str, text: &str) -> Result<Vec<SyntenyRecord>, ParseError> {
    rows(file, text, Delimiter::Whitespace, HEADER_KEYWORDS)
        .map(|row| parse_row(&row))
        .collect()
}

fn parse_row(row: &Row) -> Result<SyntenyRecord, ParseError> {
    row.expect_len(&[8])?;

    let query_start: u64 = row.parse(1, "query start")?;
    let query_stop: u64 = row.parse(2, "query stop")?;
    let target_start: u64 = row.parse(4, "target start")?;
    let target_stop: u64 = row.parse(5, "target stop")?;
    let identity: f64 = row.parse(6, "identity")?;

    check_interval(query_start, query_stop).map_err(|e| row.invalid(e))?;
    check_interval(target_start, target_stop).map_err(|e| row.invalid(e))?;
    let identity = check_identity(identity).map_err(|e| row.invalid(e))?;

    let strand = Strand::parse(row.fields[7])
        .ok_or_else(|| row.malformed(format!("invalid strand: '{}'", row.fields[7])))?;

    Ok(SyntenyRecord {
        query_contig: row.fields[0].to_string(),
        query_start,
        query_stop,
        target_contig: row.fields[3].to_string(),
        target_start,
        target_stop,
        identity,
        strand,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_synteny_text() {
        let text = "query_contig qstart qstop tcontig tstart tstop identity strand
q1\t10\t20\tt1\t110\t120\t0.95\t+
# interleaved comment
q1  30  40  t2  5  15  1  -
";
        let records = parse_synteny_text("s.tsv", text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].query_contig, "q1");
        assert_eq!(records[0].target_start, 110);
        assert!((records[0].identity - 0.95).abs() < f64::EPSILON);
        assert_eq!(records[1].strand, Strand::Reverse);
    }

    #[test]
    fn test_parse_synteny_errors() {
        let cases = [
            ("q1 10 20 t1 10 20 0.9\n", "expected 8 columns"),
            ("q1 10 x t1 10 20 0.9 +\n", "invalid query stop"),
            ("q1 10 20 t1 10 20 0.9 ?\n", "invalid strand"),
        ];
        for (text, message) in cases {
            let err = parse_synteny_text("s.tsv", text).unwrap_err();
            assert!(matches!(err, ParseError::MalformedRecord { line: 1, .. }));
            assert!(err.to_string().contains(message), "{err}");
        }

        let text = "q1 10 20 t1 10 20 0.9 +\nq1 10 20 t1 10 20 1.5 +\n";
        assert!(matches!(
            parse_synteny_text("s.tsv", text),
            Err(ParseError::OutOfRangeScore { line: 2, .. })
        ));

        let text = "q1 10 20 t1 30 20 0.9 +\n";
        assert!(matches!(
            parse_synteny_text("s.tsv", text),
            Err(ParseError::InvertedInterval { line: 1, start: 30, stop: 20, .. })
        ));
    }
}
