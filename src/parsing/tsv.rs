//! Shared reading of delimited text tables.

use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use flate2::read::GzDecoder;

use crate::parsing::ParseError;
use crate::utils::validation::ValidationError;

/// How fields are separated on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Exactly one tab between fields; fields may contain spaces
    Tab,
    /// Any run of spaces or tabs
    Whitespace,
}

/// Check if the path names a gzip-compressed file
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// Read a whole input file, decompressing `.gz` files
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened or decoded as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String, ParseError> {
    let io_error = |source| ParseError::Io {
        file: path.display().to_string(),
        source,
    };

    let file = std::fs::File::open(path).map_err(io_error)?;
    let mut text = String::new();
    if is_gzipped(path) {
        GzDecoder::new(file).read_to_string(&mut text)
    } else {
        BufReader::new(file).read_to_string(&mut text)
    }
    .map_err(io_error)?;

    Ok(text)
}

/// One data line of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    /// File name used in error messages
    pub file: &'a str,
    /// 1-based line number
    pub line: usize,
    pub fields: Vec<&'a str>,
}

impl<'a> Row<'a> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a `MalformedRecord` error for this line
    pub fn malformed(&self, reason: impl Into<String>) -> ParseError {
        ParseError::MalformedRecord {
            file: self.file.to_string(),
            line: self.line,
            reason: reason.into(),
        }
    }

    /// Attach this line to a validation failure
    pub fn invalid(&self, err: ValidationError) -> ParseError {
        ParseError::from_validation(self.file, self.line, err)
    }

    /// Require one of the given field counts
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MalformedRecord` naming the expected counts.
    pub fn expect_len(&self, allowed: &[usize]) -> Result<(), ParseError> {
        if allowed.contains(&self.fields.len()) {
            return Ok(());
        }
        let expected = allowed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        Err(self.malformed(format!(
            "expected {expected} columns, found {}",
            self.fields.len()
        )))
    }

    /// Parse field `index` as a number
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MalformedRecord` if the field is missing or does not parse.
    pub fn parse<T: FromStr>(&self, index: usize, column: &str) -> Result<T, ParseError> {
        let value = self
            .fields
            .get(index)
            .ok_or_else(|| self.malformed(format!("missing {column} column")))?;
        value
            .parse()
            .map_err(|_| self.malformed(format!("invalid {column}: '{value}'")))
    }
}

/// Iterate the data rows of a table.
///
/// Blank lines and lines starting with `#` are skipped. The first remaining
/// line is skipped as a header when its first field matches one of
/// `header_keywords` (case-insensitive).
pub fn rows<'a>(
    file: &'a str,
    text: &'a str,
    delimiter: Delimiter,
    header_keywords: &'a [&'a str],
) -> impl Iterator<Item = Row<'a>> + 'a {
    let mut first_data_line = true;

    text.lines().enumerate().filter_map(move |(i, line)| {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            return None;
        }

        let fields: Vec<&str> = match delimiter {
            Delimiter::Tab => line.split('\t').map(str::trim).collect(),
            Delimiter::Whitespace => line.split_whitespace().collect(),
        };

        if std::mem::take(&mut first_data_line) {
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if header_keywords.iter().any(|k| k.eq_ignore_ascii_case(&first)) {
                return None;
            }
        }

        // Line numbers in errors are 1-based for user friendliness
        Some(Row {
            file,
            line: i + 1,
            fields,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const KEYWORDS: &[&str] = &["contig", "chrom"];

    #[test]
    fn test_rows_skip_comments_and_header() {
        let text = "# comment\n\ncontig\tstart\nchr1\t10\n  \nchr2\t20\r\n";
        let rows: Vec<Row> = rows("t.tsv", text, Delimiter::Tab, KEYWORDS).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 4);
        assert_eq!(rows[0].fields, vec!["chr1", "10"]);
        assert_eq!(rows[1].line, 6);
        assert_eq!(rows[1].fields, vec!["chr2", "20"]);
    }

    #[test]
    fn test_header_only_on_first_data_line() {
        let text = "chr1 10\ncontig 20\n";
        let rows: Vec<Row> = rows("t", text, Delimiter::Whitespace, KEYWORDS).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].fields, vec!["contig", "20"]);
    }

    #[test]
    fn test_tab_delimiter_keeps_spaces() {
        let text = "a b\tc\n";
        let row = rows("t", text, Delimiter::Tab, &[]).next().unwrap();
        assert_eq!(row.fields, vec!["a b", "c"]);
    }

    #[test]
    fn test_row_parse_errors_name_line() {
        let row = Row {
            file: "blocks.tsv",
            line: 7,
            fields: vec!["chr1", "x"],
        };
        assert_eq!(row.parse::<u64>(1, "start").unwrap_err().line(), Some(7));
        assert!(row.parse::<u64>(5, "stop").is_err());
        assert!(row.expect_len(&[2]).is_ok());

        let err = row.expect_len(&[8, 14]).unwrap_err();
        assert!(err.to_string().contains("expected 8 or 14 columns, found 2"));
        assert!(err.to_string().starts_with("blocks.tsv:7:"));
    }

    #[test]
    fn test_read_text_gz() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("a.tsv");
        std::fs::write(&plain, "chr1\t1\n").unwrap();

        let gz = dir.path().join("a.tsv.gz");
        let mut encoder = flate2::write::GzEncoder::new(
            std::fs::File::create(&gz).unwrap(),
            flate2::Compression::default(),
        );
        encoder.write_all(b"chr1\t1\n").unwrap();
        encoder.finish().unwrap();

        assert_eq!(read_text(&plain).unwrap(), "chr1\t1\n");
        assert_eq!(read_text(&gz).unwrap(), "chr1\t1\n");
        assert!(matches!(
            read_text(&dir.path().join("missing.tsv")),
            Err(ParseError::Io { .. })
        ));
    }
}
