//! Parser for GFF gene models.
//!
//! Format: nine tab-separated columns,
//! `seqid  source  type  start  end  score  strand  phase  attributes`.
//! The gene name comes from the `ID=` attribute, then `Name=`, else the whole
//! attribute column. When any row has type `gene`, only those rows are read;
//! otherwise every row is a gene.

use std::path::Path;

use crate::core::gene::{Gene, GeneSet, GeneSetError};
use crate::parsing::tsv::{read_text, rows, Delimiter, Row};
use crate::parsing::ParseError;
use crate::utils::validation::check_interval;

const GFF_COLUMNS: usize = 9;
const TYPE_COLUMN: usize = 2;

/// Parse a GFF file into a gene set
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or the first record
/// error otherwise.
pub fn parse_gff_file(path: &Path) -> Result<GeneSet, ParseError> {
    let text = read_text(path)?;
    parse_gff_text(&path.display().to_string(), &text)
}

/// Parse GFF text; `file` is used only in error messages
///
/// # Errors
///
/// Returns `ParseError::MalformedRecord` for rows without nine columns or with
/// non-numeric coordinates, `ParseError::InvertedInterval` if end precedes
/// start, and `ParseError::DuplicateGene` if a name repeats.
pub fn parse_gff_text(file: &str, text: &str) -> Result<GeneSet, ParseError> {
    let records: Vec<Row> = rows(file, text, Delimiter::Tab, &[]).collect();
    let genes_only = records
        .iter()
        .any(|row| row.fields.get(TYPE_COLUMN) == Some(&"gene"));

    let mut genes = Vec::new();
    let mut lines = Vec::new();

    for row in &records {
        row.expect_len(&[GFF_COLUMNS])?;
        if genes_only && row.fields[TYPE_COLUMN] != "gene" {
            continue;
        }

        let start: u64 = row.parse(3, "start")?;
        let stop: u64 = row.parse(4, "end")?;
        check_interval(start, stop).map_err(|e| row.invalid(e))?;

        let name = gene_name(row.fields[8]);
        if name.is_empty() {
            return Err(row.malformed("empty gene name"));
        }

        genes.push(Gene::new(name, row.fields[0], start, stop));
        lines.push(row.line);
    }

    GeneSet::new(genes).map_err(|GeneSetError::DuplicateName { name, position }| {
        ParseError::DuplicateGene {
            file: file.to_string(),
            line: lines[position],
            name,
        }
    })
}

/// Pick the gene name out of a GFF attribute column
fn gene_name(attributes: &str) -> &str {
    let lookup = |key: &str| {
        attributes
            .split(';')
            .map(str::trim)
            .find_map(|pair| pair.strip_prefix(key))
            .map(str::trim)
    };
    lookup("ID=")
        .or_else(|| lookup("Name="))
        .unwrap_or(attributes)
}
