//! Classify command - decide presence and simplicity of every query gene and
//! validate candidate alignment hits against synteny.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use crate::classify::context::{ClassifierConfig, ContextClassifier, DEFAULT_CONTEXT_WIDTH};
use crate::classify::hits::{
    HitValidator, HitValidatorConfig, DEFAULT_FLANK_WIDTH, DEFAULT_MIN_NEIGHBORS,
    DEFAULT_TARGET_FLANK_RATIO,
};
use crate::classify::results::{GeneResult, HitSummary, ResultSet};
use crate::cli::{configure_threads, parse_identity, parse_positive, parse_ratio, OutputFormat};
use crate::core::hit::AlignmentHit;
use crate::index::gaps::GapMask;
use crate::index::synteny::SyntenyIndex;
use crate::parsing::{gff, hits, nstrings, synteny};

/// Arguments for the classify command
#[derive(Args)]
pub struct ClassifyArgs {
    /// GFF gene models of the query genome (may be gzipped)
    #[arg(required = true)]
    pub genes: PathBuf,

    /// Synteny blocks: query contig/start/stop, target contig/start/stop, identity, strand
    #[arg(required = true)]
    pub synteny: PathBuf,

    /// Alignment hits to validate (8 or 14 columns)
    #[arg(short = 't', long)]
    pub hits: Option<PathBuf>,

    /// N-runs of the target assembly: contig, start, length
    #[arg(short = 'N', long)]
    pub nstrings: Option<PathBuf>,

    /// Synteny blocks to include on each side of a gene
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONTEXT_WIDTH, value_parser = parse_positive)]
    pub context_width: usize,

    /// Flank (bp) on each side of a gene searched for syntenic neighbors of a hit
    #[arg(short = 'w', long, default_value_t = DEFAULT_FLANK_WIDTH)]
    pub flank_width: u64,

    /// Neighbors that must map near a hit for it to be kept
    #[arg(short = 'b', long, default_value_t = DEFAULT_MIN_NEIGHBORS)]
    pub min_neighbors: usize,

    /// Target flank width as a multiple of --flank-width
    #[arg(short = 'r', long, default_value_t = DEFAULT_TARGET_FLANK_RATIO, value_parser = parse_ratio)]
    pub target_flank_ratio: f64,

    /// Drop synteny blocks with identity below this value before classifying
    #[arg(long, value_parser = parse_identity)]
    pub min_identity: Option<f64>,

    /// Suppress warnings about hits on contigs without synteny blocks
    #[arg(short, long)]
    pub quiet: bool,

    /// Worker threads (default: one per core)
    #[arg(long)]
    pub threads: Option<usize>,
}

/// Execute the classify command
///
/// # Errors
///
/// Returns an error if any input cannot be parsed, if a hit names an unknown
/// gene, or if output cannot be written.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ClassifyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    configure_threads(args.threads)?;

    let genes = gff::parse_gff_file(&args.genes)?;
    let mut syn = SyntenyIndex::from_records(synteny::parse_synteny_file(&args.synteny)?);
    if verbose {
        eprintln!(
            "Loaded {} genes and {} synteny blocks",
            genes.len(),
            syn.len()
        );
    }

    if let Some(min_identity) = args.min_identity {
        let removed = syn.prune(min_identity);
        if verbose {
            eprintln!("Removed {removed} blocks with identity below {min_identity}");
        }
    }

    let classifier = ContextClassifier::new(ClassifierConfig {
        context_width: args.context_width,
    });
    let mut results = ResultSet::classify(&genes, &syn, &classifier);

    if let Some(path) = &args.nstrings {
        let mask = GapMask::new(nstrings::parse_nstrings_file(path)?);
        if verbose {
            eprintln!("Loaded {} assembly gaps", mask.len());
        }
        results.annotate_gaps(&mask, &syn);
    }

    let summary = match &args.hits {
        Some(path) => {
            let validator = HitValidator::new(HitValidatorConfig {
                flank_width: args.flank_width,
                target_flank_ratio: args.target_flank_ratio,
                min_neighbors: args.min_neighbors,
                quiet: args.quiet,
            });
            let parsed = hits::parse_hits_file(path)?;
            Some(results.merge_hits(&path.display().to_string(), parsed, &validator, &syn)?)
        }
        None => None,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => write_text(&mut out, &results, summary.as_ref())?,
        OutputFormat::Json => write_json(&mut out, &results, summary.as_ref())?,
        OutputFormat::Tsv => write_tsv(&mut out, &results)?,
    }
    out.flush()?;

    Ok(())
}

fn write_text<W: Write>(
    out: &mut W,
    results: &ResultSet,
    summary: Option<&HitSummary>,
) -> io::Result<()> {
    writeln!(
        out,
        "Genes: {} total, {} present, {} simple",
        results.len(),
        results.count_present(),
        results.count_simple()
    )?;
    if let Some(s) = summary {
        writeln!(
            out,
            "Hits: {} total, {} accepted, {} on unsyntenic contigs, {} with too few neighbors",
            s.total, s.accepted, s.no_syntenic_target, s.too_few_neighbors
        )?;
    }
    writeln!(out)?;

    for result in results {
        write_text_gene(out, result)?;
    }
    Ok(())
}

fn write_text_gene<W: Write>(out: &mut W, result: &GeneResult) -> io::Result<()> {
    let presence = if result.context.is_present {
        "present"
    } else {
        "absent"
    };
    let structure = if result.context.is_simple {
        "simple"
    } else {
        "complex"
    };
    let gap = match result.target_gap {
        Some(true) => "  target gap",
        _ => "",
    };

    writeln!(
        out,
        "{}\t{}\t{presence}\t{structure}\thits {}/{}{gap}",
        result.gene.name,
        result.gene.interval,
        result.hits.len(),
        result.total_hits
    )?;

    for hit in &result.hits {
        write!(
            out,
            "    {} -> {}  score {}",
            hit.query(),
            hit.target(),
            hit.score()
        )?;
        if let Some(f) = hit.features() {
            write!(
                out,
                "  introns {} (max {})  split codons {}",
                f.intron_count, f.max_intron_length, f.split_codon_count
            )?;
            if f.has_frameshift {
                write!(out, "  frameshift")?;
            }
            if f.has_premature_stop() {
                write!(out, "  premature stop")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_json<W: Write>(
    out: &mut W,
    results: &ResultSet,
    summary: Option<&HitSummary>,
) -> anyhow::Result<()> {
    let genes: Vec<_> = results.iter().map(GeneResult::report).collect();

    let output = serde_json::json!({
        "summary": {
            "genes": results.len(),
            "present": results.count_present(),
            "simple": results.count_simple(),
            "hits": summary,
        },
        "genes": genes,
    });

    writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

fn write_tsv<W: Write>(out: &mut W, results: &ResultSet) -> io::Result<()> {
    writeln!(
        out,
        "name\tcontig\tstart\tstop\tis_present\tis_simple\ttarget_gap\ttotal_hits\taccepted_hits\thit_targets"
    )?;

    for result in results {
        let gap = result
            .target_gap
            .map_or_else(|| "NA".to_string(), |g| g.to_string());
        let targets = result
            .hits
            .iter()
            .map(AlignmentHit::target)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            result.gene.name,
            result.gene.interval.contig,
            result.gene.interval.start,
            result.gene.interval.stop,
            result.context.is_present,
            result.context.is_simple,
            gap,
            result.total_hits,
            result.hits.len(),
            if targets.is_empty() { "." } else { targets.as_str() },
        )?;
    }
    Ok(())
}
