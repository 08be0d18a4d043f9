//! Stats command - summarize a synteny block table before classification.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{parse_identity, OutputFormat};
use crate::core::gene::GeneSet;
use crate::core::types::{BlockId, Strand};
use crate::index::synteny::{SideSummary, SyntenyIndex};
use crate::parsing::{gff, synteny};

/// Arguments for the stats command
#[derive(Args)]
pub struct StatsArgs {
    /// Synteny blocks to summarize
    #[arg(required = true)]
    pub synteny: PathBuf,

    /// Also report how many of these query genes lie on contigs with blocks
    #[arg(short, long)]
    pub genes: Option<PathBuf>,

    /// Report counts after dropping blocks with identity below this value
    #[arg(long, value_parser = parse_identity)]
    pub min_identity: Option<f64>,
}

#[derive(Debug, serde::Serialize)]
struct SyntenyStats {
    blocks: usize,
    mean_identity: Option<f64>,
    reverse_blocks: usize,
    pruned: Option<usize>,
    query: SideSummary,
    target: SideSummary,
    query_contigs: Vec<(String, usize)>,
    genes: Option<GeneCoverage>,
}

#[derive(Debug, serde::Serialize)]
struct GeneCoverage {
    total: usize,
    on_syntenic_contigs: usize,
}

/// Execute the stats command
///
/// # Errors
///
/// Returns an error if an input file cannot be parsed.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: StatsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let records = synteny::parse_synteny_file(&args.synteny)?;
    if verbose {
        eprintln!("Read {} synteny blocks from {}", records.len(), args.synteny.display());
    }

    let mut syn = SyntenyIndex::from_records(records);
    let genes = args.genes.as_deref().map(gff::parse_gff_file).transpose()?;
    let stats = compute_stats(&mut syn, genes.as_ref(), args.min_identity);

    match format {
        OutputFormat::Text => print_text(&stats),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Tsv => print_tsv(&stats),
    }

    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn compute_stats(
    syn: &mut SyntenyIndex,
    genes: Option<&GeneSet>,
    min_identity: Option<f64>,
) -> SyntenyStats {
    let blocks = syn.len();
    let pruned = min_identity.map(|min| syn.prune(min));

    let live: Vec<BlockId> = syn
        .query()
        .contig_sizes()
        .iter()
        .flat_map(|&(contig, _)| syn.query().contig_nodes(contig))
        .map(|id| BlockId(id.0))
        .collect();
    let identities: Vec<f64> = live.iter().map(|&block| syn.score(block)).collect();
    let reverse_blocks = live
        .iter()
        .filter(|&&block| syn.strand(block) == Strand::Reverse)
        .count();
    let mean_identity = (!identities.is_empty())
        .then(|| identities.iter().sum::<f64>() / identities.len() as f64);

    let query_contigs = syn
        .query()
        .contig_sizes()
        .into_iter()
        .map(|(contig, n)| (contig.to_string(), n))
        .collect();

    let genes = genes.map(|set| GeneCoverage {
        total: set.len(),
        on_syntenic_contigs: set
            .iter()
            .filter(|g| !syn.query().contig_nodes(&g.interval.contig).is_empty())
            .count(),
    });

    SyntenyStats {
        blocks,
        mean_identity,
        reverse_blocks,
        pruned,
        query: syn.query_summary(),
        target: syn.target_summary(),
        query_contigs,
        genes,
    }
}

fn print_text(stats: &SyntenyStats) {
    println!("Synteny blocks: {}", stats.blocks);
    if let Some(pruned) = stats.pruned {
        println!("   Removed below identity threshold: {pruned}");
    }
    println!(
        "   Query side:  {} blocks on {} contigs",
        stats.query.blocks, stats.query.contigs
    );
    println!(
        "   Target side: {} blocks on {} contigs",
        stats.target.blocks, stats.target.contigs
    );
    println!("   Reverse strand: {} blocks", stats.reverse_blocks);
    if let Some(mean) = stats.mean_identity {
        println!("   Mean identity: {:.1}%", mean * 100.0);
    }

    if let Some(genes) = &stats.genes {
        println!(
            "\nGenes: {} total, {} on contigs with synteny blocks",
            genes.total, genes.on_syntenic_contigs
        );
    }

    println!("\nBlocks per query contig:");
    for (contig, n) in &stats.query_contigs {
        println!("   {contig}\t{n}");
    }
}

fn print_tsv(stats: &SyntenyStats) {
    println!("contig\tblocks");
    for (contig, n) in &stats.query_contigs {
        println!("{contig}\t{n}");
    }
}
