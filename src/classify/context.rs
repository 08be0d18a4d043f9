use crate::core::interval::Interval;
use crate::core::types::BlockId;
use crate::index::synteny::SyntenyIndex;

/// Default number of synteny blocks considered on each side of a gene
pub const DEFAULT_CONTEXT_WIDTH: usize = 10;

/// Configuration for the context classifier
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Blocks to include on each side of the gene (at least 1)
    pub context_width: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            context_width: DEFAULT_CONTEXT_WIDTH,
        }
    }
}

/// The synteny neighborhood of one gene
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntenicContext {
    /// At least one synteny block overlaps the gene
    pub is_present: bool,

    /// The neighborhood maps collinearly to a single target contig
    pub is_simple: bool,

    /// Nearest block before the gene that does not overlap it
    pub lower: Option<BlockId>,

    /// Nearest block after the gene that does not overlap it
    pub upper: Option<BlockId>,

    /// Contiguous blocks overlapping the gene, in query order
    pub links: Vec<BlockId>,

    /// `lower`-side window, links and `upper`-side window, in query order
    pub context: Vec<BlockId>,
}

/// Decides whether a gene has syntenic support and whether its region is
/// structurally simple relative to the target genome.
#[derive(Debug, Clone, Default)]
pub struct ContextClassifier {
    config: ClassifierConfig,
}

impl ContextClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a gene against the (already pruned) synteny index
    #[must_use]
    pub fn classify(&self, gene: &Interval, syn: &SyntenyIndex) -> SyntenicContext {
        let Some(anchor) = syn.anchor_query(gene) else {
            return SyntenicContext::default();
        };

        let links = collect_links(gene, anchor, syn);
        let (lower, upper) = flanking_blocks(gene, anchor, &links, syn);
        let context = self.window(lower, upper, &links, syn);
        let is_simple = is_simple(&context, syn);

        SyntenicContext {
            is_present: !links.is_empty(),
            is_simple,
            lower,
            upper,
            links,
            context,
        }
    }

    /// Up to `context_width` blocks on each side of the gene plus the links.
    ///
    /// The lower side counts `lower` itself, then walks back `width - 1` blocks;
    /// the upper side mirrors it.
    fn window(
        &self,
        lower: Option<BlockId>,
        upper: Option<BlockId>,
        links: &[BlockId],
        syn: &SyntenyIndex,
    ) -> Vec<BlockId> {
        let reach = self.config.context_width.max(1) - 1;
        let mut context = Vec::with_capacity(2 * reach + links.len() + 2);

        if let Some(lower) = lower {
            let mut before: Vec<BlockId> = syn.query_preceding(lower, reach).collect();
            before.reverse();
            context.extend(before);
            context.push(lower);
        }
        context.extend_from_slice(links);
        if let Some(upper) = upper {
            context.push(upper);
            context.extend(syn.query_following(upper, reach));
        }
        context
    }
}

/// Walk outward from the anchor while blocks keep overlapping the gene
fn collect_links(gene: &Interval, anchor: BlockId, syn: &SyntenyIndex) -> Vec<BlockId> {
    let overlaps = |block: &BlockId| syn.query_interval(*block).overlaps(gene);

    let mut links: Vec<BlockId> = std::iter::once(anchor)
        .chain(syn.query_preceding(anchor, usize::MAX))
        .take_while(overlaps)
        .collect();
    links.extend(
        syn.query_following(anchor, usize::MAX)
            .take_while(overlaps),
    );

    links.sort_by_key(|&block| {
        let iv = syn.query_interval(block);
        (iv.start, iv.stop, block)
    });
    links
}

fn flanking_blocks(
    gene: &Interval,
    anchor: BlockId,
    links: &[BlockId],
    syn: &SyntenyIndex,
) -> (Option<BlockId>, Option<BlockId>) {
    match (links.first(), links.last()) {
        (Some(&first), Some(&last)) => (syn.query_prev(first), syn.query_next(last)),
        _ if gene.is_before(syn.query_interval(anchor)) => (syn.query_prev(anchor), Some(anchor)),
        _ => (Some(anchor), syn.query_next(anchor)),
    }
}

/// A context is simple when all of it maps to one target contig and no block
/// aligned inside its target span comes from outside its query span.
fn is_simple(context: &[BlockId], syn: &SyntenyIndex) -> bool {
    let Some(&first) = context.first() else {
        return false;
    };

    let target_contig = syn.target_interval(first).contig.as_str();
    if context
        .iter()
        .any(|&block| syn.target_interval(block).contig != target_contig)
    {
        return false;
    }

    let query_contig = syn.query_interval(first).contig.as_str();
    let query_bound = Interval::bounding(
        query_contig,
        context.iter().map(|&block| syn.query_interval(block)),
    );
    let target_bound = Interval::bounding(
        target_contig,
        context.iter().map(|&block| syn.target_interval(block)),
    );
    let (Some(query_bound), Some(target_bound)) = (query_bound, target_bound) else {
        return false;
    };

    syn.target_overlapping(&target_bound)
        .into_iter()
        .all(|block| syn.query_interval(block).overlaps(&query_bound))
}
