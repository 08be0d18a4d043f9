use tracing::{debug, warn};

use crate::classify::results::GeneResult;
use crate::core::hit::AlignmentHit;
use crate::core::interval::Interval;
use crate::core::types::BlockId;
use crate::index::synteny::SyntenyIndex;

/// Default flank width (bp) around a gene on the query genome
pub const DEFAULT_FLANK_WIDTH: u64 = 25_000;

/// Default minimum number of syntenic neighbors a hit must land near
pub const DEFAULT_MIN_NEIGHBORS: usize = 3;

/// Default target flank width as a multiple of the query flank width
pub const DEFAULT_TARGET_FLANK_RATIO: f64 = 2.0;

/// Configuration for hit validation
#[derive(Debug, Clone)]
pub struct HitValidatorConfig {
    /// Query-side flank added to each side of the gene
    pub flank_width: u64,

    /// Target-side flank as a multiple of `flank_width`
    pub target_flank_ratio: f64,

    /// Matching neighbors required to accept a hit
    pub min_neighbors: usize,

    /// Suppress warnings for hits on unsyntenic target contigs
    pub quiet: bool,
}

impl Default for HitValidatorConfig {
    fn default() -> Self {
        Self {
            flank_width: DEFAULT_FLANK_WIDTH,
            target_flank_ratio: DEFAULT_TARGET_FLANK_RATIO,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            quiet: false,
        }
    }
}

/// What happened to one alignment hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Attached to the gene's result
    Accepted { matching: usize, total: usize },

    /// No synteny block lies on the hit's target contig
    NoSyntenicTarget,

    /// Fewer than `min_neighbors` flanking blocks map near the hit
    TooFewNeighbors { matching: usize, total: usize },
}

impl HitOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, HitOutcome::Accepted { .. })
    }
}

/// Accepts an alignment hit only if enough of the gene's flanking synteny
/// blocks map to the neighborhood of the hit on the target genome.
#[derive(Debug, Clone, Default)]
pub struct HitValidator {
    config: HitValidatorConfig,
}

impl HitValidator {
    pub fn new(config: HitValidatorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &HitValidatorConfig {
        &self.config
    }

    /// Target-side flank width, `round(ratio * flank_width)`
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn target_flank_width(&self) -> u64 {
        (self.config.target_flank_ratio * self.config.flank_width as f64).round() as u64
    }

    /// Validate `hit` against its gene, attaching it to `result` if accepted.
    ///
    /// Every call counts toward `result.total_hits`, whatever the outcome.
    pub fn validate(
        &self,
        result: &mut GeneResult,
        hit: AlignmentHit,
        syn: &SyntenyIndex,
    ) -> HitOutcome {
        result.total_hits += 1;

        let Some(anchor) = syn.anchor_target(hit.target()) else {
            if !self.config.quiet {
                warn!(
                    "Hit for {} lies on a target contig with no synteny blocks: {}",
                    result.gene.name,
                    hit.target()
                );
            }
            return HitOutcome::NoSyntenicTarget;
        };

        let target_flanks = syn.target_interval(anchor).expand(self.target_flank_width());
        let flank_width = self.config.flank_width;
        let query_flanks: &Interval = result
            .query_flanks
            .get_or_insert_with(|| result.gene.interval.expand(flank_width));

        let backward = result.context.lower.map(|lower| {
            tally(
                std::iter::once(lower).chain(syn.query_preceding(lower, usize::MAX)),
                query_flanks,
                &target_flanks,
                syn,
            )
        });
        let forward = result.context.upper.map(|upper| {
            tally(
                std::iter::once(upper).chain(syn.query_following(upper, usize::MAX)),
                query_flanks,
                &target_flanks,
                syn,
            )
        });

        let (matching, total) = [backward, forward]
            .into_iter()
            .flatten()
            .fold((0, 0), |(m, t), (dm, dt)| (m + dm, t + dt));

        if matching >= self.config.min_neighbors {
            result.hits.push(hit);
            HitOutcome::Accepted { matching, total }
        } else {
            debug!(
                "Dropped hit for {} at {}: {matching} of {total} flanking blocks nearby",
                result.gene.name,
                hit.target()
            );
            HitOutcome::TooFewNeighbors { matching, total }
        }
    }
}

/// Count blocks inside the query flanks, and how many of those map into the
/// target flanks. Stops at the first block outside the query flanks.
fn tally(
    blocks: impl Iterator<Item = BlockId>,
    query_flanks: &Interval,
    target_flanks: &Interval,
    syn: &SyntenyIndex,
) -> (usize, usize) {
    let mut matching = 0;
    let mut total = 0;
    for block in blocks.take_while(|&block| syn.query_interval(block).overlaps(query_flanks)) {
        total += 1;
        if syn.target_interval(block).overlaps(target_flanks) {
            matching += 1;
        }
    }
    (matching, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::context::ContextClassifier;
    use crate::core::gene::Gene;
    use crate::core::hit::HitRegion;
    use crate::core::types::{Strand, SyntenyRecord};

    fn block(q: (&str, u64, u64), t: (&str, u64, u64)) -> SyntenyRecord {
        SyntenyRecord {
            query_contig: q.0.to_string(),
            query_start: q.1,
            query_stop: q.2,
            target_contig: t.0.to_string(),
            target_start: t.1,
            target_stop: t.2,
            identity: 1.0,
            strand: Strand::Forward,
        }
    }

    /// Two blocks either side of a gap on q1, collinear with t1
    fn neighborhood() -> SyntenyIndex {
        SyntenyIndex::from_records(vec![
            block(("q1", 1000, 1100), ("t1", 5000, 5100)),
            block(("q1", 1200, 1300), ("t1", 5200, 5300)),
            block(("q1", 1700, 1800), ("t1", 5700, 5800)),
            block(("q1", 1900, 2000), ("t1", 5900, 6000)),
        ])
    }

    fn gene_result(syn: &SyntenyIndex) -> GeneResult {
        let gene = Gene::new("g1", "q1", 1400, 1500);
        let context = ContextClassifier::default().classify(&gene.interval, syn);
        GeneResult::new(gene, context)
    }

    fn hit(contig: &str, start: u64, stop: u64) -> AlignmentHit {
        AlignmentHit::Basic(HitRegion {
            gene: "g1".to_string(),
            query: Interval::new("q1", 1400, 1500),
            target: Interval::new(contig, start, stop),
            score: 0.95,
            line: 0,
        })
    }

    fn validator(flank_width: u64, min_neighbors: usize) -> HitValidator {
        HitValidator::new(HitValidatorConfig {
            flank_width,
            target_flank_ratio: 2.0,
            min_neighbors,
            quiet: true,
        })
    }

    #[test]
    fn test_accepts_hit_inside_neighborhood() {
        let syn = neighborhood();
        let mut result = gene_result(&syn);
        assert!(!result.context.is_present);

        let outcome = validator(1000, 3).validate(&mut result, hit("t1", 5450, 5550), &syn);
        assert_eq!(
            outcome,
            HitOutcome::Accepted {
                matching: 4,
                total: 4
            }
        );
        assert_eq!(result.total_hits, 1);
        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.query_flanks, Some(Interval::new("q1", 400, 2500)));
    }

    #[test]
    fn test_rejects_distant_hit() {
        let syn = SyntenyIndex::from_records(vec![
            block(("q1", 1000, 1100), ("t1", 5000, 5100)),
            block(("q1", 1200, 1300), ("t1", 5200, 5300)),
            block(("q1", 1700, 1800), ("t1", 5700, 5800)),
            block(("q1", 1900, 2000), ("t1", 5900, 6000)),
            block(("q9", 0, 100), ("t1", 90_000, 90_100)),
        ]);
        let mut result = gene_result(&syn);

        let outcome = validator(1000, 3).validate(&mut result, hit("t1", 90_000, 90_050), &syn);
        assert_eq!(
            outcome,
            HitOutcome::TooFewNeighbors {
                matching: 0,
                total: 4
            }
        );
        assert_eq!(result.total_hits, 1);
        assert!(result.hits.is_empty());
    }

    #[test]
    fn test_no_syntenic_target_contig() {
        let syn = neighborhood();
        let mut result = gene_result(&syn);

        let outcome = validator(1000, 0).validate(&mut result, hit("t7", 1, 10), &syn);
        assert_eq!(outcome, HitOutcome::NoSyntenicTarget);
        assert_eq!(result.total_hits, 1);
        assert!(result.hits.is_empty());
    }

    #[test]
    fn test_query_flanks_bound_the_walk() {
        let syn = neighborhood();
        let mut result = gene_result(&syn);

        // Only the two nearest blocks fall within 250bp of the gene
        let outcome = validator(250, 3).validate(&mut result, hit("t1", 5450, 5550), &syn);
        assert_eq!(
            outcome,
            HitOutcome::TooFewNeighbors {
                matching: 2,
                total: 2
            }
        );
        assert_eq!(result.query_flanks, Some(Interval::new("q1", 1150, 1750)));
    }

    #[test]
    fn test_acceptance_is_monotone_in_min_neighbors() {
        let syn = neighborhood();
        let mut accepted_before = true;
        for min_neighbors in 0..8 {
            let mut result = gene_result(&syn);
            let accepted = validator(1000, min_neighbors)
                .validate(&mut result, hit("t1", 5450, 5550), &syn)
                .is_accepted();
            assert!(accepted_before || !accepted);
            accepted_before = accepted;
        }
        assert!(!accepted_before);
    }

    #[test]
    fn test_total_hits_counts_every_hit() {
        let syn = neighborhood();
        let mut result = gene_result(&syn);
        let v = validator(1000, 3);

        v.validate(&mut result, hit("t1", 5450, 5550), &syn);
        v.validate(&mut result, hit("t7", 1, 10), &syn);
        v.validate(&mut result, hit("t1", 5460, 5560), &syn);
        assert_eq!(result.total_hits, 3);
        assert_eq!(result.hits.len(), 2);
    }

    #[test]
    fn test_target_flank_width_rounds() {
        let v = HitValidator::new(HitValidatorConfig {
            flank_width: 25_001,
            target_flank_ratio: 1.5,
            ..Default::default()
        });
        assert_eq!(v.target_flank_width(), 37_502);
        assert_eq!(HitValidator::default().target_flank_width(), 50_000);
    }
}
