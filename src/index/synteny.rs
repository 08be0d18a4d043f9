use tracing::debug;

use crate::core::interval::Interval;
use crate::core::types::{BlockId, Strand, SyntenyRecord};
use crate::index::ordered::{NodeId, OrderedIntervalIndex};

/// Live block and contig counts for one side of the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SideSummary {
    pub blocks: usize,
    pub contigs: usize,
}

/// Synteny blocks indexed on both genomes.
///
/// Block `i` of the input is node `i` in both the query-ordered and the
/// target-ordered index, so each side reaches its partner through the shared
/// [`BlockId`]. Both sides are removed together.
#[derive(Debug, Clone)]
pub struct SyntenyIndex {
    query: OrderedIntervalIndex,
    target: OrderedIntervalIndex,
    scores: Vec<f64>,
    strands: Vec<Strand>,
}

impl SyntenyIndex {
    pub fn from_records(records: Vec<SyntenyRecord>) -> Self {
        let mut query = Vec::with_capacity(records.len());
        let mut target = Vec::with_capacity(records.len());
        let mut scores = Vec::with_capacity(records.len());
        let mut strands = Vec::with_capacity(records.len());

        for record in records {
            query.push(Interval::new(
                record.query_contig,
                record.query_start,
                record.query_stop,
            ));
            target.push(Interval::new(
                record.target_contig,
                record.target_start,
                record.target_stop,
            ));
            scores.push(record.identity);
            strands.push(record.strand);
        }

        let index = Self {
            query: OrderedIntervalIndex::build(query),
            target: OrderedIntervalIndex::build(target),
            scores,
            strands,
        };
        debug!(
            "Indexed {} synteny blocks ({} query contigs, {} target contigs)",
            index.len(),
            index.query_summary().contigs,
            index.target_summary().contigs
        );
        index
    }

    /// Query-ordered side of the index
    #[must_use]
    pub fn query(&self) -> &OrderedIntervalIndex {
        &self.query
    }

    /// Target-ordered side of the index
    #[must_use]
    pub fn target(&self) -> &OrderedIntervalIndex {
        &self.target
    }

    #[must_use]
    pub fn query_interval(&self, block: BlockId) -> &Interval {
        self.query.interval(NodeId(block.0))
    }

    #[must_use]
    pub fn target_interval(&self, block: BlockId) -> &Interval {
        self.target.interval(NodeId(block.0))
    }

    #[must_use]
    pub fn score(&self, block: BlockId) -> f64 {
        self.scores[block.0]
    }

    #[must_use]
    pub fn strand(&self, block: BlockId) -> Strand {
        self.strands[block.0]
    }

    /// Number of live blocks
    #[must_use]
    pub fn len(&self) -> usize {
        self.query.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    #[must_use]
    pub fn query_summary(&self) -> SideSummary {
        SideSummary {
            blocks: self.query.len(),
            contigs: self.query.contig_sizes().len(),
        }
    }

    #[must_use]
    pub fn target_summary(&self) -> SideSummary {
        SideSummary {
            blocks: self.target.len(),
            contigs: self.target.contig_sizes().len(),
        }
    }

    /// Block whose query side overlaps (or, failing that, flanks) `interval`
    #[must_use]
    pub fn anchor_query(&self, interval: &Interval) -> Option<BlockId> {
        self.query.anchor(interval).map(|id| BlockId(id.0))
    }

    /// Block whose target side overlaps (or, failing that, flanks) `interval`
    #[must_use]
    pub fn anchor_target(&self, interval: &Interval) -> Option<BlockId> {
        self.target.anchor(interval).map(|id| BlockId(id.0))
    }

    /// Previous block along the query chain
    #[must_use]
    pub fn query_prev(&self, block: BlockId) -> Option<BlockId> {
        self.query.prev(NodeId(block.0)).map(|id| BlockId(id.0))
    }

    /// Next block along the query chain
    #[must_use]
    pub fn query_next(&self, block: BlockId) -> Option<BlockId> {
        self.query.next(NodeId(block.0)).map(|id| BlockId(id.0))
    }

    /// Up to `k` blocks before `block` along the query chain, nearest first
    pub fn query_preceding(&self, block: BlockId, k: usize) -> impl Iterator<Item = BlockId> + '_ {
        self.query
            .get_preceding(NodeId(block.0), k)
            .map(|id| BlockId(id.0))
    }

    /// Up to `k` blocks after `block` along the query chain, nearest first
    pub fn query_following(&self, block: BlockId, k: usize) -> impl Iterator<Item = BlockId> + '_ {
        self.query
            .get_following(NodeId(block.0), k)
            .map(|id| BlockId(id.0))
    }

    /// Blocks whose target side overlaps `interval`, in target order
    #[must_use]
    pub fn target_overlapping(&self, interval: &Interval) -> Vec<BlockId> {
        self.target
            .get_overlapping(interval)
            .into_iter()
            .map(|id| BlockId(id.0))
            .collect()
    }

    /// Remove every block scoring below `min_score` from both sides.
    ///
    /// Must run before any classification; returns the number of blocks removed.
    pub fn prune(&mut self, min_score: f64) -> usize {
        let mut removed = 0;
        for (i, &score) in self.scores.iter().enumerate() {
            if score < min_score && self.query.is_live(NodeId(i)) {
                self.query.unlink(NodeId(i));
                self.target.unlink(NodeId(i));
                removed += 1;
            }
        }
        self.query.compact();
        self.target.compact();

        debug!(
            "Pruned {} synteny blocks below identity {}, {} remain",
            removed,
            min_score,
            self.len()
        );
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        query: (&str, u64, u64),
        target: (&str, u64, u64),
        identity: f64,
    ) -> SyntenyRecord {
        SyntenyRecord {
            query_contig: query.0.to_string(),
            query_start: query.1,
            query_stop: query.2,
            target_contig: target.0.to_string(),
            target_start: target.1,
            target_stop: target.2,
            identity,
            strand: Strand::Forward,
        }
    }

    #[test]
    fn test_partners_share_block_id() {
        let index = SyntenyIndex::from_records(vec![
            record(("q1", 50, 60), ("t1", 500, 600), 0.5),
            record(("q1", 10, 20), ("t2", 100, 200), 0.9),
        ]);

        let block = index.anchor_query(&Interval::new("q1", 12, 14)).unwrap();
        assert_eq!(block, BlockId(1));
        assert_eq!(index.target_interval(block), &Interval::new("t2", 100, 200));
        assert!((index.score(block) - 0.9).abs() < f64::EPSILON);

        let back = index
            .anchor_target(&Interval::new("t1", 550, 550))
            .unwrap();
        assert_eq!(index.query_interval(back), &Interval::new("q1", 50, 60));
        assert_eq!(index.query_next(BlockId(1)), Some(BlockId(0)));
    }

    #[test]
    fn test_prune_removes_both_sides() {
        let mut index = SyntenyIndex::from_records(vec![
            record(("q1", 10, 20), ("t1", 10, 20), 0.9),
            record(("q1", 30, 40), ("t1", 30, 40), 0.5),
            record(("q1", 50, 60), ("t1", 50, 60), 0.9),
        ]);

        assert_eq!(index.prune(0.6), 1);
        assert_eq!(index.len(), 2);
        assert_eq!(index.target_summary().blocks, 2);

        for side in [index.query(), index.target()] {
            assert!(!side.is_live(NodeId(1)));
            assert_eq!(side.next(NodeId(0)), Some(NodeId(2)));
            assert_eq!(side.prev(NodeId(2)), Some(NodeId(0)));
        }
    }

    #[test]
    fn test_prune_keeps_threshold_score() {
        let mut index = SyntenyIndex::from_records(vec![
            record(("q1", 10, 20), ("t1", 10, 20), 0.5),
        ]);
        assert_eq!(index.prune(0.5), 0);
        assert_eq!(index.prune(0.51), 1);
        assert!(index.is_empty());
        assert_eq!(index.anchor_query(&Interval::new("q1", 10, 20)), None);
    }

    #[test]
    fn test_prune_reanchors_to_remaining_block() {
        let mut index = SyntenyIndex::from_records(vec![
            record(("q1", 10, 20), ("t1", 10, 20), 0.5),
            record(("q1", 100, 200), ("t1", 100, 200), 0.9),
            record(("q2", 10, 20), ("t2", 10, 20), 0.5),
        ]);
        let gene = Interval::new("q1", 12, 18);
        assert_eq!(index.anchor_query(&gene), Some(BlockId(0)));

        index.prune(0.6);
        assert_eq!(index.anchor_query(&gene), Some(BlockId(1)));
        assert_eq!(index.anchor_query(&Interval::new("q2", 12, 18)), None);
        assert_eq!(
            index.query_summary(),
            SideSummary {
                blocks: 1,
                contigs: 1
            }
        );
    }

    #[test]
    fn test_target_overlapping() {
        let index = SyntenyIndex::from_records(vec![
            record(("q1", 10, 20), ("t1", 10, 20), 0.5),
            record(("q1", 100, 180), ("t1", 30, 40), 0.5),
            record(("q1", 50, 60), ("t1", 50, 60), 0.5),
        ]);
        assert_eq!(
            index.target_overlapping(&Interval::new("t1", 15, 55)),
            vec![BlockId(0), BlockId(1), BlockId(2)]
        );
        assert_eq!(index.strand(BlockId(0)), Strand::Forward);
    }
}
