use std::collections::HashMap;

use crate::core::interval::Interval;

/// Position of an interval in the index arena (its position in the build input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
struct Node {
    interval: Interval,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    live: bool,
}

/// Sorted node ids of one contig plus the running maximum of their stops
#[derive(Debug, Clone, Default)]
struct ContigGroup {
    order: Vec<NodeId>,
    max_stop: Vec<u64>,
}

impl ContigGroup {
    fn new(order: Vec<NodeId>, nodes: &[Node]) -> Self {
        let mut group = Self {
            order,
            max_stop: Vec::new(),
        };
        group.rebuild_max_stop(nodes);
        group
    }

    fn rebuild_max_stop(&mut self, nodes: &[Node]) {
        self.max_stop.clear();
        self.max_stop.reserve(self.order.len());
        let mut running = 0;
        for id in &self.order {
            running = running.max(nodes[id.0].interval.stop);
            self.max_stop.push(running);
        }
    }

    fn retain_live(&mut self, nodes: &[Node]) {
        let before = self.order.len();
        self.order.retain(|id| nodes[id.0].live);
        if self.order.len() != before {
            self.rebuild_max_stop(nodes);
        }
    }

    /// Range `[first, end)` of `order` that can hold nodes overlapping `query`.
    ///
    /// Nodes before `end` start no later than `query.stop`; `first` is the first
    /// node whose running max stop reaches `query.start`, which is itself an
    /// overlapping node whenever `first < end`.
    fn candidate_range(&self, query: &Interval, nodes: &[Node]) -> (usize, usize) {
        let end = self
            .order
            .partition_point(|id| nodes[id.0].interval.start <= query.stop);
        let first = self.max_stop[..end].partition_point(|&stop| stop < query.start);
        (first, end)
    }
}

/// Direction of a walk along a contig chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Iterator over up to `k` chain neighbors of a node, excluding the node itself
pub struct ChainWalk<'a> {
    index: &'a OrderedIntervalIndex,
    cursor: Option<NodeId>,
    remaining: usize,
    direction: Direction,
}

impl Iterator for ChainWalk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.index.nodes[self.cursor?.0];
        let step = match self.direction {
            Direction::Backward => node.prev,
            Direction::Forward => node.next,
        };
        self.remaining -= 1;
        self.cursor = step;
        step
    }
}

impl std::iter::FusedIterator for ChainWalk<'_> {}

/// Per-contig ordered, doubly linked interval index.
///
/// All intervals live in one arena and refer to their chain neighbors by
/// [`NodeId`]. Within a contig, nodes are ordered by `(start, stop)` with ties
/// broken by input position, so the same multiset of inputs in any order
/// produces the same chains.
#[derive(Debug, Clone, Default)]
pub struct OrderedIntervalIndex {
    nodes: Vec<Node>,
    groups: HashMap<String, ContigGroup>,
}

impl OrderedIntervalIndex {
    /// Group intervals by contig, sort each group and link neighbors.
    ///
    /// The `i`-th input interval receives `NodeId(i)`.
    pub fn build(intervals: Vec<Interval>) -> Self {
        let mut nodes: Vec<Node> = intervals
            .into_iter()
            .map(|interval| Node {
                interval,
                prev: None,
                next: None,
                live: true,
            })
            .collect();

        let mut by_contig: HashMap<String, Vec<NodeId>> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            by_contig
                .entry(node.interval.contig.clone())
                .or_default()
                .push(NodeId(i));
        }

        let mut groups = HashMap::with_capacity(by_contig.len());
        for (contig, mut order) in by_contig {
            order.sort_by_key(|id| {
                let iv = &nodes[id.0].interval;
                (iv.start, iv.stop, id.0)
            });
            for pair in order.windows(2) {
                nodes[pair[0].0].next = Some(pair[1]);
                nodes[pair[1].0].prev = Some(pair[0]);
            }
            groups.insert(contig, ContigGroup::new(order, &nodes));
        }

        Self { nodes, groups }
    }

    #[must_use]
    pub fn interval(&self, id: NodeId) -> &Interval {
        &self.nodes[id.0].interval
    }

    #[must_use]
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].prev
    }

    #[must_use]
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next
    }

    #[must_use]
    pub fn is_live(&self, id: NodeId) -> bool {
        self.nodes[id.0].live
    }

    /// Number of live intervals
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(|g| g.order.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Live interval count per contig, sorted by contig name
    #[must_use]
    pub fn contig_sizes(&self) -> Vec<(&str, usize)> {
        let mut sizes: Vec<(&str, usize)> = self
            .groups
            .iter()
            .map(|(contig, group)| (contig.as_str(), group.order.len()))
            .collect();
        sizes.sort_unstable();
        sizes
    }

    /// Live nodes of `contig` in chain order
    #[must_use]
    pub fn contig_nodes(&self, contig: &str) -> &[NodeId] {
        self.groups
            .get(contig)
            .map_or(&[][..], |group| group.order.as_slice())
    }

    /// Find a node overlapping `query`, or a chain-adjacent node if none overlaps.
    ///
    /// Returns `None` when the query's contig has no live nodes. Runs a bisection
    /// bounded to `ceil(log2 n) + 1` probes; if no probe overlapped, a prefix-max
    /// lookup (also logarithmic) confirms that no overlapping node exists before
    /// settling for the last probed node.
    #[must_use]
    pub fn anchor(&self, query: &Interval) -> Option<NodeId> {
        let group = self.groups.get(&query.contig)?;
        let order = &group.order;
        if order.is_empty() {
            return None;
        }

        let (mut low, mut high) = (0, order.len() - 1);
        let mut i = high / 2;
        let mut candidate = order[i];

        for _ in 0..bisection_steps(order.len()) {
            candidate = order[i];
            let this = &self.nodes[candidate.0].interval;
            if query.is_before(this) {
                high = i;
                i = high - (high - low).div_ceil(2);
            } else if query.is_after(this) {
                low = i;
                i = low + (high - low).div_ceil(2);
            } else {
                return Some(candidate);
            }
        }

        // Nested intervals can hide an overlap from the bisection
        let (first, end) = group.candidate_range(query, &self.nodes);
        if first < end {
            return Some(order[first]);
        }
        Some(candidate)
    }

    /// All live nodes overlapping `query`, in chain order
    #[must_use]
    pub fn get_overlapping(&self, query: &Interval) -> Vec<NodeId> {
        let Some(group) = self.groups.get(&query.contig) else {
            return Vec::new();
        };
        let (first, end) = group.candidate_range(query, &self.nodes);
        group.order[first..end]
            .iter()
            .copied()
            .filter(|id| self.nodes[id.0].interval.stop >= query.start)
            .collect()
    }

    /// Up to `k` nodes before `id`, nearest first
    #[must_use]
    pub fn get_preceding(&self, id: NodeId, k: usize) -> ChainWalk<'_> {
        self.walk(id, k, Direction::Backward)
    }

    /// Up to `k` nodes after `id`, nearest first
    #[must_use]
    pub fn get_following(&self, id: NodeId, k: usize) -> ChainWalk<'_> {
        self.walk(id, k, Direction::Forward)
    }

    #[must_use]
    pub fn walk(&self, id: NodeId, k: usize, direction: Direction) -> ChainWalk<'_> {
        ChainWalk {
            index: self,
            cursor: Some(id),
            remaining: k,
            direction,
        }
    }

    /// Unlink `id` from its chain and drop it from the contig ordering.
    ///
    /// Removing an already removed node is a no-op.
    pub fn remove(&mut self, id: NodeId) {
        if self.unlink(id) {
            let contig = self.nodes[id.0].interval.contig.clone();
            if let Some(group) = self.groups.get_mut(&contig) {
                group.retain_live(&self.nodes);
                if group.order.is_empty() {
                    self.groups.remove(&contig);
                }
            }
        }
    }

    /// Detach `id` from its neighbors without touching the ordering arrays.
    ///
    /// Callers removing many nodes must finish with [`Self::compact`].
    pub(crate) fn unlink(&mut self, id: NodeId) -> bool {
        let node = &mut self.nodes[id.0];
        if !node.live {
            return false;
        }
        node.live = false;
        let prev = node.prev.take();
        let next = node.next.take();

        if let Some(prev) = prev {
            self.nodes[prev.0].next = next;
        }
        if let Some(next) = next {
            self.nodes[next.0].prev = prev;
        }
        true
    }

    /// Drop unlinked nodes from every contig ordering
    pub(crate) fn compact(&mut self) {
        for group in self.groups.values_mut() {
            group.retain_live(&self.nodes);
        }
        self.groups.retain(|_, group| !group.order.is_empty());
    }
}

/// `ceil(log2(n)) + 1` for `n >= 1`
fn bisection_steps(n: usize) -> u32 {
    usize::BITS - (n - 1).leading_zeros() + 1
}
