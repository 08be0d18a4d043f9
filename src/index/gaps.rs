use crate::core::interval::Interval;
use crate::index::ordered::OrderedIntervalIndex;

/// Runs of `N` (unsequenced gaps) in the target genome assembly
#[derive(Debug, Clone, Default)]
pub struct GapMask {
    index: OrderedIntervalIndex,
}

impl GapMask {
    pub fn new(gaps: Vec<Interval>) -> Self {
        Self {
            index: OrderedIntervalIndex::build(gaps),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// True if any gap overlaps `region`
    #[must_use]
    pub fn covers_any(&self, region: &Interval) -> bool {
        self.index
            .anchor(region)
            .is_some_and(|id| self.index.interval(id).overlaps(region))
    }
}
