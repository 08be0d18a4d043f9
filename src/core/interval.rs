use serde::{Deserialize, Serialize};

/// A closed genomic interval on a single contig.
///
/// Coordinates are taken verbatim from the input files; both ends are inclusive.
/// Construction assumes `start <= stop` (checked by the parsers, see
/// [`crate::utils::validation::check_interval`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub contig: String,
    pub start: u64,
    pub stop: u64,
}

impl Interval {
    pub fn new(contig: impl Into<String>, start: u64, stop: u64) -> Self {
        debug_assert!(start <= stop, "interval stop precedes start");
        Self {
            contig: contig.into(),
            start,
            stop,
        }
    }

    /// True when both intervals lie on the same contig and share at least one position.
    #[must_use]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.contig == other.contig && self.stop >= other.start && self.start <= other.stop
    }

    /// True when `self` lies entirely before `other` on the same contig.
    #[must_use]
    pub fn is_before(&self, other: &Interval) -> bool {
        self.stop < other.start
    }

    /// True when `self` lies entirely after `other` on the same contig.
    #[must_use]
    pub fn is_after(&self, other: &Interval) -> bool {
        self.start > other.stop
    }

    /// Grow the interval by `width` on both sides, clamping the start at zero.
    #[must_use]
    pub fn expand(&self, width: u64) -> Self {
        Self {
            contig: self.contig.clone(),
            start: self.start.saturating_sub(width),
            stop: self.stop.saturating_add(width),
        }
    }

    /// Smallest interval on `contig` covering every interval in `intervals`.
    ///
    /// Returns `None` for an empty input. Contigs of the inputs are not checked.
    pub fn bounding<'a, I>(contig: &str, intervals: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Interval>,
    {
        intervals
            .into_iter()
            .fold(None, |acc: Option<(u64, u64)>, iv| match acc {
                None => Some((iv.start, iv.stop)),
                Some((lo, hi)) => Some((lo.min(iv.start), hi.max(iv.stop))),
            })
            .map(|(start, stop)| Self::new(contig, start, stop))
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(contig: &str, start: u64, stop: u64) -> Interval {
        Interval::new(contig, start, stop)
    }

    #[test]
    fn test_overlaps() {
        let a = iv("a", 10, 20);
        assert!(!a.overlaps(&iv("a", 1, 9)));
        assert!(a.overlaps(&iv("a", 1, 10)));
        assert!(a.overlaps(&iv("a", 10, 11)));
        assert!(a.overlaps(&iv("a", 11, 19)));
        assert!(a.overlaps(&iv("a", 20, 21)));
        assert!(a.overlaps(&iv("a", 1, 30)));
        assert!(!a.overlaps(&iv("a", 21, 30)));
        // Same coordinates on a different contig never overlap
        assert!(!a.overlaps(&iv("b", 7, 14)));
    }

    #[test]
    fn test_overlaps_is_symmetric() {
        let intervals = [
            iv("a", 1, 9),
            iv("a", 1, 10),
            iv("a", 10, 11),
            iv("a", 21, 30),
            iv("b", 7, 14),
        ];
        for x in &intervals {
            for y in &intervals {
                assert_eq!(x.overlaps(y), y.overlaps(x), "{x} vs {y}");
            }
        }
    }

    #[test]
    fn test_expand_clamps_at_zero() {
        let flanked = iv("a", 5, 10).expand(20);
        assert_eq!(flanked.start, 0);
        assert_eq!(flanked.stop, 30);
    }

    #[test]
    fn test_bounding() {
        let parts = [iv("a", 30, 40), iv("a", 10, 20), iv("a", 15, 55)];
        let bound = Interval::bounding("a", parts.iter()).unwrap();
        assert_eq!(bound, iv("a", 10, 55));
        assert!(Interval::bounding("a", std::iter::empty()).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(iv("chr1", 3, 7).to_string(), "chr1:3-7");
    }
}
