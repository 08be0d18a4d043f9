use serde::{Deserialize, Serialize};

use crate::core::interval::Interval;

/// Fields shared by every alignment hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRegion {
    /// Name of the query gene the hit was computed for
    pub gene: String,

    /// Aligned part of the gene. Basic hits give it on the query genome;
    /// spliced hits give it in the gene's own coordinates, keyed by its name.
    pub query: Interval,

    /// Region hit on the target genome
    pub target: Interval,

    /// Alignment score reported by the aligner
    pub score: f64,

    /// 1-based line of the hit table this record was read from, 0 if built
    /// in memory
    #[serde(skip)]
    pub line: usize,
}

/// Gene-structure annotations from a spliced (protein-to-genome) alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplicedFeatures {
    /// Position of the first in-frame stop codon, if the alignment has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_stop: Option<u64>,
    pub has_frameshift: bool,
    pub split_codon_count: u32,
    pub intron_count: u32,
    pub max_intron_length: u64,
}

impl SplicedFeatures {
    #[must_use]
    pub fn has_premature_stop(&self) -> bool {
        self.first_stop.is_some()
    }
}

/// A candidate homology hit for a query gene.
///
/// The variant is fixed when the record is parsed; downstream code matches on it
/// rather than probing for optional fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlignmentHit {
    Basic(HitRegion),
    Spliced {
        #[serde(flatten)]
        region: HitRegion,
        #[serde(flatten)]
        features: SplicedFeatures,
    },
}

impl AlignmentHit {
    #[must_use]
    pub fn region(&self) -> &HitRegion {
        match self {
            Self::Basic(region) | Self::Spliced { region, .. } => region,
        }
    }

    #[must_use]
    pub fn gene(&self) -> &str {
        &self.region().gene
    }

    #[must_use]
    pub fn query(&self) -> &Interval {
        &self.region().query
    }

    #[must_use]
    pub fn target(&self) -> &Interval {
        &self.region().target
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.region().score
    }

    /// Source line of the record, 0 if it was not parsed from a file
    #[must_use]
    pub fn line(&self) -> usize {
        self.region().line
    }

    #[must_use]
    pub fn features(&self) -> Option<&SplicedFeatures> {
        match self {
            Self::Basic(_) => None,
            Self::Spliced { features, .. } => Some(features),
        }
    }
}
