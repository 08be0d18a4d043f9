use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::classify::context::{ContextClassifier, SyntenicContext};
use crate::classify::hits::{HitOutcome, HitValidator};
use crate::core::gene::{Gene, GeneSet};
use crate::core::hit::AlignmentHit;
use crate::core::interval::Interval;
use crate::index::gaps::GapMask;
use crate::index::synteny::SyntenyIndex;

/// Errors that abort a classification run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{file}:{line}: alignment hit references unknown gene '{gene}' (target {target})")]
    DanglingHitReference {
        file: String,
        line: usize,
        gene: String,
        target: String,
    },
}

/// Everything known about one gene after classification
#[derive(Debug, Clone)]
pub struct GeneResult {
    pub gene: Gene,
    pub context: SyntenicContext,

    /// Whether an assembly gap sits between the target partners of the
    /// flanking blocks. `None` when no gap mask was supplied or the gene is
    /// present.
    pub target_gap: Option<bool>,

    /// Gene interval widened by the flank width, computed on first use
    pub query_flanks: Option<Interval>,

    /// Hits seen for this gene, accepted or not
    pub total_hits: usize,

    /// Accepted hits, in input order
    pub hits: Vec<AlignmentHit>,
}

impl GeneResult {
    pub fn new(gene: Gene, context: SyntenicContext) -> Self {
        Self {
            gene,
            context,
            target_gap: None,
            query_flanks: None,
            total_hits: 0,
            hits: Vec::new(),
        }
    }

    /// Serializable view of this result
    #[must_use]
    pub fn report(&self) -> GeneReport<'_> {
        GeneReport {
            name: &self.gene.name,
            contig: &self.gene.interval.contig,
            start: self.gene.interval.start,
            stop: self.gene.interval.stop,
            is_present: self.context.is_present,
            is_simple: self.context.is_simple,
            target_gap: self.target_gap,
            total_hits: self.total_hits,
            hits: &self.hits,
        }
    }
}

/// Per-gene output record
#[derive(Debug, Serialize)]
pub struct GeneReport<'a> {
    pub name: &'a str,
    pub contig: &'a str,
    pub start: u64,
    pub stop: u64,
    pub is_present: bool,
    pub is_simple: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_gap: Option<bool>,
    pub total_hits: usize,
    pub hits: &'a [AlignmentHit],
}

/// Counts of hit outcomes across a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HitSummary {
    pub total: usize,
    pub accepted: usize,
    pub no_syntenic_target: usize,
    pub too_few_neighbors: usize,
}

impl HitSummary {
    fn record(&mut self, outcome: HitOutcome) {
        self.total += 1;
        match outcome {
            HitOutcome::Accepted { .. } => self.accepted += 1,
            HitOutcome::NoSyntenicTarget => self.no_syntenic_target += 1,
            HitOutcome::TooFewNeighbors { .. } => self.too_few_neighbors += 1,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            total: self.total + other.total,
            accepted: self.accepted + other.accepted,
            no_syntenic_target: self.no_syntenic_target + other.no_syntenic_target,
            too_few_neighbors: self.too_few_neighbors + other.too_few_neighbors,
        }
    }
}

/// Results for every gene of a [`GeneSet`], in gene-set order
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    results: Vec<GeneResult>,
    name_to_index: HashMap<String, usize>,
}

impl ResultSet {
    /// Classify every gene against the synteny index.
    ///
    /// Genes are independent of one another and are classified in parallel.
    #[must_use]
    pub fn classify(genes: &GeneSet, syn: &SyntenyIndex, classifier: &ContextClassifier) -> Self {
        let results: Vec<GeneResult> = genes
            .as_slice()
            .par_iter()
            .map(|gene| GeneResult::new(gene.clone(), classifier.classify(&gene.interval, syn)))
            .collect();

        let name_to_index = results
            .iter()
            .enumerate()
            .map(|(i, result)| (result.gene.name.clone(), i))
            .collect();

        let set = Self {
            results,
            name_to_index,
        };
        info!(
            "Classified {} genes: {} present, {} simple",
            set.len(),
            set.count_present(),
            set.count_simple()
        );
        set
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneResult> {
        self.results.iter()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GeneResult> {
        self.name_to_index.get(name).map(|&i| &self.results[i])
    }

    #[must_use]
    pub fn count_present(&self) -> usize {
        self.results.iter().filter(|r| r.context.is_present).count()
    }

    #[must_use]
    pub fn count_simple(&self) -> usize {
        self.results.iter().filter(|r| r.context.is_simple).count()
    }

    /// Flag absent genes whose flanking target region contains an assembly gap
    pub fn annotate_gaps(&mut self, mask: &GapMask, syn: &SyntenyIndex) {
        self.results.par_iter_mut().for_each(|result| {
            result.target_gap = flanking_target_region(&result.context, syn)
                .map(|region| mask.covers_any(&region));
        });

        let gapped = self
            .results
            .iter()
            .filter(|r| r.target_gap == Some(true))
            .count();
        debug!("{gapped} absent genes have an assembly gap between their target flanks");
    }

    /// Validate alignment hits and attach the accepted ones to their genes.
    ///
    /// Hits are grouped by gene first, so a hit naming an unknown gene aborts
    /// the run before any result is modified. `source` names the hit table in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::DanglingHitReference`] if a hit names a gene
    /// absent from the gene set.
    pub fn merge_hits(
        &mut self,
        source: &str,
        hits: Vec<AlignmentHit>,
        validator: &HitValidator,
        syn: &SyntenyIndex,
    ) -> Result<HitSummary, PipelineError> {
        let mut grouped: Vec<Vec<AlignmentHit>> = vec![Vec::new(); self.results.len()];
        for hit in hits {
            let Some(&index) = self.name_to_index.get(hit.gene()) else {
                return Err(PipelineError::DanglingHitReference {
                    file: source.to_string(),
                    line: hit.line(),
                    gene: hit.gene().to_string(),
                    target: hit.target().to_string(),
                });
            };
            grouped[index].push(hit);
        }

        let summary = self
            .results
            .par_iter_mut()
            .zip(grouped)
            .map(|(result, hits)| {
                let mut summary = HitSummary::default();
                for hit in hits {
                    summary.record(validator.validate(result, hit, syn));
                }
                summary
            })
            .reduce(HitSummary::default, HitSummary::merge);

        info!(
            "Validated {} alignment hits: {} accepted, {} on unsyntenic contigs, {} with too few neighbors",
            summary.total, summary.accepted, summary.no_syntenic_target, summary.too_few_neighbors
        );
        Ok(summary)
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a GeneResult;
    type IntoIter = std::slice::Iter<'a, GeneResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Target span between the partners of an absent gene's flanking blocks.
///
/// Only defined when both flanks exist and map to the same target contig.
fn flanking_target_region(context: &SyntenicContext, syn: &SyntenyIndex) -> Option<Interval> {
    if context.is_present {
        return None;
    }
    let lower = syn.target_interval(context.lower?);
    let upper = syn.target_interval(context.upper?);
    if lower.contig != upper.contig {
        return None;
    }
    Interval::bounding(&lower.contig, [lower, upper])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::hits::HitValidatorConfig;
    use crate::core::hit::HitRegion;
    use crate::core::types::{Strand, SyntenyRecord};

    fn syn() -> SyntenyIndex {
        let rows = [
            (("q1", 100, 200), ("t1", 1100, 1200)),
            (("q1", 300, 400), ("t1", 1300, 1400)),
            (("q1", 800, 900), ("t1", 1800, 1900)),
            (("q1", 1000, 1100), ("t1", 2000, 2100)),
        ];
        SyntenyIndex::from_records(
            rows.iter()
                .map(|&(q, t)| SyntenyRecord {
                    query_contig: q.0.to_string(),
                    query_start: q.1,
                    query_stop: q.2,
                    target_contig: t.0.to_string(),
                    target_start: t.1,
                    target_stop: t.2,
                    identity: 1.0,
                    strand: Strand::Forward,
                })
                .collect(),
        )
    }

    fn genes() -> GeneSet {
        GeneSet::new(vec![
            Gene::new("absent", "q1", 500, 600),
            Gene::new("present", "q1", 150, 250),
            Gene::new("elsewhere", "q5", 1, 100),
        ])
        .unwrap()
    }

    fn hit(line: usize, gene: &str, target: Interval) -> AlignmentHit {
        AlignmentHit::Basic(HitRegion {
            gene: gene.to_string(),
            query: Interval::new("q1", 500, 600),
            target,
            score: 0.9,
            line,
        })
    }

    #[test]
    fn test_classify_all_genes() {
        let syn = syn();
        let results = ResultSet::classify(&genes(), &syn, &ContextClassifier::default());

        assert_eq!(results.len(), 3);
        assert!(results.get("present").unwrap().context.is_present);
        assert!(!results.get("absent").unwrap().context.is_present);
        assert!(results.get("absent").unwrap().context.is_simple);
        assert_eq!(
            results.get("elsewhere").unwrap().context,
            SyntenicContext::default()
        );
        assert_eq!(results.count_present(), 1);

        let names: Vec<&str> = results.iter().map(|r| r.gene.name.as_str()).collect();
        assert_eq!(names, vec!["present", "absent", "elsewhere"]);
    }

    #[test]
    fn test_annotate_gaps() {
        let syn = syn();
        let mut results = ResultSet::classify(&genes(), &syn, &ContextClassifier::default());

        results.annotate_gaps(&GapMask::new(vec![Interval::new("t1", 1500, 1549)]), &syn);
        assert_eq!(results.get("absent").unwrap().target_gap, Some(true));
        assert_eq!(results.get("present").unwrap().target_gap, None);
        assert_eq!(results.get("elsewhere").unwrap().target_gap, None);

        results.annotate_gaps(&GapMask::new(vec![Interval::new("t1", 5000, 5100)]), &syn);
        assert_eq!(results.get("absent").unwrap().target_gap, Some(false));
    }

    #[test]
    fn test_merge_hits() {
        let syn = syn();
        let mut results = ResultSet::classify(&genes(), &syn, &ContextClassifier::default());
        let validator = HitValidator::new(HitValidatorConfig {
            flank_width: 1000,
            quiet: true,
            ..Default::default()
        });

        let summary = results
            .merge_hits(
                "hits.tsv",
                vec![
                    hit(1, "absent", Interval::new("t1", 1500, 1600)),
                    hit(2, "absent", Interval::new("t9", 1, 50)),
                    hit(3, "elsewhere", Interval::new("t1", 1500, 1600)),
                ],
                &validator,
                &syn,
            )
            .unwrap();

        assert_eq!(
            summary,
            HitSummary {
                total: 3,
                accepted: 1,
                no_syntenic_target: 1,
                too_few_neighbors: 1,
            }
        );
        let absent = results.get("absent").unwrap();
        assert_eq!(absent.total_hits, 2);
        assert_eq!(absent.hits.len(), 1);
        assert_eq!(results.get("elsewhere").unwrap().total_hits, 1);
        assert_eq!(results.get("present").unwrap().total_hits, 0);
    }

    #[test]
    fn test_dangling_hit_is_fatal() {
        let syn = syn();
        let mut results = ResultSet::classify(&genes(), &syn, &ContextClassifier::default());

        let err = results
            .merge_hits(
                "hits.tsv",
                vec![
                    hit(2, "absent", Interval::new("t1", 1500, 1600)),
                    hit(5, "ghost", Interval::new("t1", 1500, 1600)),
                ],
                &HitValidator::default(),
                &syn,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::DanglingHitReference { ref gene, line: 5, .. } if gene == "ghost"
        ));
        assert!(err.to_string().starts_with("hits.tsv:5: "));
        assert_eq!(results.get("absent").unwrap().total_hits, 0);
    }

    #[test]
    fn test_report_serialization() {
        let syn = syn();
        let results = ResultSet::classify(&genes(), &syn, &ContextClassifier::default());
        let json = serde_json::to_value(results.get("present").unwrap().report()).unwrap();

        assert_eq!(json["name"], "present");
        assert_eq!(json["is_present"], true);
        assert_eq!(json["total_hits"], 0);
        assert!(json.get("target_gap").is_none());
        assert!(json["hits"].as_array().unwrap().is_empty());
    }
}
