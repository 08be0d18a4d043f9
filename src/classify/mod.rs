//! Gene classification against a synteny index.
//!
//! Classification runs in two stages:
//!
//! 1. [`ContextClassifier`] decides, per gene, whether any synteny block
//!    overlaps it (`is_present`) and whether its neighborhood maps collinearly
//!    onto one target contig (`is_simple`).
//! 2. [`HitValidator`] accepts an alignment hit for a gene only when enough of
//!    the gene's flanking blocks map near the hit on the target genome.
//!
//! [`ResultSet`] drives both stages over a whole [`GeneSet`](crate::core::gene::GeneSet).

pub mod context;
pub mod hits;
pub mod results;

pub use context::{ClassifierConfig, ContextClassifier, SyntenicContext};
pub use hits::{HitOutcome, HitValidator, HitValidatorConfig};
pub use results::{GeneReport, GeneResult, HitSummary, PipelineError, ResultSet};
