//! # orphan-scan
//!
//! A library for finding lineage-specific ("orphan") genes by comparing a query
//! genome to a target genome through whole-genome synteny blocks.
//!
//! A gene with no homolog in the target genome may be a true orphan, or it may
//! simply sit in a region the target assembly lost, rearranged or never
//! sequenced. `orphan-scan` separates these cases by looking at the gene's
//! syntenic neighborhood.
//!
//! ## Features
//!
//! - **Presence**: whether any synteny block overlaps the gene
//! - **Simplicity**: whether the gene's neighborhood maps collinearly onto one
//!   target contig, with no foreign blocks inserted
//! - **Hit validation**: keeps a candidate homology hit only when enough of the
//!   gene's flanking blocks map near it on the target
//! - **Gap annotation**: flags absent genes whose target region contains
//!   unsequenced N-runs
//!
//! ## Example
//!
//! ```rust
//! use orphan_scan::{ContextClassifier, Interval, SyntenyIndex};
//! use orphan_scan::core::types::{Strand, SyntenyRecord};
//!
//! let block = |qs, qe, ts, te| SyntenyRecord {
//!     query_contig: "chr1".to_string(),
//!     query_start: qs,
//!     query_stop: qe,
//!     target_contig: "scaffold_7".to_string(),
//!     target_start: ts,
//!     target_stop: te,
//!     identity: 0.97,
//!     strand: Strand::Forward,
//! };
//! let syn = SyntenyIndex::from_records(vec![block(10, 20, 110, 120), block(50, 60, 150, 160)]);
//!
//! let context = ContextClassifier::default().classify(&Interval::new("chr1", 30, 40), &syn);
//! assert!(!context.is_present);
//! assert!(context.is_simple);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Intervals, genes, synteny records and alignment hits
//! - [`index`]: The ordered interval index, the two-sided synteny index and the gap mask
//! - [`classify`]: Context classification, hit validation and per-gene results
//! - [`parsing`]: Parsers for GFF, synteny, hit and N-run tables
//! - [`cli`]: Command-line interface implementation

pub mod classify;
pub mod cli;
pub mod core;
pub mod index;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use classify::context::{ClassifierConfig, ContextClassifier, SyntenicContext};
pub use classify::hits::{HitOutcome, HitValidator, HitValidatorConfig};
pub use classify::results::{GeneResult, PipelineError, ResultSet};
pub use core::gene::{Gene, GeneSet};
pub use core::hit::AlignmentHit;
pub use core::interval::Interval;
pub use index::{GapMask, OrderedIntervalIndex, SyntenyIndex};
pub use parsing::ParseError;
