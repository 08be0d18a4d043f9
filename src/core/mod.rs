//! Core data types for synteny-based gene classification.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Interval`](interval::Interval): an inclusive `(contig, start, stop)` range
//! - [`Gene`](gene::Gene), [`GeneSet`](gene::GeneSet): uniquely named query genes
//! - [`SyntenyRecord`](types::SyntenyRecord), [`BlockId`](types::BlockId),
//!   [`Strand`](types::Strand): synteny block inputs and identifiers
//! - [`AlignmentHit`](hit::AlignmentHit): a candidate homology hit, basic or spliced
//!
//! ## Coordinates
//!
//! Coordinates are integers with both ends inclusive, so `10-20` and `20-30`
//! overlap. Overlap is only ever true between intervals on the same contig.

pub mod gene;
pub mod hit;
pub mod interval;
pub mod types;
