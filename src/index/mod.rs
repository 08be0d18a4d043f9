//! Interval indexes over synteny blocks and assembly gaps.
//!
//! - [`OrderedIntervalIndex`]: per-contig sorted, doubly linked intervals with a
//!   logarithmic anchor search
//! - [`SyntenyIndex`]: query-ordered and target-ordered indexes over the same blocks
//! - [`GapMask`]: N-run intervals of the target assembly
//!
//! Every index stores its intervals in a single arena and links chain neighbors
//! and block partners by integer id.

pub mod gaps;
pub mod ordered;
pub mod synteny;

pub use gaps::GapMask;
pub use ordered::{NodeId, OrderedIntervalIndex};
pub use synteny::SyntenyIndex;
