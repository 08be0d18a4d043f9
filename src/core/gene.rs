use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::interval::Interval;

/// Errors from assembling a [`GeneSet`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneSetError {
    /// `position` is the 0-based input index of the second gene with `name`
    #[error("Duplicate gene name '{name}' at input position {position}")]
    DuplicateName { name: String, position: usize },
}

/// A gene model from the query genome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    /// Unique gene identifier
    pub name: String,

    /// Location of the gene on the query genome
    pub interval: Interval,
}

impl Gene {
    pub fn new(name: impl Into<String>, contig: impl Into<String>, start: u64, stop: u64) -> Self {
        Self {
            name: name.into(),
            interval: Interval::new(contig, start, stop),
        }
    }
}

/// The uniquely named genes of one genome, ordered by position
#[derive(Debug, Clone, Default)]
pub struct GeneSet {
    genes: Vec<Gene>,
    name_to_index: HashMap<String, usize>,
}

impl GeneSet {
    /// Build a gene set ordered by (contig, start, stop, name).
    ///
    /// # Errors
    ///
    /// Returns `GeneSetError::DuplicateName` for the first gene, in input
    /// order, whose name was already taken.
    pub fn new(mut genes: Vec<Gene>) -> Result<Self, GeneSetError> {
        let mut names = HashSet::with_capacity(genes.len());
        for (position, gene) in genes.iter().enumerate() {
            if !names.insert(gene.name.as_str()) {
                return Err(GeneSetError::DuplicateName {
                    name: gene.name.clone(),
                    position,
                });
            }
        }

        genes.sort_by(|a, b| {
            (&a.interval.contig, a.interval.start, a.interval.stop, &a.name).cmp(&(
                &b.interval.contig,
                b.interval.start,
                b.interval.stop,
                &b.name,
            ))
        });

        let name_to_index = genes
            .iter()
            .enumerate()
            .map(|(index, gene)| (gene.name.clone(), index))
            .collect();

        Ok(Self {
            genes,
            name_to_index,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Gene> {
        self.genes.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Gene] {
        &self.genes
    }

    /// Position of the named gene in the ordered set
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Gene> {
        self.index_of(name).map(|i| &self.genes[i])
    }
}
