//! Ancestral reference genome.
//!
//! The `Wildtype` is the fixed starting sequence of a run. It is generated
//! once, never mutated afterwards, and shared read-only by every lineage;
//! lineages only store their differences from it.

use rand::prelude::*;

use crate::encoding::Nucleotide;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wildtype {
    sequence: Vec<Nucleotide>,
}

impl Wildtype {
    /// Draw a reference of `length` symbols, i.i.d. uniform over the
    /// alphabet.
    pub fn random(rng: &mut impl Rng, length: usize) -> Self {
        let sequence = (0..length)
            .map(|_| *Nucleotide::ALL.choose(rng).unwrap())
            .collect();
        Self { sequence }
    }

    pub fn from_sequence(sequence: Vec<Nucleotide>) -> Self {
        Self { sequence }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn get_base(&self, position: &usize) -> Nucleotide {
        self.sequence[*position]
    }

    pub fn sequence(&self) -> &[Nucleotide] {
        &self.sequence
    }

    /// Dense row of integer base codes; the starting point of every
    /// materialized genotype row.
    pub fn encoded(&self) -> Vec<u8> {
        self.sequence.iter().map(|symbol| symbol.encode()).collect()
    }
}
