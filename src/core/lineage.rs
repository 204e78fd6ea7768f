//! Per-individual mutation bookkeeping.
//!
//! A lineage never stores its full sequence. It owns two sparse
//! position→base maps, one per mutation class, and the dense sequence is
//! only reconstructed at materialization time by overlaying the maps onto
//! the wildtype.

use rand::prelude::*;
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::core::Historian;
use crate::encoding::Nucleotide;

/// A single simulated individual carrying its own mutation history.
///
/// Cloning copies both maps, so offspring diverge independently of their
/// parent and of each other after a replication event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lineage {
    neutral: HashMap<usize, Nucleotide>,
    beneficial: HashMap<usize, Nucleotide>,
}

impl Lineage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one neutral mutation: position uniform in `[0, genome_size)`,
    /// base uniform over the whole alphabet, independent of the current
    /// value at that position. A later write at the same position
    /// overwrites the earlier one.
    pub fn apply_neutral_mutation(
        &mut self,
        rng: &mut impl Rng,
        genome_size: usize,
        historian: &mut Historian,
    ) {
        let position = rng.random_range(0..genome_size);
        let base = *Nucleotide::ALL.choose(rng).unwrap();
        historian.record_neutral(position);
        self.neutral.insert(position, base);
    }

    /// Apply one beneficial mutation: position uniform in
    /// `[0, genome_size)`, base uniform over the alphabet minus this
    /// lineage's current *neutral* assignment at that position, if any.
    ///
    /// Neither the reference base nor earlier beneficial assignments are
    /// excluded, so the draw can coincidentally restore the reference.
    pub fn apply_beneficial_mutation(
        &mut self,
        rng: &mut impl Rng,
        genome_size: usize,
        historian: &mut Historian,
    ) {
        let position = rng.random_range(0..genome_size);
        historian.record_beneficial(position);
        let mut candidates: SmallVec<[Nucleotide; 4]> = SmallVec::from_slice(&Nucleotide::ALL);
        if let Some(current) = self.neutral.get(&position) {
            candidates.retain(|base| *base != *current);
        }
        let base = *candidates.choose(rng).unwrap();
        self.beneficial.insert(position, base);
    }

    /// Write a neutral entry directly, bypassing the random draws.
    pub fn insert_neutral(&mut self, position: usize, base: Nucleotide) {
        self.neutral.insert(position, base);
    }

    /// Write a beneficial entry directly, bypassing the random draws.
    pub fn insert_beneficial(&mut self, position: usize, base: Nucleotide) {
        self.beneficial.insert(position, base);
    }

    pub fn neutral_mutations(&self) -> &HashMap<usize, Nucleotide> {
        &self.neutral
    }

    pub fn beneficial_mutations(&self) -> &HashMap<usize, Nucleotide> {
        &self.beneficial
    }

    /// Number of positions carrying an entry, counted per map.
    pub fn mutation_count(&self) -> usize {
        self.neutral.len() + self.beneficial.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[test]
    fn new_lineage_is_clean() {
        let lineage = Lineage::new();
        assert!(lineage.neutral_mutations().is_empty());
        assert!(lineage.beneficial_mutations().is_empty());
        assert_eq!(lineage.mutation_count(), 0);
    }

    #[test]
    fn clone_is_independent() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut historian = Historian::new();
        let mut parent = Lineage::new();
        parent.apply_neutral_mutation(&mut rng, 100, &mut historian);

        let offspring = parent.clone();
        parent.apply_neutral_mutation(&mut rng, 100, &mut historian);
        parent.apply_beneficial_mutation(&mut rng, 100, &mut historian);

        assert_eq!(offspring.mutation_count(), 1);
        assert!(offspring.beneficial_mutations().is_empty());
    }

    #[test]
    fn neutral_mutation_overwrites_at_same_position() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut historian = Historian::new();
        let mut lineage = Lineage::new();
        // genome of one site pins every draw to position 0
        for _ in 0..10 {
            lineage.apply_neutral_mutation(&mut rng, 1, &mut historian);
        }
        assert_eq!(lineage.neutral_mutations().len(), 1);
        // the log keeps every event even when the map overwrites
        assert_eq!(historian.neutral_loci().len(), 10);
        assert_eq!(historian.unique_neutral_loci().len(), 1);
    }

    #[test]
    fn beneficial_draw_excludes_current_neutral_base() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut historian = Historian::new();
        let mut lineage = Lineage::new();
        lineage.insert_neutral(0, Nucleotide::A);
        for _ in 0..50 {
            lineage.apply_beneficial_mutation(&mut rng, 1, &mut historian);
            let base = lineage.beneficial_mutations()[&0];
            assert_ne!(base, Nucleotide::A);
        }
    }

    #[test]
    fn beneficial_draw_uses_full_alphabet_without_neutral_entry() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut historian = Historian::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let mut lineage = Lineage::new();
            lineage.apply_beneficial_mutation(&mut rng, 1, &mut historian);
            seen.insert(lineage.beneficial_mutations()[&0]);
        }
        // 100 draws make missing one of four symbols astronomically unlikely
        assert_eq!(seen.len(), Nucleotide::SIZE);
    }
}
