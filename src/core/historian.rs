//! Historian --- run-global record of every mutation event.
//!
//! The historian keeps two append-only logs of genome positions, one per
//! mutation class, across the whole run. They are global history, not
//! per-lineage state: a position appears once per event, even when a later
//! event overwrites the same position in some lineage's map.

use itertools::Itertools;
use std::collections::HashSet;

#[derive(Clone, Debug, Default)]
pub struct Historian {
    neutral_log: Vec<usize>,
    beneficial_log: Vec<usize>,
}

impl Historian {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_neutral(&mut self, position: usize) {
        self.neutral_log.push(position);
    }

    pub fn record_beneficial(&mut self, position: usize) {
        self.beneficial_log.push(position);
    }

    /// Every position ever hit by a beneficial mutation, in recording
    /// order; positions hit more than once appear more than once.
    pub fn positive_loci(&self) -> &[usize] {
        &self.beneficial_log
    }

    /// Every recorded neutral position that was never hit by a beneficial
    /// mutation, in recording order.
    pub fn neutral_loci(&self) -> Vec<usize> {
        let positive: HashSet<usize> = self.beneficial_log.iter().copied().collect();
        self.neutral_log
            .iter()
            .copied()
            .filter(|position| !positive.contains(position))
            .collect()
    }

    /// `positive_loci` deduplicated to first occurrences.
    pub fn unique_positive_loci(&self) -> Vec<usize> {
        self.beneficial_log.iter().copied().unique().collect()
    }

    /// `neutral_loci` deduplicated to first occurrences.
    pub fn unique_neutral_loci(&self) -> Vec<usize> {
        self.neutral_loci().into_iter().unique().collect()
    }
}
