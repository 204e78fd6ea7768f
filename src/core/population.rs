//! Population module
//!
//! One ordered pool of lineages. The simulation keeps two of these pools,
//! neutral and beneficial, and moves a lineage between them at most once.
//! The pool owns every lineage outright: replication clones, and each
//! clone must be able to diverge without touching its siblings.

use rand::prelude::*;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::ops::Index;

use crate::core::Lineage;

#[macro_export]
macro_rules! population {
    () => {
        $crate::core::Population::new()
    };
    ($lineage:expr; $size:expr) => {
        $crate::core::Population::from_lineage(&$lineage, $size)
    };
    ($( $lineage:expr ),+) => {
        {
            let mut population = $crate::core::Population::new();
            $(
                population.push($lineage);
            )+
            population
        }
    };
}

/// One ordered pool of lineages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Population {
    lineages: Vec<Lineage>,
}

impl Index<usize> for Population {
    type Output = Lineage;

    fn index(&self, index: usize) -> &Self::Output {
        &self.lineages[index]
    }
}

impl FromIterator<Lineage> for Population {
    fn from_iter<I: IntoIterator<Item = Lineage>>(iter: I) -> Self {
        Self {
            lineages: iter.into_iter().collect(),
        }
    }
}

impl Population {
    /// Construct a new, empty `Population`.
    pub fn new() -> Self {
        Self {
            lineages: Vec::new(),
        }
    }

    /// Construct a `Population` of `size` independent copies of `lineage`.
    pub fn from_lineage(lineage: &Lineage, size: usize) -> Self {
        Self {
            lineages: vec![lineage.clone(); size],
        }
    }

    pub fn len(&self) -> usize {
        self.lineages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lineages.is_empty()
    }

    pub fn push(&mut self, lineage: Lineage) {
        self.lineages.push(lineage);
    }

    /// Append `lineages` to the end of the pool, preserving their order.
    pub fn append(&mut self, lineages: Vec<Lineage>) {
        self.lineages.extend(lineages);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lineage> {
        self.lineages.iter()
    }

    pub fn as_slice(&self) -> &[Lineage] {
        &self.lineages
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Lineage {
        &mut self.lineages[index]
    }

    /// Resample `count` lineages uniformly with replacement, cloning every
    /// draw.
    ///
    /// Replacement sampling models simultaneous birth and death: the net
    /// change is carried entirely by `count`, not by an explicit
    /// birth/death split.
    pub fn resample(&self, rng: &mut impl Rng, count: usize) -> Self {
        if count == 0 || self.lineages.is_empty() {
            return Self::new();
        }
        let draws: Vec<usize> = (0..count)
            .map(|_| rng.random_range(0..self.lineages.len()))
            .collect();
        self.clone_draws(&draws)
    }

    #[cfg(feature = "parallel")]
    fn clone_draws(&self, draws: &[usize]) -> Self {
        Self {
            lineages: draws
                .par_iter()
                .map(|&index| self.lineages[index].clone())
                .collect(),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn clone_draws(&self, draws: &[usize]) -> Self {
        Self {
            lineages: draws
                .iter()
                .map(|&index| self.lineages[index].clone())
                .collect(),
        }
    }

    /// Move every lineage whose mask entry is set out of the pool,
    /// preserving pool order on both sides.
    pub fn extract(&mut self, mask: &[bool]) -> Vec<Lineage> {
        debug_assert_eq!(mask.len(), self.lineages.len());
        let mut extracted = Vec::new();
        let mut kept = Vec::with_capacity(self.lineages.len());
        for (index, lineage) in std::mem::take(&mut self.lineages).into_iter().enumerate() {
            if mask[index] {
                extracted.push(lineage);
            } else {
                kept.push(lineage);
            }
        }
        self.lineages = kept;
        extracted
    }
}
