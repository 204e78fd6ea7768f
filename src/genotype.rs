//! Sparse-to-dense genotype reconstruction.
//!
//! Lineages only store their differences from the wildtype; downstream
//! consumers want one dense row per individual. The materializer overlays
//! each lineage's neutral map and then its beneficial map onto the encoded
//! reference, so a position carrying both shows the beneficial base.

use ndarray::Array2;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use itertools::Itertools;

use crate::core::{Lineage, Population, Wildtype};
use crate::simulation::{Simulation, Termination};

fn materialize_row(reference: &[u8], lineage: &Lineage) -> Vec<u8> {
    let mut row = reference.to_vec();
    for (&position, base) in lineage.neutral_mutations() {
        row[position] = base.encode();
    }
    // beneficial overlay comes last and supersedes the neutral history
    for (&position, base) in lineage.beneficial_mutations() {
        row[position] = base.encode();
    }
    row
}

#[cfg(feature = "parallel")]
fn materialize_rows(reference: &[u8], neutral: &Population, beneficial: &Population) -> Vec<u8> {
    let mut flat: Vec<u8> = neutral
        .as_slice()
        .par_iter()
        .flat_map_iter(|lineage| materialize_row(reference, lineage))
        .collect();
    flat.par_extend(
        beneficial
            .as_slice()
            .par_iter()
            .flat_map_iter(|lineage| materialize_row(reference, lineage)),
    );
    flat
}

#[cfg(not(feature = "parallel"))]
fn materialize_rows(reference: &[u8], neutral: &Population, beneficial: &Population) -> Vec<u8> {
    neutral
        .iter()
        .chain(beneficial.iter())
        .flat_map(|lineage| materialize_row(reference, lineage))
        .collect()
}

/// Reconstruct the dense genotype matrix of the terminal pools: one row
/// per lineage with the neutral pool first, `genome_size` columns of
/// integer base codes. An empty population yields a matrix of zero rows.
pub fn materialize(
    wildtype: &Wildtype,
    neutral: &Population,
    beneficial: &Population,
) -> Array2<u8> {
    let reference = wildtype.encoded();
    let rows = neutral.len() + beneficial.len();
    let flat = materialize_rows(&reference, neutral, beneficial);
    Array2::from_shape_vec((rows, wildtype.len()), flat)
        .expect("materialized rows match the genome size")
}

/// Everything a downstream consumer reads from a finished run.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Dense genotype matrix: rows are final lineages (neutral pool first,
    /// then beneficial), columns are genome positions, entries are integer
    /// base codes.
    pub genotypes: Array2<u8>,
    /// Encoded reference sequence.
    pub reference: Vec<u8>,
    /// Positions ever hit by a beneficial mutation, in recording order,
    /// duplicates preserved.
    pub positive_loci: Vec<usize>,
    /// Recorded neutral positions never hit by a beneficial mutation.
    pub neutral_loci: Vec<usize>,
    /// Final size of the neutral pool.
    pub n_neutral: usize,
    /// Final size of the beneficial pool.
    pub n_beneficial: usize,
    /// Number of generation steps actually executed.
    pub generations_run: usize,
    /// Why the run stopped.
    pub termination: Termination,
}

impl SimulationResult {
    /// Materialize the terminal state of `simulation`.
    pub fn from_simulation(simulation: &Simulation, termination: Termination) -> Self {
        let genotypes = materialize(
            simulation.get_wildtype(),
            simulation.get_neutral(),
            simulation.get_beneficial(),
        );
        let historian = simulation.get_historian();
        Self {
            genotypes,
            reference: simulation.get_wildtype().encoded(),
            positive_loci: historian.positive_loci().to_vec(),
            neutral_loci: historian.neutral_loci(),
            n_neutral: simulation.get_neutral().len(),
            n_beneficial: simulation.get_beneficial().len(),
            generations_run: simulation.get_generation(),
            termination,
        }
    }

    /// `positive_loci` deduplicated to first occurrences, for consumers
    /// that index matrix columns.
    pub fn unique_positive_loci(&self) -> Vec<usize> {
        self.positive_loci.iter().copied().unique().collect()
    }

    /// `neutral_loci` deduplicated to first occurrences.
    pub fn unique_neutral_loci(&self) -> Vec<usize> {
        self.neutral_loci.iter().copied().unique().collect()
    }
}
