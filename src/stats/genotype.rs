use crate::genotype::SimulationResult;

/// Trait extension to compute mutant-allele frequencies over a
/// materialized genotype matrix.
pub trait LocusFrequencies {
    fn locus_frequency(&self, locus: usize) -> f64;
    fn locus_frequencies(&self, loci: &[usize]) -> Vec<f64>;
}

impl LocusFrequencies for SimulationResult {
    /// Fraction of rows whose base at `locus` differs from the reference.
    fn locus_frequency(&self, locus: usize) -> f64 {
        let rows = self.genotypes.nrows();
        if rows == 0 {
            return 0.;
        }
        let reference_base = self.reference[locus];
        let mutated = self
            .genotypes
            .column(locus)
            .iter()
            .filter(|&&base| base != reference_base)
            .count();
        mutated as f64 / rows as f64
    }

    /// Frequencies at each locus of `loci`, in the given order.
    fn locus_frequencies(&self, loci: &[usize]) -> Vec<f64> {
        loci.iter().map(|&locus| self.locus_frequency(locus)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Termination;
    use ndarray::array;

    fn result() -> SimulationResult {
        SimulationResult {
            genotypes: array![[1, 2, 3], [1, 4, 3], [1, 4, 4]],
            reference: vec![1, 2, 3],
            positive_loci: vec![1],
            neutral_loci: vec![2],
            n_neutral: 2,
            n_beneficial: 1,
            generations_run: 1,
            termination: Termination::Completed,
        }
    }

    #[test]
    fn frequency_counts_rows_differing_from_the_reference() {
        let result = result();
        assert_eq!(result.locus_frequency(0), 0.);
        assert!((result.locus_frequency(1) - 2. / 3.).abs() < 1e-12);
        assert!((result.locus_frequency(2) - 1. / 3.).abs() < 1e-12);
    }

    #[test]
    fn frequencies_follow_the_requested_order() {
        let result = result();
        let frequencies = result.locus_frequencies(&[2, 0]);
        assert!((frequencies[0] - 1. / 3.).abs() < 1e-12);
        assert_eq!(frequencies[1], 0.);
    }

    #[test]
    fn empty_matrix_has_zero_frequencies() {
        let mut result = result();
        result.genotypes = ndarray::Array2::zeros((0, 3));
        assert_eq!(result.locus_frequency(0), 0.);
    }
}
