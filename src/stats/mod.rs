//! Summary statistics over finished runs.

mod genotype;

pub use genotype::LocusFrequencies;
