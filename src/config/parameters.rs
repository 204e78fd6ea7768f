use serde::{Deserialize, Serialize};
use std::fs;

use crate::errors::SimulationError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Parameters {
    /// The replication rate represents the expected number of offspring per
    /// individual at each generation.
    pub replication_rate: f64,

    /// The fitness (1 + s) of the beneficial class. The effective death rate
    /// of beneficial lineages is divided by this factor.
    pub fitness: f64,

    /// The death rate represents the expected number of removals per
    /// individual at each generation.
    pub death_rate: f64,

    /// The probability that a mutation event is beneficial.
    pub prob_beneficial: f64,

    /// The mutation rate represents the expected number of mutations per
    /// individual at each generation.
    pub mutation_rate: f64,

    /// The number of sites in the reference genome.
    pub genome_size: usize,

    /// The number of lineages seeded into the neutral pool at generation
    /// zero.
    pub init_size: usize,

    /// The number of generations to simulate. The generation loop performs
    /// `generations + 1` steps unless a cap trips first.
    pub generations: usize,

    /// The maximum total population size; exceeding it ends the run.
    pub max_population: usize,

    /// The maximum beneficial pool size; exceeding it ends the run.
    pub max_beneficial: usize,

    /// The seed of the run's pseudorandom stream.
    pub seed: u64,

    /// How duplicate index draws are treated during beneficial conversion.
    #[serde(default)]
    pub conversion_policy: ConversionPolicy,
}

/// Duplicate handling for the beneficial-conversion index draws.
///
/// Conversion indices are drawn with replacement, so the same neutral
/// lineage can be drawn more than once within a single generation. Either
/// way a lineage moves to the beneficial pool at most once.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionPolicy {
    /// Duplicate draws are ignored; each drawn lineage receives exactly one
    /// beneficial mutation.
    #[default]
    Distinct,
    /// Every draw applies one beneficial mutation; a lineage drawn twice
    /// accumulates two.
    PerDraw,
}

#[derive(Debug)]
pub enum ParametersError {
    IoError(std::io::Error),
    YamlError(serde_yaml::Error),
}

impl std::error::Error for ParametersError {}

impl std::fmt::Display for ParametersError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParametersError::IoError(error) => write!(formatter, "IO error: {}", error),
            ParametersError::YamlError(error) => write!(formatter, "YAML error: {}", error),
        }
    }
}

impl std::fmt::Display for Parameters {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut output = vec![];
        self.write(&mut output).map_err(|_| std::fmt::Error)?;
        write!(formatter, "{}", String::from_utf8(output).unwrap())
    }
}

impl Parameters {
    /// Check every parameter against its admissible range.
    ///
    /// Rejects any setup that cannot be run at all; rate combinations that
    /// merely drive the population extinct are left alone.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.genome_size == 0 {
            return Err(SimulationError::InvalidParameter(
                "genome_size must be positive".to_string(),
            ));
        }
        if !self.replication_rate.is_finite() || self.replication_rate < 0. {
            return Err(SimulationError::InvalidParameter(format!(
                "replication_rate must be finite and non-negative, got {}",
                self.replication_rate
            )));
        }
        if !self.death_rate.is_finite() || self.death_rate < 0. {
            return Err(SimulationError::InvalidParameter(format!(
                "death_rate must be finite and non-negative, got {}",
                self.death_rate
            )));
        }
        if !self.mutation_rate.is_finite() || self.mutation_rate < 0. {
            return Err(SimulationError::InvalidParameter(format!(
                "mutation_rate must be finite and non-negative, got {}",
                self.mutation_rate
            )));
        }
        if !(0. ..=1.).contains(&self.prob_beneficial) {
            return Err(SimulationError::InvalidParameter(format!(
                "prob_beneficial must lie in [0, 1], got {}",
                self.prob_beneficial
            )));
        }
        if !self.fitness.is_finite() || self.fitness <= 0. {
            return Err(SimulationError::InvalidParameter(format!(
                "fitness must be finite and positive, got {}",
                self.fitness
            )));
        }
        Ok(())
    }

    /// Per-generation growth coefficient of the neutral pool.
    pub fn neutral_growth(&self) -> f64 {
        self.replication_rate - self.death_rate
    }

    /// Per-generation growth coefficient of the beneficial pool; the death
    /// rate is reduced by the fitness factor.
    pub fn beneficial_growth(&self) -> f64 {
        self.replication_rate - self.death_rate / self.fitness
    }

    pub fn write(&self, writer: &mut dyn std::io::Write) -> Result<(), ParametersError> {
        serde_yaml::to_writer(writer, self).map_err(ParametersError::YamlError)
    }

    pub fn read(reader: &mut dyn std::io::Read) -> Result<Parameters, ParametersError> {
        serde_yaml::from_reader(reader).map_err(ParametersError::YamlError)
    }

    pub fn write_to_file(&self, filename: &str) -> Result<(), ParametersError> {
        let file = fs::File::create(filename).map_err(ParametersError::IoError)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write(&mut writer)
    }

    pub fn read_from_file(filename: &str) -> Result<Parameters, ParametersError> {
        let file = fs::File::open(filename).map_err(ParametersError::IoError)?;
        let mut reader = std::io::BufReader::new(file);
        Self::read(&mut reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn parameters() -> Parameters {
        Parameters {
            replication_rate: 2.02,
            fitness: 1.1,
            death_rate: 1.,
            prob_beneficial: 0.01,
            mutation_rate: 0.03,
            genome_size: 1000,
            init_size: 110,
            generations: 250,
            max_population: 100_000,
            max_beneficial: 100_000,
            seed: 42,
            conversion_policy: ConversionPolicy::Distinct,
        }
    }

    #[test]
    fn read_write() {
        let mut buffer = Vec::new();
        let settings = parameters();
        settings.write(&mut buffer).unwrap();
        let read_settings = Parameters::read(&mut buffer.as_slice()).unwrap();
        assert_eq!(read_settings, settings);
    }

    #[test]
    #[serial]
    fn read_write_file() {
        let tmp_path = std::env::temp_dir().join("test_sweepsim_parameters.yaml");
        let path = tmp_path.to_str().unwrap();
        let settings = parameters();
        settings.write_to_file(path).unwrap();
        let read_settings = Parameters::read_from_file(path).unwrap();
        assert_eq!(read_settings, settings);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn conversion_policy_defaults_to_distinct() {
        let yaml = "\
replication_rate: 2.0
fitness: 1.1
death_rate: 1.0
prob_beneficial: 0.01
mutation_rate: 0.03
genome_size: 100
init_size: 10
generations: 5
max_population: 10000
max_beneficial: 10000
seed: 7
";
        let settings = Parameters::read(&mut yaml.as_bytes()).unwrap();
        assert_eq!(settings.conversion_policy, ConversionPolicy::Distinct);
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(parameters().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_genome() {
        let mut settings = parameters();
        settings.genome_size = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_rates() {
        for field in ["replication_rate", "death_rate", "mutation_rate"] {
            let mut settings = parameters();
            match field {
                "replication_rate" => settings.replication_rate = -0.1,
                "death_rate" => settings.death_rate = -0.1,
                _ => settings.mutation_rate = -0.1,
            }
            assert!(settings.validate().is_err(), "{} accepted", field);
        }
    }

    #[test]
    fn validate_rejects_probability_outside_unit_interval() {
        let mut settings = parameters();
        settings.prob_beneficial = 1.5;
        assert!(settings.validate().is_err());
        settings.prob_beneficial = -0.5;
        assert!(settings.validate().is_err());
        settings.prob_beneficial = f64::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_fitness() {
        let mut settings = parameters();
        settings.fitness = 0.;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn growth_coefficients() {
        let settings = parameters();
        assert!((settings.neutral_growth() - 1.02).abs() < 1e-12);
        assert!((settings.beneficial_growth() - (2.02 - 1. / 1.1)).abs() < 1e-12);
    }
}
