//! Generation stepping for the birth-death branching process.
//!
//! One generation advances both pools in a fixed order: neutral
//! replication, neutral mutation injection, conversion of neutral lineages
//! into the beneficial pool, beneficial replication, and the two
//! beneficial-pool injections. Pool sizes follow the deterministic
//! rate-to-count rule `floor(size * coefficient)`; event counts are
//! Poisson draws. All randomness comes from a single seeded stream, so a
//! run is reproducible from its parameters alone.

use rand::prelude::*;
use rand_distr::Poisson;

use crate::config::{ConversionPolicy, Parameters};
use crate::core::{Historian, Lineage, Population, Wildtype};
use crate::errors::SimulationError;

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// All requested generations executed.
    Completed,
    /// Total population exceeded `max_population`.
    PopulationCap,
    /// Beneficial pool exceeded `max_beneficial`.
    BeneficialCap,
    /// External cancellation flag was raised.
    Cancelled,
}

pub struct Simulation {
    wildtype: Wildtype,
    neutral: Population,
    beneficial: Population,
    historian: Historian,
    parameters: Parameters,
    rng: StdRng,
    generation: usize,
}

impl Simulation {
    /// Validate `parameters`, generate the reference genome and seed the
    /// initial neutral pool with `init_size` wildtype lineages.
    pub fn new(parameters: Parameters) -> Result<Self, SimulationError> {
        parameters.validate()?;
        let mut rng = StdRng::seed_from_u64(parameters.seed);
        let wildtype = Wildtype::random(&mut rng, parameters.genome_size);
        let neutral = population![Lineage::new(); parameters.init_size];
        Ok(Self {
            wildtype,
            neutral,
            beneficial: Population::new(),
            historian: Historian::new(),
            parameters,
            rng,
            generation: 0,
        })
    }

    pub fn get_wildtype(&self) -> &Wildtype {
        &self.wildtype
    }

    pub fn get_neutral(&self) -> &Population {
        &self.neutral
    }

    pub fn get_beneficial(&self) -> &Population {
        &self.beneficial
    }

    pub fn get_historian(&self) -> &Historian {
        &self.historian
    }

    pub fn get_parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Number of `next_generation` calls executed so far.
    pub fn get_generation(&self) -> usize {
        self.generation
    }

    /// Total number of lineages across both pools.
    pub fn population_size(&self) -> usize {
        self.neutral.len() + self.beneficial.len()
    }

    /// Advance both pools by one generation.
    pub fn next_generation(&mut self) {
        self.generation += 1;
        let v1_prev = self.neutral.len();

        if v1_prev > 0 {
            self.replicate_neutral(v1_prev);
            let n1 = self.neutral.len();
            self.inject_neutral_mutations(n1);
            self.convert_to_beneficial(n1);
        }

        if !self.beneficial.is_empty() {
            self.replicate_beneficial();
            let n2 = self.beneficial.len();
            self.inject_beneficial_neutral_mutations(n2);
            self.inject_beneficial_mutations(n2);
        }

        log::debug!(
            "generation={} neutral={} beneficial={}",
            self.generation,
            self.neutral.len(),
            self.beneficial.len()
        );
    }

    /// Check the population caps; `Some` means the run must stop.
    pub fn check_caps(&self) -> Option<Termination> {
        if self.population_size() > self.parameters.max_population {
            return Some(Termination::PopulationCap);
        }
        if self.beneficial.len() > self.parameters.max_beneficial {
            return Some(Termination::BeneficialCap);
        }
        None
    }

    /// Deterministic rate-to-count conversion: truncation toward zero,
    /// clamped to zero from below. A coefficient below `1 / count` drives
    /// the pool extinct; that is the intended policy, not rounding noise.
    fn offspring_count(count: usize, coefficient: f64) -> usize {
        (count as f64 * coefficient).floor().max(0.) as usize
    }

    /// Poisson event count; a non-positive mean yields zero events.
    fn event_count(&mut self, mean: f64) -> usize {
        match Poisson::new(mean) {
            Ok(distribution) => distribution.sample(&mut self.rng) as usize,
            Err(_) => 0,
        }
    }

    fn replicate_neutral(&mut self, v1_prev: usize) {
        let count = Self::offspring_count(v1_prev, self.parameters.neutral_growth());
        self.neutral = self.neutral.resample(&mut self.rng, count);
    }

    fn inject_neutral_mutations(&mut self, n1: usize) {
        let events = self.event_count(self.parameters.mutation_rate * n1 as f64);
        for _ in 0..events {
            let index = self.rng.random_range(0..n1);
            self.neutral.get_mut(index).apply_neutral_mutation(
                &mut self.rng,
                self.parameters.genome_size,
                &mut self.historian,
            );
        }
    }

    /// Convert neutral lineages drawn with replacement into the beneficial
    /// class. Each drawn lineage acquires a beneficial mutation (duplicate
    /// draws per the configured policy) and moves to the end of the
    /// beneficial pool, in pool order, exactly once.
    fn convert_to_beneficial(&mut self, n1: usize) {
        let events = self.event_count(
            self.parameters.mutation_rate * self.parameters.prob_beneficial * n1 as f64,
        );
        if events == 0 {
            return;
        }
        let mut converted = vec![false; n1];
        for _ in 0..events {
            let index = self.rng.random_range(0..n1);
            if converted[index]
                && self.parameters.conversion_policy == ConversionPolicy::Distinct
            {
                continue;
            }
            self.neutral.get_mut(index).apply_beneficial_mutation(
                &mut self.rng,
                self.parameters.genome_size,
                &mut self.historian,
            );
            converted[index] = true;
        }
        let staged = self.neutral.extract(&converted);
        self.beneficial.append(staged);
    }

    fn replicate_beneficial(&mut self) {
        let count =
            Self::offspring_count(self.beneficial.len(), self.parameters.beneficial_growth());
        self.beneficial = self.beneficial.resample(&mut self.rng, count);
    }

    fn inject_beneficial_neutral_mutations(&mut self, n2: usize) {
        let events = self.event_count(self.parameters.mutation_rate * n2 as f64);
        for _ in 0..events {
            let index = self.rng.random_range(0..n2);
            self.beneficial.get_mut(index).apply_neutral_mutation(
                &mut self.rng,
                self.parameters.genome_size,
                &mut self.historian,
            );
        }
    }

    /// Lineages already in the beneficial pool keep accumulating further
    /// beneficial mutations; their class does not change again.
    fn inject_beneficial_mutations(&mut self, n2: usize) {
        let events = self.event_count(
            self.parameters.mutation_rate * self.parameters.prob_beneficial * n2 as f64,
        );
        for _ in 0..events {
            let index = self.rng.random_range(0..n2);
            self.beneficial.get_mut(index).apply_beneficial_mutation(
                &mut self.rng,
                self.parameters.genome_size,
                &mut self.historian,
            );
        }
    }
}
