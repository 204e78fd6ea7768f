//! Run orchestration: the generation loop, progress reporting and
//! termination handling.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::Parameters;
use crate::errors::SimulationError;
use crate::genotype::SimulationResult;
use crate::simulation::{Simulation, Termination};

/// Drives a `Simulation` through `generations + 1` steps, or fewer when a
/// population cap or the cancellation flag trips.
pub struct Runner {
    simulation: Simulation,
    generations: usize,
    disable_progress_bar: bool,
    cancellation: Option<Arc<AtomicBool>>,
}

impl Runner {
    pub fn new(parameters: Parameters) -> Result<Runner, SimulationError> {
        let generations = parameters.generations;
        let simulation = Simulation::new(parameters)?;
        Ok(Self {
            simulation,
            generations,
            disable_progress_bar: false,
            cancellation: None,
        })
    }

    /// Suppress the progress bar for headless or embedded use.
    pub fn disable_progress_bar(&mut self) {
        self.disable_progress_bar = true;
    }

    /// Install a cancellation flag. It is checked once per generation
    /// boundary; a cancelled run returns the partial result through the
    /// last completed generation.
    pub fn set_cancellation(&mut self, flag: Arc<AtomicBool>) {
        self.cancellation = Some(flag);
    }

    fn cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub fn run(mut self) -> SimulationResult {
        let bar = match self.disable_progress_bar {
            true => None,
            false => {
                let bar = ProgressBar::new(self.generations as u64 + 1);
                bar.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "[{bar:40}] {pos:>7}/{len:7} [{elapsed_precise} / {duration_precise}] {msg}",
                    )
                    .expect("Unable to create template.")
                    .progress_chars("=> "),
            );
                Some(bar)
            }
        };

        let parameters = self.simulation.get_parameters();
        log::info!(
            "Starting simulation: growth coefficients neutral={} beneficial={}",
            parameters.neutral_growth(),
            parameters.beneficial_growth()
        );

        let mut termination = Termination::Completed;
        for generation in 0..=self.generations {
            if self.cancelled() {
                log::info!("Cancellation requested at generation {generation}.");
                termination = Termination::Cancelled;
                break;
            }

            self.simulation.next_generation();

            let n_neutral = self.simulation.get_neutral().len();
            let n_beneficial = self.simulation.get_beneficial().len();
            log::info!(
                r###"
        generation={generation}
        neutral={n_neutral}
        beneficial={n_beneficial}"###
            );

            if let Some(bar) = bar.as_ref() {
                bar.set_position(generation as u64 + 1);
                bar.set_message(format!("[{n_neutral}, {n_beneficial}]"));
            }

            if let Some(cap) = self.simulation.check_caps() {
                log::info!("Population cap reached at generation {generation}.");
                termination = cap;
                break;
            }
        }

        if let Some(bar) = bar {
            bar.finish_with_message("Done.");
        }
        log::info!("Finished simulation.");

        SimulationResult::from_simulation(&self.simulation, termination)
    }
}

/// Run a complete simulation for `parameters` without progress output and
/// return the materialized result.
pub fn run(parameters: &Parameters) -> Result<SimulationResult, SimulationError> {
    let mut runner = Runner::new(parameters.clone())?;
    runner.disable_progress_bar();
    Ok(runner.run())
}
