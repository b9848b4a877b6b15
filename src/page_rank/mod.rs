mod traits;
pub use self::traits::*;
pub mod transition;
pub use self::transition::{transition_model, TransitionModel};
pub mod iterated;
pub mod sampled;

use crate::{error, max_deviation, LinkGraph};
use rand::Rng;
use std::time::Duration;

/// Parameters of both estimators.
#[derive(Debug, Clone)]
pub struct Config {
    pub damping: f64,
    pub samples: usize,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub time_budget: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        let sampled = sampled::Config::default();
        let iterated = iterated::Config::default();
        Self {
            damping: iterated.damping,
            samples: sampled.samples,
            tolerance: iterated.tolerance,
            max_iterations: iterated.max_iterations,
            time_budget: iterated.time_budget,
        }
    }
}

impl Config {
    pub fn sampled(&self) -> sampled::Config {
        sampled::Config {
            damping: self.damping,
            samples: self.samples,
        }
    }

    pub fn iterated(&self) -> iterated::Config {
        iterated::Config {
            damping: self.damping,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            time_budget: self.time_budget,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Estimates {
    pub sampled: sampled::Result,
    pub iterated: iterated::Result,
}

impl Estimates {
    /// Largest per-page disagreement between the two estimators.
    pub fn max_deviation(&self) -> f64 {
        max_deviation(self.sampled.importance(), self.iterated.importance())
    }
}

/// Runs the sampler and the solver over the same graph.
///
/// Both are constructed, and so validated, before either one starts.
pub fn estimate<R: Rng>(graph: &LinkGraph, config: &Config, rng: R) -> error::Result<Estimates> {
    let mut sampler = sampled::SampledPageRank::new(graph, &config.sampled(), rng)?;
    let mut solver = iterated::IteratedPageRank::new(graph, &config.iterated())?;
    let sampled = sampler.calc()?;
    let iterated = solver.calc()?;
    Ok(Estimates { sampled, iterated })
}
