//! A spatial model of utilities, where every alternative is a point in some
//! space, and voters prefer nearby alternatives.
use std::slice::ChunksExact;

use rand_distr::Distribution;

use super::normal;
use crate::{
    ProfileOptions, Utility, UtilityProfile,
    error::{Error, Result},
};

/// Voters are sampled from a normal distribution around a mean, and the
/// utility of an alternative is minus its distance to the voter.
pub struct Gaussian {
    dimensions: usize,
    alternatives: Vec<f64>,
    std_dev: f64,
    voters: usize,
}

impl Gaussian {
    pub fn new(dimensions: usize, std_dev: f64, voters: usize) -> Self {
        Gaussian { dimensions, alternatives: Vec::new(), std_dev, voters }
    }

    /// The number of alternatives added so far.
    pub fn alternatives(&self) -> usize {
        if self.dimensions == 0 { 0 } else { self.alternatives.len() / self.dimensions }
    }

    /// Add an alternative at the point `alternative`. It will be the
    /// alternative with the next number, starting from `0`.
    pub fn add_alternative(&mut self, alternative: &[f64]) -> Result<()> {
        if alternative.len() != self.dimensions {
            return Err(Error::Distribution(format!(
                "alternative has {} dimensions, expected {}",
                alternative.len(),
                self.dimensions
            )));
        }
        self.alternatives.extend(alternative);
        Ok(())
    }

    pub fn iter_alternatives(&self) -> ChunksExact<'_, f64> {
        self.alternatives.chunks_exact(self.dimensions.max(1))
    }

    /// Sample a profile of voters centered around `mean`.
    pub fn sample<R: rand::Rng>(&self, rng: &mut R, mean: &[f64]) -> Result<UtilityProfile<usize>> {
        if mean.len() != self.dimensions {
            return Err(Error::Distribution(format!(
                "mean has {} dimensions, expected {}",
                mean.len(),
                self.dimensions
            )));
        }
        let normals = mean
            .iter()
            .map(|m| normal(*m, self.std_dev))
            .collect::<Result<Vec<_>>>()?;
        let mut utilities = Vec::with_capacity(self.voters);
        for _ in 0..self.voters {
            let point: Vec<f64> = normals.iter().map(|n| n.sample(rng)).collect();
            let utility: Utility<usize> = self
                .iter_alternatives()
                .enumerate()
                .map(|(x, a)| (x, -euclidean_dist(&point, a)))
                .collect();
            utilities.push(utility);
        }
        let options = ProfileOptions::new().domain((0..self.alternatives()).collect());
        UtilityProfile::with_options(utilities, options)
    }
}

fn euclidean_dist(a: &[f64], b: &[f64]) -> f64 {
    debug_assert!(a.len() == b.len());
    let mut sum = 0.0;
    for (&a, &b) in a.iter().zip(b) {
        sum += (a - b) * (a - b)
    }
    sum.sqrt()
}
