//! Random utility profiles.
//!
//! [`Uniform`] and [`Normal`] draw every utility independently, while
//! [`Gaussian`] places voters and alternatives in a space where closer
//! alternatives have higher utility.
mod gaussian;

pub use gaussian::Gaussian;
use rand::{Rng, distr::Distribution};

use crate::{
    ProfileOptions, Utility, UtilityProfile,
    error::{Error, Result},
};

/// A way to sample utility functions over the alternatives `0..n`.
pub trait UtilityGenerator {
    /// Sample a utility function assigning every alternative in
    /// `0..num_alternatives` a utility.
    fn sample<R: Rng>(&self, rng: &mut R, num_alternatives: usize) -> Result<Utility<usize>>;

    /// Sample a profile of `num_voters` utility functions over the
    /// alternatives `0..num_alternatives`.
    fn sample_profile<R: Rng>(
        &self,
        rng: &mut R,
        num_alternatives: usize,
        num_voters: usize,
    ) -> Result<UtilityProfile<usize>> {
        let utilities = (0..num_voters)
            .map(|_| self.sample(rng, num_alternatives))
            .collect::<Result<Vec<_>>>()?;
        let options = ProfileOptions::new().domain((0..num_alternatives).collect());
        UtilityProfile::with_options(utilities, options)
    }
}

/// Every utility is sampled uniformly from `min..max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    pub min: f64,
    pub max: f64,
}

impl Default for Uniform {
    fn default() -> Self {
        Uniform { min: 0.0, max: 1.0 }
    }
}

impl UtilityGenerator for Uniform {
    fn sample<R: Rng>(&self, rng: &mut R, num_alternatives: usize) -> Result<Utility<usize>> {
        let dist = rand::distr::Uniform::new(self.min, self.max)
            .map_err(|e| Error::Distribution(e.to_string()))?;
        Ok((0..num_alternatives).map(|x| (x, dist.sample(rng))).collect())
    }
}

/// Every utility is sampled from a normal distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    pub mean: f64,
    pub std_dev: f64,
}

impl Default for Normal {
    fn default() -> Self {
        Normal { mean: 0.0, std_dev: 1.0 }
    }
}

impl UtilityGenerator for Normal {
    fn sample<R: Rng>(&self, rng: &mut R, num_alternatives: usize) -> Result<Utility<usize>> {
        let dist = normal(self.mean, self.std_dev)?;
        Ok((0..num_alternatives).map(|x| (x, dist.sample(rng))).collect())
    }
}

/// A normal distribution, failing unless `std_dev` is finite and
/// non-negative. `rand_distr` only rejects a non-finite `std_dev`.
pub(crate) fn normal(mean: f64, std_dev: f64) -> Result<rand_distr::Normal<f64>> {
    if !(std_dev.is_finite() && std_dev >= 0.0) {
        return Err(Error::Distribution(format!(
            "standard deviation must be finite and non-negative, got {}",
            std_dev
        )));
    }
    rand_distr::Normal::new(mean, std_dev).map_err(|e| Error::Distribution(e.to_string()))
}
