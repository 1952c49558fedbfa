//! This is a crate used to study cardinal preferences: utility functions of
//! voters over a finite set of alternatives, and anonymous profiles of them.
//!
//! **This crate is currently work in progress, and is not suitable for any
//! purpose, at any time, anywhere**
//!
//! Example usage:
//! ```
//! use std::collections::BTreeMap;
//! use utility_profiles::{ProfileOptions, UtilityProfile};
//!
//! let profile = UtilityProfile::with_options(
//!     vec![
//!         BTreeMap::from([("x", 1.0), ("y", 3.0), ("z", 1.0)]),
//!         BTreeMap::from([("x", 0.0), ("y", -1.0), ("z", 4.0)]),
//!         BTreeMap::from([("x", 0.5), ("y", -1.0)]),
//!     ],
//!     ProfileOptions::new().counts(vec![2, 3, 1]),
//! )
//! .unwrap();
//!
//! assert_eq!(profile.num_voters(), 6);
//! assert_eq!(profile.util_max(&"z"), Some(4.0));
//!
//! let rankings = profile.to_ranking_profile().unwrap();
//! assert!(rankings.majority_prefers(&"z", &"y"));
//! ```
#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

use std::fmt;

pub mod display;
pub mod error;
pub mod generators;
pub mod profile;
pub mod utility;

pub use display::DisplayOptions;
pub use error::{Error, Result};
pub use orders;
pub use profile::{ProfileOptions, UtilityProfile};
pub use utility::Utility;

/// An alternative voters can have preferences over, e.g. `usize` or
/// `String`.
pub trait Alternative: Clone + Ord + fmt::Display + fmt::Debug {}

impl<T: Clone + Ord + fmt::Display + fmt::Debug> Alternative for T {}

#[cfg(test)]
mod tests {
    use quickcheck::{Arbitrary, Gen};
    use rand::{SeedableRng, rngs::StdRng};

    // `Gen` contains a rng, but it's a private member so this method is used to get
    // a standard rng generated from `Gen`
    pub fn std_rng(g: &mut Gen) -> StdRng {
        let mut seed = [0u8; 32];
        for i in 0..32 {
            seed[i] = Arbitrary::arbitrary(g);
        }
        StdRng::from_seed(seed)
    }
}
