//! Ordinal preferences over alternatives. A voter's preference is a
//! [`Ranking`](ranking::Ranking), an order of alternatives where some
//! alternatives may be tied and some may be left unranked. A collection of
//! rankings submitted by a group of voters is a
//! [`ProfileWithTies`](profile::ProfileWithTies).
//!
//! Alternatives can be any type with a total order, e.g. `usize` or `String`.

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

pub mod profile;
pub mod ranking;

pub use profile::ProfileWithTies;
pub use ranking::Ranking;

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
