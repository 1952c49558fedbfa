use std::collections::BTreeMap;

use crate::ranking::Ranking;

/// An anonymous profile of rankings with possible ties. Every ranking may be
/// truncated, i.e. not rank every candidate.
///
/// Each distinct ranking is stored once together with the number of voters
/// who submitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileWithTies<A> {
    rankings: Vec<Ranking<A>>,
    rcounts: Vec<usize>,
    candidates: Vec<A>,
    cmap: BTreeMap<A, String>,
}

impl<A: Ord + Clone> ProfileWithTies<A> {
    /// Create a new profile where `rcounts[i]` voters submitted
    /// `rankings[i]`. Every ranked alternative must be one of `candidates`.
    pub fn new(
        rankings: Vec<Ranking<A>>,
        rcounts: Vec<usize>,
        candidates: Vec<A>,
        cmap: BTreeMap<A, String>,
    ) -> Result<Self, &'static str> {
        if rankings.len() != rcounts.len() {
            return Err("Number of rankings and number of counts differ");
        }
        for rank in &rankings {
            if rank.cands().iter().any(|x| !candidates.contains(x)) {
                return Err("Ranking contains an alternative which is not a candidate");
            }
        }
        Ok(ProfileWithTies { rankings, rcounts, candidates, cmap })
    }

    pub fn candidates(&self) -> &[A] {
        &self.candidates
    }

    pub fn num_cands(&self) -> usize {
        self.candidates.len()
    }

    pub fn cmap(&self) -> &BTreeMap<A, String> {
        &self.cmap
    }

    pub fn num_voters(&self) -> usize {
        self.rcounts.iter().sum()
    }

    /// Every distinct ranking together with the number of voters who
    /// submitted it.
    pub fn rankings_counts(&self) -> impl Iterator<Item = (&Ranking<A>, usize)> + '_ {
        self.rankings.iter().zip(self.rcounts.iter().copied())
    }

    /// The ranking of every voter, so a ranking submitted by `n` voters will
    /// occur `n` times.
    pub fn rankings(&self) -> Vec<&Ranking<A>> {
        self.rankings_counts().flat_map(|(r, c)| std::iter::repeat(r).take(c)).collect()
    }

    /// The number of voters who rank `a` strictly above `b`.
    pub fn support(&self, a: &A, b: &A) -> usize {
        self.rankings_counts().filter(|(r, _)| r.strict_pref(a, b)).map(|(_, c)| c).sum()
    }

    /// The number of voters who rank `a` above `b` minus the number of voters
    /// who rank `b` above `a`.
    pub fn margin(&self, a: &A, b: &A) -> isize {
        self.support(a, b) as isize - self.support(b, a) as isize
    }

    /// Returns true if more voters rank `a` above `b` than the other way
    /// around.
    pub fn majority_prefers(&self, a: &A, b: &A) -> bool {
        self.margin(a, b) > 0
    }
}
