//! Cardinal utility functions of a single voter.
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{self, Display},
    sync::Arc,
};

use orders::Ranking;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    Alternative,
    error::{Error, Result},
};

/// A utility function, a map from some alternatives of a domain to the real
/// numbers. Alternatives of the domain which are not assigned a utility make
/// the utility function *truncated*.
///
/// Every key of the map is in the domain. The domain and the names used to
/// display alternatives (`cmap`) are shared, so cloning a utility or holding
/// many of them in a [`UtilityProfile`](crate::UtilityProfile) is cheap.
///
/// A `Utility` is never modified, methods like [`Utility::normalize`] return a
/// new utility.
///
/// ```
/// use std::collections::BTreeMap;
/// use utility_profiles::Utility;
///
/// let u = Utility::new(BTreeMap::from([("x", 1.0), ("y", 3.0), ("z", 1.0)]));
/// assert!(u.strict_pref(&"y", &"x"));
/// assert!(u.indiff(&"x", &"z"));
/// assert_eq!(u.ranking().to_string(), "y,{x,z}");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "UtilityData<A>",
    into = "UtilityData<A>",
    bound(
        serialize = "A: Alternative + Serialize",
        deserialize = "A: Alternative + Deserialize<'de>"
    )
)]
pub struct Utility<A> {
    utils: BTreeMap<A, f64>,
    domain: Arc<[A]>,
    cmap: Arc<BTreeMap<A, String>>,
}

/// Serialized form of a [`Utility`], validated when deserialized.
#[derive(Serialize, Deserialize)]
#[serde(bound(deserialize = "A: Ord + Deserialize<'de>"))]
struct UtilityData<A> {
    utils: BTreeMap<A, f64>,
    domain: Option<Vec<A>>,
    cmap: Option<BTreeMap<A, String>>,
}

impl<A: Alternative> From<Utility<A>> for UtilityData<A> {
    fn from(u: Utility<A>) -> Self {
        UtilityData {
            domain: Some(u.domain.to_vec()),
            cmap: Some(u.cmap.as_ref().clone()),
            utils: u.utils,
        }
    }
}

impl<A: Alternative> TryFrom<UtilityData<A>> for Utility<A> {
    type Error = Error;

    fn try_from(data: UtilityData<A>) -> Result<Self> {
        match data.domain {
            Some(domain) => Utility::with_domain(data.utils, domain, data.cmap),
            None => {
                let mut u = Utility::new(data.utils);
                if let Some(cmap) = data.cmap {
                    u.cmap = Arc::new(cmap);
                }
                Ok(u)
            }
        }
    }
}

/// Map every alternative to its own string representation.
pub(crate) fn identity_cmap<A: Alternative>(domain: &[A]) -> BTreeMap<A, String> {
    domain.iter().map(|x| (x.clone(), x.to_string())).collect()
}

impl<A: Alternative> Utility<A> {
    /// Create a utility function whose domain is the alternatives in `utils`.
    pub fn new(utils: BTreeMap<A, f64>) -> Self {
        let domain: Arc<[A]> = utils.keys().cloned().collect();
        let cmap = Arc::new(identity_cmap(&domain));
        Utility { utils, domain, cmap }
    }

    /// Create a utility function over `domain`. If `cmap` is `None` every
    /// alternative is displayed as itself. Repeated alternatives of `domain`
    /// are only kept the first time they occur.
    ///
    /// Returns [`Error::NotInDomain`] if an alternative of `utils` is not in
    /// `domain`.
    pub fn with_domain(
        utils: BTreeMap<A, f64>,
        mut domain: Vec<A>,
        cmap: Option<BTreeMap<A, String>>,
    ) -> Result<Self> {
        let mut seen = BTreeSet::new();
        domain.retain(|x| seen.insert(x.clone()));
        let cmap = cmap.unwrap_or_else(|| identity_cmap(&domain));
        Utility::from_parts(utils, domain.into(), Arc::new(cmap))
    }

    /// Like [`Utility::with_domain`], but shares an existing domain and cmap.
    /// The domain must not repeat alternatives.
    fn from_parts(
        utils: BTreeMap<A, f64>,
        domain: Arc<[A]>,
        cmap: Arc<BTreeMap<A, String>>,
    ) -> Result<Self> {
        if let Some(x) = utils.keys().find(|x| !domain.contains(x)) {
            return Err(Error::NotInDomain(x.to_string()));
        }
        Ok(Utility { utils, domain, cmap })
    }

    /// A utility with new values over the same domain. The keys of `utils`
    /// must be a subset of the keys of `self.utils`.
    fn with_utils(&self, utils: BTreeMap<A, f64>) -> Self {
        debug_assert!(utils.keys().all(|x| self.utils.contains_key(x)));
        Utility { utils, domain: Arc::clone(&self.domain), cmap: Arc::clone(&self.cmap) }
    }

    pub fn domain(&self) -> &[A] {
        &self.domain
    }

    /// Move the utility onto another domain and cmap. Every assigned
    /// alternative must be in `domain`.
    pub(crate) fn rebase(self, domain: Arc<[A]>, cmap: Arc<BTreeMap<A, String>>) -> Self {
        debug_assert!(self.utils.keys().all(|x| domain.contains(x)));
        Utility { utils: self.utils, domain, cmap }
    }

    pub fn cmap(&self) -> &BTreeMap<A, String> {
        &self.cmap
    }

    pub fn utils(&self) -> &BTreeMap<A, f64> {
        &self.utils
    }

    /// The name used when displaying `x`.
    pub fn name(&self, x: &A) -> String {
        self.cmap.get(x).cloned().unwrap_or_else(|| x.to_string())
    }

    /// Iterate over every alternative that is assigned a utility, together
    /// with its utility.
    pub fn assigned(&self) -> impl Iterator<Item = (&A, f64)> + '_ {
        self.utils.iter().map(|(x, u)| (x, *u))
    }

    /// The number of alternatives assigned a utility.
    pub fn len(&self) -> usize {
        self.utils.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utils.is_empty()
    }

    /// Returns the utility of `x`, or `None` if `x` is not assigned a
    /// utility.
    ///
    /// Returns [`Error::NotInDomain`] if `x` is not in the domain.
    pub fn val(&self, x: &A) -> Result<Option<f64>> {
        if !self.domain.contains(x) {
            return Err(Error::NotInDomain(x.to_string()));
        }
        Ok(self.utils.get(x).copied())
    }

    /// Returns true if `x` is assigned a utility.
    pub fn has_utility(&self, x: &A) -> bool {
        self.utils.contains_key(x)
    }

    /// Return every alternative assigned exactly the utility `u`.
    pub fn items_with_util(&self, u: f64) -> Vec<&A> {
        self.utils.iter().filter(|(_, v)| **v == u).map(|(x, _)| x).collect()
    }

    pub fn max_util(&self) -> Option<f64> {
        self.utils.values().copied().reduce(f64::max)
    }

    pub fn min_util(&self) -> Option<f64> {
        self.utils.values().copied().reduce(f64::min)
    }

    /// Returns true if both `x` and `y` are assigned utilities and the
    /// utility of `x` is strictly greater than the utility of `y`.
    pub fn strict_pref(&self, x: &A, y: &A) -> bool {
        match (self.utils.get(x), self.utils.get(y)) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }

    /// Returns true if both `x` and `y` are assigned the same utility.
    pub fn indiff(&self, x: &A, y: &A) -> bool {
        match (self.utils.get(x), self.utils.get(y)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn weak_pref(&self, x: &A, y: &A) -> bool {
        self.strict_pref(x, y) || self.indiff(x, y)
    }

    /// Return the utility without the alternative `x`, which is removed from
    /// the domain as well.
    #[must_use]
    pub fn remove_cand(&self, x: &A) -> Self {
        let utils = self.utils.iter().filter(|(y, _)| *y != x).map(|(y, u)| (y.clone(), *u));
        let domain: Arc<[A]> = self.domain.iter().filter(|y| *y != x).cloned().collect();
        let cmap = self.cmap.iter().filter(|(y, _)| *y != x).map(|(y, n)| (y.clone(), n.clone()));
        Utility { utils: utils.collect(), domain, cmap: Arc::new(cmap.collect()) }
    }

    /// The ranking generated by the utility: alternatives with higher utility
    /// are ranked higher and alternatives with the same utility are tied.
    /// Alternatives without a utility are not ranked.
    pub fn ranking(&self) -> Ranking<A> {
        let mut list: Vec<(&A, f64)> = self.assigned().collect();
        list.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        let mut ranks = BTreeMap::new();
        let mut rank = 0;
        let mut current: Option<f64> = None;
        for (x, u) in list {
            if current != Some(u) {
                current = Some(u);
                rank += 1;
            }
            ranks.insert(x.clone(), rank);
        }
        trace!(alternatives = ranks.len(), classes = rank, "derived ranking from utility");
        Ranking::new(ranks)
    }

    /// Returns true if at least two alternatives have the same utility.
    pub fn has_tie(&self) -> bool {
        self.ranking().has_ties()
    }

    /// Returns true if the utility is a linear order of `num_cands`
    /// alternatives.
    pub fn is_linear(&self, num_cands: usize) -> bool {
        self.ranking().is_linear(num_cands)
    }

    /// Returns true if every alternative of `r` is assigned a utility and the
    /// utility orders them exactly like `r` does.
    pub fn represents_ranking(&self, r: &Ranking<A>) -> bool {
        let cands = r.cands();
        if cands.iter().any(|x| !self.has_utility(x)) {
            return false;
        }
        cands.iter().all(|x| {
            cands.iter().all(|y| {
                (!r.strict_pref(x, y) || self.strict_pref(x, y))
                    && (!r.indiff(x, y) || self.indiff(x, y))
            })
        })
    }

    /// Return the utility where every assigned alternative `x` gets the
    /// utility `func(x)`.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use utility_profiles::Utility;
    ///
    /// let u = Utility::new(BTreeMap::from([(1, 0.0), (2, 0.0)]));
    /// let v = u.transformation(|x| *x as f64 * 10.0);
    /// assert_eq!(v.val(&2), Ok(Some(20.0)));
    /// ```
    #[must_use]
    pub fn transformation<F>(&self, func: F) -> Self
    where
        F: Fn(&A) -> f64,
    {
        self.with_utils(self.utils.keys().map(|x| (x.clone(), func(x))).collect())
    }

    /// Return the linear transformation `a * u(x) + b` of the utility.
    #[must_use]
    pub fn linear_transformation(&self, a: f64, b: f64) -> Self {
        self.transformation(|x| a * self.utils[x] + b)
    }

    /// Applies the Kaplan normalization: the new utility of `x` is
    /// `(u(x) - min) / (max - min)`, so the assigned utilities are in
    /// `[0, 1]`. If every assigned utility is the same, they all become `0`.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let (Some(min), Some(max)) = (self.min_util(), self.max_util()) else {
            return self.clone();
        };
        trace!(min, max, "normalizing utility");
        if max == min {
            self.transformation(|_| 0.0)
        } else {
            self.transformation(|x| (self.utils[x] - min) / (max - min))
        }
    }

    /// The expected utility given the probability distribution `prob`.
    /// Alternatives without a utility don't contribute.
    ///
    /// Returns [`Error::ProbabilityOutsideDomain`] if `prob` assigns a
    /// probability to an alternative outside the domain.
    pub fn expectation(&self, prob: &BTreeMap<A, f64>) -> Result<f64> {
        if let Some(x) = prob.keys().find(|x| !self.domain.contains(x)) {
            return Err(Error::ProbabilityOutsideDomain(x.to_string()));
        }
        Ok(self
            .domain
            .iter()
            .filter_map(|x| Some(prob.get(x)? * self.utils.get(x)?))
            .sum())
    }
}

impl<A: Alternative> From<BTreeMap<A, f64>> for Utility<A> {
    fn from(utils: BTreeMap<A, f64>) -> Self {
        Utility::new(utils)
    }
}

impl<A: Alternative> FromIterator<(A, f64)> for Utility<A> {
    fn from_iter<T: IntoIterator<Item = (A, f64)>>(iter: T) -> Self {
        Utility::new(iter.into_iter().collect())
    }
}

impl<A: Alternative> Display for Utility<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, x) in self.domain.iter().enumerate() {
            if i != 0 {
                write!(f, "; ")?;
            }
            match self.utils.get(x) {
                Some(u) => write!(f, "U({}) = {}", self.name(x), u)?,
                None => write!(f, "{} is not assigned a utility", self.name(x))?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::{Arbitrary, Gen};
    use rand::Rng;

    use super::*;
    use crate::tests::std_rng;

    impl Arbitrary for Utility<usize> {
        fn arbitrary(g: &mut Gen) -> Self {
            // Modulo to avoid problematic values
            let elements = <usize as Arbitrary>::arbitrary(g) % g.size();
            let mut rng = std_rng(g);
            // Few distinct values, so we get ties, and some alternatives are
            // left without a utility.
            let utils = (0..elements)
                .filter_map(|x| rng.random_bool(0.8).then(|| (x, rng.random_range(-5..=5) as f64)))
                .collect();
            Utility::with_domain(utils, (0..elements).collect(), None).unwrap()
        }

        fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
            let x = self.clone();
            let iter = x.domain.to_vec().into_iter().rev().map(move |c| x.remove_cand(&c));
            Box::new(iter)
        }
    }

    fn util(values: &[(usize, f64)]) -> Utility<usize> {
        Utility::new(values.iter().copied().collect())
    }

    #[quickcheck]
    fn trichotomy(u: Utility<usize>) -> bool {
        u.assigned().all(|(x, _)| {
            u.assigned().all(|(y, _)| {
                let relations = [u.strict_pref(x, y), u.strict_pref(y, x), u.indiff(x, y)];
                relations.iter().filter(|r| **r).count() == 1
            })
        })
    }

    #[quickcheck]
    fn remove_cand_unassigns(u: Utility<usize>, i: usize) -> bool {
        let x = i % (u.domain().len() + 1);
        let removed = u.remove_cand(&x);
        !removed.has_utility(&x) && !removed.domain().contains(&x) && removed.val(&x).is_err()
    }

    #[quickcheck]
    fn normalize_bounds(u: Utility<usize>) -> bool {
        let n = u.normalize();
        match (u.min_util(), u.max_util()) {
            (Some(min), Some(max)) if min == max => n.assigned().all(|(_, v)| v == 0.0),
            (Some(_), Some(_)) => {
                n.min_util() == Some(0.0)
                    && n.max_util() == Some(1.0)
                    && n.assigned().all(|(_, v)| (0.0..=1.0).contains(&v))
            }
            _ => n.is_empty(),
        }
    }

    #[quickcheck]
    fn normalize_keeps_ranking(u: Utility<usize>) -> bool {
        u.normalize().ranking() == u.ranking()
    }

    #[quickcheck]
    fn represents_own_ranking(u: Utility<usize>) -> bool {
        u.represents_ranking(&u.ranking())
    }

    #[quickcheck]
    fn ranking_ranks_assigned(u: Utility<usize>) -> bool {
        let r = u.ranking();
        r.len() == u.len() && u.domain().iter().all(|x| r.is_ranked(x) == u.has_utility(x))
    }

    #[test]
    fn ranking_with_tie() {
        let u = util(&[(0, 5.0), (1, 5.0), (2, 1.0)]);
        let r = u.ranking();
        assert_eq!(r.rank(&0), Some(1));
        assert_eq!(r.rank(&1), Some(1));
        assert_eq!(r.rank(&2), Some(2));
        assert!(u.has_tie());
        assert!(!u.is_linear(3));
    }

    #[test]
    fn ranking_linear() {
        let u = util(&[(0, 0.5), (1, -2.0), (2, 7.0)]);
        assert_eq!(u.ranking().to_string(), "2,0,1");
        assert!(!u.has_tie());
        assert!(u.is_linear(3));
        assert!(!u.is_linear(4));
    }

    #[test]
    fn ranking_skips_unassigned() {
        let u = Utility::with_domain(BTreeMap::from([(0, 1.0), (2, 3.0)]), vec![0, 1, 2], None)
            .unwrap();
        let r = u.ranking();
        assert_eq!(r.cands(), &[2, 0]);
        assert!(!r.is_ranked(&1));
        assert!(u.is_linear(2));
    }

    #[test]
    fn normalize_example() {
        let u = util(&[(0, 2.0), (1, 4.0)]).normalize();
        assert_eq!(u.utils(), &BTreeMap::from([(0, 0.0), (1, 1.0)]));
    }

    #[test]
    fn normalize_constant() {
        let u = util(&[(0, 3.0), (1, 3.0), (2, 3.0)]).normalize();
        assert_eq!(u.items_with_util(0.0), vec![&0, &1, &2]);
    }

    #[test]
    fn val_domain() {
        let u = Utility::with_domain(BTreeMap::from([("a", 1.5)]), vec!["a", "b"], None).unwrap();
        assert_eq!(u.val(&"a"), Ok(Some(1.5)));
        assert_eq!(u.val(&"b"), Ok(None));
        assert_eq!(u.val(&"c"), Err(Error::NotInDomain("c".to_string())));
        assert!(!u.has_utility(&"c"));
    }

    #[test]
    fn with_domain_repeated() {
        let u = Utility::with_domain(BTreeMap::from([(0, 1.0)]), vec![0, 2, 0, 1, 2], None)
            .unwrap();
        assert_eq!(u.domain(), &[0, 2, 1]);
        let shown = "U(0) = 1; 2 is not assigned a utility; 1 is not assigned a utility";
        assert_eq!(u.to_string(), shown);
        let json = r#"{"utils":{"0":1.0},"domain":[1,0,1],"cmap":null}"#;
        let u: Utility<usize> = serde_json::from_str(json).unwrap();
        assert_eq!(u.domain(), &[1, 0]);
    }

    #[test]
    fn with_domain_missing() {
        let res = Utility::with_domain(BTreeMap::from([(0, 1.0), (3, 2.0)]), vec![0, 1], None);
        assert_eq!(res, Err(Error::NotInDomain("3".to_string())));
    }

    #[test]
    fn unassigned_not_preferred() {
        let u = Utility::with_domain(BTreeMap::from([(0, 1.0)]), vec![0, 1], None).unwrap();
        assert!(!u.strict_pref(&0, &1));
        assert!(!u.strict_pref(&1, &0));
        assert!(!u.indiff(&1, &1));
        assert!(!u.weak_pref(&0, &1));
        assert!(u.weak_pref(&0, &0));
    }

    #[test]
    fn linear_transformation() {
        let u = util(&[(0, 1.0), (1, -1.0)]).linear_transformation(2.0, 3.0);
        assert_eq!(u.val(&0), Ok(Some(5.0)));
        assert_eq!(u.val(&1), Ok(Some(1.0)));
    }

    #[test]
    fn transformation_keeps_domain() {
        let u = Utility::with_domain(BTreeMap::from([(0, 1.0)]), vec![0, 1], None).unwrap();
        let v = u.transformation(|x| *x as f64 + 0.5);
        assert_eq!(v.domain(), &[0, 1]);
        assert_eq!(v.val(&0), Ok(Some(0.5)));
        assert_eq!(v.val(&1), Ok(None));
    }

    #[test]
    fn expectation() {
        let u = Utility::with_domain(BTreeMap::from([(0, 4.0), (1, 2.0)]), vec![0, 1, 2], None)
            .unwrap();
        let prob = BTreeMap::from([(0, 0.25), (1, 0.5), (2, 0.25)]);
        assert_eq!(u.expectation(&prob), Ok(2.0));
        let outside = BTreeMap::from([(0, 0.5), (7, 0.5)]);
        assert_eq!(u.expectation(&outside), Err(Error::ProbabilityOutsideDomain("7".to_string())));
    }

    #[test]
    fn represents_ranking() {
        let u = util(&[(0, 3.0), (1, 3.0), (2, 1.0)]);
        assert!(u.represents_ranking(&Ranking::parse_order("{0,1},2").unwrap()));
        assert!(u.represents_ranking(&Ranking::parse_order("1,2").unwrap()));
        assert!(!u.represents_ranking(&Ranking::parse_order("0,1,2").unwrap()));
        assert!(!u.represents_ranking(&Ranking::parse_order("{0,2}").unwrap()));
        assert!(!u.represents_ranking(&Ranking::parse_order("0,5").unwrap()));
    }

    #[test]
    fn display() {
        let cmap = BTreeMap::from([(0, "a".to_string()), (1, "b".to_string())]);
        let u = Utility::with_domain(BTreeMap::from([(0, 1.5)]), vec![0, 1], Some(cmap)).unwrap();
        assert_eq!(u.to_string(), "U(a) = 1.5; b is not assigned a utility");
    }

    #[test]
    fn remove_cand_cmap() {
        let cmap = BTreeMap::from([(0, "a".to_string()), (1, "b".to_string())]);
        let u = Utility::with_domain(BTreeMap::from([(0, 1.0), (1, 2.0)]), vec![0, 1], Some(cmap))
            .unwrap();
        let v = u.remove_cand(&0);
        assert_eq!(v.domain(), &[1]);
        assert_eq!(v.cmap().len(), 1);
        assert_eq!(v.to_string(), "U(b) = 2");
    }

    #[test]
    fn serde_roundtrip() {
        let u = Utility::with_domain(BTreeMap::from([(0, 1.0), (2, -0.5)]), vec![2, 0, 1], None)
            .unwrap();
        let json = serde_json::to_string(&u).unwrap();
        let back: Utility<usize> = serde_json::from_str(&json).unwrap();
        assert_eq!(u, back);
    }

    #[test]
    fn serde_rejects_outside_domain() {
        let json = r#"{"utils":{"0":1.0,"4":2.0},"domain":[0,1],"cmap":null}"#;
        assert!(serde_json::from_str::<Utility<usize>>(json).is_err());
        let json = r#"{"utils":{"0":1.0,"4":2.0}}"#;
        let u: Utility<usize> = serde_json::from_str(json).unwrap();
        assert_eq!(u.domain(), &[0, 4]);
    }
}
