//! Anonymous profiles of (truncated) utilities.
mod format;

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use orders::ProfileWithTies;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Alternative,
    error::{Error, Result},
    utility::{Utility, identity_cmap},
};

/// An anonymous profile of utilities over a shared domain.
///
/// Every distinct utility is stored once, together with the number of voters
/// who submitted it. All utilities of a profile use the domain and cmap of the
/// profile, whatever domain they had before being added.
///
/// ```
/// use std::collections::BTreeMap;
/// use utility_profiles::{ProfileOptions, UtilityProfile};
///
/// let profile = UtilityProfile::with_options(
///     vec![
///         BTreeMap::from([(0, 1.0), (1, 3.0), (2, 1.0)]),
///         BTreeMap::from([(0, 0.0), (1, -1.0), (2, 4.0)]),
///     ],
///     ProfileOptions::new().counts(vec![2, 1]),
/// )
/// .unwrap();
/// assert_eq!(profile.num_voters(), 3);
/// assert_eq!(profile.util_sum(&1), Some(5.0));
/// assert_eq!(profile.util_max(&2), Some(4.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "ProfileData<A>",
    into = "ProfileData<A>",
    bound(
        serialize = "A: Alternative + Serialize",
        deserialize = "A: Alternative + Deserialize<'de>"
    )
)]
pub struct UtilityProfile<A> {
    domain: Arc<[A]>,
    cmap: Arc<BTreeMap<A, String>>,
    utilities: Vec<Utility<A>>,
    ucounts: Vec<usize>,
}

/// Optional settings when creating a [`UtilityProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileOptions<A> {
    /// `ucounts[i]` is the number of voters who submitted utility `i`. Every
    /// utility is submitted by one voter if not given.
    pub ucounts: Option<Vec<usize>>,
    /// The alternatives of the profile. Defaults to every alternative assigned
    /// a utility by some voter.
    pub domain: Option<Vec<A>>,
    /// Names used when displaying alternatives. Defaults to every alternative
    /// displayed as itself.
    pub cmap: Option<BTreeMap<A, String>>,
}

impl<A> Default for ProfileOptions<A> {
    fn default() -> Self {
        ProfileOptions { ucounts: None, domain: None, cmap: None }
    }
}

impl<A> ProfileOptions<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(mut self, ucounts: Vec<usize>) -> Self {
        self.ucounts = Some(ucounts);
        self
    }

    pub fn domain(mut self, domain: Vec<A>) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn cmap(mut self, cmap: BTreeMap<A, String>) -> Self {
        self.cmap = Some(cmap);
        self
    }
}

/// Serialized form of a [`UtilityProfile`].
#[derive(Serialize, Deserialize)]
#[serde(bound(deserialize = "A: Ord + Deserialize<'de>"))]
struct ProfileData<A> {
    utilities: Vec<BTreeMap<A, f64>>,
    ucounts: Option<Vec<usize>>,
    domain: Option<Vec<A>>,
    cmap: Option<BTreeMap<A, String>>,
}

impl<A: Alternative> From<UtilityProfile<A>> for ProfileData<A> {
    fn from(profile: UtilityProfile<A>) -> Self {
        ProfileData {
            utilities: profile.utilities.into_iter().map(|u| u.utils().clone()).collect(),
            ucounts: Some(profile.ucounts),
            domain: Some(profile.domain.to_vec()),
            cmap: Some(profile.cmap.as_ref().clone()),
        }
    }
}

impl<A: Alternative> TryFrom<ProfileData<A>> for UtilityProfile<A> {
    type Error = Error;

    fn try_from(data: ProfileData<A>) -> Result<Self> {
        let options =
            ProfileOptions { ucounts: data.ucounts, domain: data.domain, cmap: data.cmap };
        UtilityProfile::with_options(data.utilities, options)
    }
}

impl<A: Alternative> UtilityProfile<A> {
    /// Create a profile where every utility is submitted by one voter. The
    /// domain is every alternative assigned a utility by some voter.
    pub fn new<I, U>(utilities: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<Utility<A>>,
    {
        let utilities: Vec<Utility<A>> = utilities.into_iter().map(Into::into).collect();
        let ucounts = vec![1; utilities.len()];
        let domain = union_domain(&utilities);
        let cmap = identity_cmap(&domain);
        UtilityProfile::from_parts(utilities, ucounts, domain.into(), Arc::new(cmap))
    }

    /// Create a profile using `options`, see [`ProfileOptions`].
    ///
    /// A given domain is sorted. Fails if the number of counts is not the
    /// number of utilities, if a count is zero, or if some utility assigns a
    /// utility to an alternative outside the domain.
    pub fn with_options<I, U>(utilities: I, options: ProfileOptions<A>) -> Result<Self>
    where
        I: IntoIterator<Item = U>,
        U: Into<Utility<A>>,
    {
        let utilities: Vec<Utility<A>> = utilities.into_iter().map(Into::into).collect();
        let ucounts = match options.ucounts {
            Some(ucounts) if ucounts.len() != utilities.len() => {
                return Err(Error::CountMismatch {
                    utilities: utilities.len(),
                    counts: ucounts.len(),
                });
            }
            Some(ucounts) => ucounts,
            None => vec![1; utilities.len()],
        };
        if let Some(index) = ucounts.iter().position(|c| *c == 0) {
            return Err(Error::ZeroCount { index });
        }
        let domain = match options.domain {
            Some(mut domain) => {
                domain.sort();
                domain.dedup();
                domain
            }
            None => union_domain(&utilities),
        };
        for u in &utilities {
            if let Some(x) = u.utils().keys().find(|x| domain.binary_search(x).is_err()) {
                return Err(Error::NotInDomain(x.to_string()));
            }
        }
        let cmap = options.cmap.unwrap_or_else(|| identity_cmap(&domain));
        Ok(UtilityProfile::from_parts(utilities, ucounts, domain.into(), Arc::new(cmap)))
    }

    /// Every utility must only assign utilities to alternatives in `domain`.
    fn from_parts(
        utilities: Vec<Utility<A>>,
        ucounts: Vec<usize>,
        domain: Arc<[A]>,
        cmap: Arc<BTreeMap<A, String>>,
    ) -> Self {
        debug_assert!(utilities.len() == ucounts.len());
        let utilities: Vec<Utility<A>> = utilities
            .into_iter()
            .map(|u| u.rebase(Arc::clone(&domain), Arc::clone(&cmap)))
            .collect();
        let profile = UtilityProfile { domain, cmap, utilities, ucounts };
        debug!(
            voters = profile.num_voters(),
            alternatives = profile.num_alternatives(),
            distinct = profile.utilities.len(),
            "created utility profile"
        );
        profile
    }

    pub fn domain(&self) -> &[A] {
        &self.domain
    }

    pub fn cmap(&self) -> &BTreeMap<A, String> {
        &self.cmap
    }

    /// The name used when displaying `x`.
    pub fn name(&self, x: &A) -> String {
        self.cmap.get(x).cloned().unwrap_or_else(|| x.to_string())
    }

    pub fn num_alternatives(&self) -> usize {
        self.domain.len()
    }

    pub fn num_voters(&self) -> usize {
        self.ucounts.iter().sum()
    }

    pub fn ucounts(&self) -> &[usize] {
        &self.ucounts
    }

    /// Every distinct utility together with the number of voters who
    /// submitted it.
    pub fn utilities_counts(&self) -> impl Iterator<Item = (&Utility<A>, usize)> + '_ {
        self.utilities.iter().zip(self.ucounts.iter().copied())
    }

    /// The utility of every voter, so a utility submitted by `n` voters will
    /// occur `n` times in a row.
    pub fn utilities(&self) -> Vec<&Utility<A>> {
        self.utilities_counts().flat_map(|(u, c)| std::iter::repeat(u).take(c)).collect()
    }

    /// Returns true if `x` is assigned a utility by at least one voter.
    pub fn has_utility(&self, x: &A) -> bool {
        self.utilities.iter().any(|u| u.has_utility(x))
    }

    // Utility of `x` and count of every distinct utility assigning `x` a utility.
    fn assigned<'a>(&'a self, x: &'a A) -> impl Iterator<Item = (f64, usize)> + 'a {
        self.utilities_counts().filter_map(move |(u, c)| Some((*u.utils().get(x)?, c)))
    }

    /// The sum of the utilities of `x` over every voter. `None` if no voter
    /// assigns `x` a utility.
    pub fn util_sum(&self, x: &A) -> Option<f64> {
        if !self.has_utility(x) {
            return None;
        }
        Some(self.assigned(x).map(|(u, c)| u * c as f64).sum())
    }

    /// The average utility of `x` over the voters who assign `x` a utility.
    /// `None` if no voter assigns `x` a utility.
    pub fn util_avg(&self, x: &A) -> Option<f64> {
        let (sum, voters) = self
            .assigned(x)
            .fold((0.0, 0), |(sum, voters), (u, c)| (sum + u * c as f64, voters + c));
        if voters == 0 { None } else { Some(sum / voters as f64) }
    }

    /// The largest utility of `x`. `None` if no voter assigns `x` a utility.
    pub fn util_max(&self, x: &A) -> Option<f64> {
        self.assigned(x).map(|(u, _)| u).reduce(f64::max)
    }

    /// The smallest utility of `x`. `None` if no voter assigns `x` a utility.
    pub fn util_min(&self, x: &A) -> Option<f64> {
        self.assigned(x).map(|(u, _)| u).reduce(f64::min)
    }

    /// The utility function assigning every alternative the sum of its
    /// utilities. Alternatives no voter assigns a utility stay unassigned.
    pub fn sum_utility_function(&self) -> Utility<A> {
        self.aggregate(|x| self.util_sum(x))
    }

    /// The utility function assigning every alternative the sum of its
    /// utilities divided by the number of alternatives in the domain.
    pub fn avg_utility_function(&self) -> Utility<A> {
        let alternatives = self.num_alternatives() as f64;
        self.aggregate(|x| Some(self.util_sum(x)? / alternatives))
    }

    fn aggregate<F>(&self, f: F) -> Utility<A>
    where
        F: Fn(&A) -> Option<f64>,
    {
        let utils = self.domain.iter().filter_map(|x| Some((x.clone(), f(x)?))).collect();
        Utility::new(utils).rebase(Arc::clone(&self.domain), Arc::clone(&self.cmap))
    }

    /// Return the profile where every utility is normalized, see
    /// [`Utility::normalize`].
    #[must_use]
    pub fn normalize(&self) -> Self {
        UtilityProfile {
            domain: Arc::clone(&self.domain),
            cmap: Arc::clone(&self.cmap),
            utilities: self.utilities.iter().map(Utility::normalize).collect(),
            ucounts: self.ucounts.clone(),
        }
    }

    /// The profile of rankings generated by the utilities, see
    /// [`Utility::ranking`].
    pub fn to_ranking_profile(&self) -> Result<ProfileWithTies<A>> {
        let rankings = self.utilities.iter().map(Utility::ranking).collect();
        ProfileWithTies::new(
            rankings,
            self.ucounts.clone(),
            self.domain.to_vec(),
            self.cmap.as_ref().clone(),
        )
        .map_err(Error::RankingProfile)
    }
}

fn union_domain<A: Alternative>(utilities: &[Utility<A>]) -> Vec<A> {
    let domain: BTreeSet<&A> = utilities.iter().flat_map(|u| u.utils().keys()).collect();
    domain.into_iter().cloned().collect()
}
