mod groups;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{self, Display, Write},
    str::FromStr,
};

pub use groups::GroupIterator;
use rand::{
    Rng,
    seq::{IteratorRandom, SliceRandom},
};

/// A ranking of alternatives where some alternatives may be tied. Not every
/// alternative of a domain has to be ranked.
///
/// The ranking is stored as a list `order` of the ranked alternatives, best
/// first, and a list `tied` where `tied[i]` says if `order[i]` is tied with
/// `order[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ranking<A> {
    order: Vec<A>,
    tied: Vec<bool>,
}

impl<A: Ord + Clone> Ranking<A> {
    /// Create a ranking from a map of alternatives to their rank, where rank
    /// `1` is the best. Alternatives with the same rank are tied.
    ///
    /// Ranks don't have to be consecutive, only their order matters.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use orders::ranking::Ranking;
    ///
    /// let rank = Ranking::new(BTreeMap::from([(0, 2), (1, 1), (2, 2), (3, 5)]));
    /// assert_eq!(rank.to_string(), "1,{0,2},3");
    /// assert_eq!(rank.rank(&3), Some(3));
    /// ```
    pub fn new(ranks: BTreeMap<A, usize>) -> Self {
        let mut list: Vec<(A, usize)> = ranks.into_iter().collect();
        // Stable, so tied alternatives stay sorted.
        list.sort_by(|(_, a), (_, b)| a.cmp(b));
        let tied: Vec<bool> = list.windows(2).map(|w| w[0].1 == w[1].1).collect();
        let order: Vec<A> = list.into_iter().map(|(x, _)| x).collect();
        Ranking { order, tied }
    }

    /// Create a ranking from groups of tied alternatives, best group first.
    /// Empty groups are skipped.
    ///
    /// # Panics
    ///
    /// Panics if an alternative appears more than once.
    pub fn from_groups<I, G>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = A>,
    {
        let mut order = Vec::new();
        let mut tied = Vec::new();
        for group in groups {
            let start = order.len();
            order.extend(group);
            if order.len() == start {
                continue;
            }
            if start != 0 {
                tied.push(false);
            }
            tied.extend(std::iter::repeat(true).take(order.len() - start - 1));
        }
        assert!(unique(&order));
        Ranking { order, tied }
    }

    /// Create a ranking of zero alternatives.
    pub fn new_zero() -> Self {
        Ranking { order: Vec::new(), tied: Vec::new() }
    }

    /// The alternatives that are ranked, best first.
    pub fn cands(&self) -> &[A] {
        &self.order
    }

    /// Return the number of ranked alternatives.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the groups of tied alternatives, best first.
    ///
    /// ```
    /// use orders::ranking::Ranking;
    ///
    /// let rank: Ranking<usize> = Ranking::parse_order("2,{0,1},4").unwrap();
    /// let groups: Vec<&[usize]> = rank.iter_groups().collect();
    /// assert_eq!(groups, vec![&[2][..], &[0, 1][..], &[4][..]]);
    /// ```
    pub fn iter_groups(&self) -> GroupIterator<'_, A> {
        GroupIterator { order: &self.order, tied: &self.tied }
    }

    /// Returns the rank of `x`, where `1` is the best rank. Tied alternatives
    /// share a rank and ranks are consecutive. Takes `O(n)` time.
    pub fn rank(&self, x: &A) -> Option<usize> {
        let mut group = 1;
        for (i, y) in self.order.iter().enumerate() {
            if y == x {
                return Some(group);
            }
            if i < self.tied.len() && !self.tied[i] {
                group += 1;
            }
        }
        None
    }

    /// Map every ranked alternative to its rank.
    pub fn ranks(&self) -> BTreeMap<A, usize> {
        self.iter_groups()
            .enumerate()
            .flat_map(|(i, group)| group.iter().map(move |x| (x.clone(), i + 1)))
            .collect()
    }

    pub fn is_ranked(&self, x: &A) -> bool {
        self.order.contains(x)
    }

    /// Returns true if `x` is ranked strictly above `y`. Unranked alternatives
    /// are never strictly preferred, nor strictly dispreferred.
    pub fn strict_pref(&self, x: &A, y: &A) -> bool {
        match (self.rank(x), self.rank(y)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    /// Returns true if `x` and `y` are both ranked and tied.
    pub fn indiff(&self, x: &A, y: &A) -> bool {
        match (self.rank(x), self.rank(y)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn weak_pref(&self, x: &A, y: &A) -> bool {
        self.strict_pref(x, y) || self.indiff(x, y)
    }

    /// Returns true if at least two alternatives are tied.
    pub fn has_ties(&self) -> bool {
        self.tied.iter().any(|t| *t)
    }

    /// Returns true if the ranking is a linear order of exactly `num_cands`
    /// alternatives.
    pub fn is_linear(&self, num_cands: usize) -> bool {
        !self.has_ties() && self.len() == num_cands
    }

    /// The alternatives with the best rank.
    pub fn winners(&self) -> &[A] {
        let i = self.tied.iter().take_while(|t| **t).count();
        if self.is_empty() { &[] } else { &self.order[0..=i] }
    }

    /// The alternatives with the worst rank.
    pub fn losers(&self) -> &[A] {
        let i = self.tied.iter().rev().take_while(|t| **t).count();
        if self.is_empty() { &[] } else { &self.order[(self.len() - 1 - i)..] }
    }

    /// Return a ranking where `x` is no longer ranked. The other alternatives
    /// keep their relative order.
    #[must_use]
    pub fn remove_cand(&self, x: &A) -> Self {
        let mut rank = self.clone();
        let Some(i) = rank.order.iter().position(|y| y == x) else {
            return rank;
        };
        rank.order.remove(i);
        if rank.tied.is_empty() {
            return rank;
        }
        if i == 0 {
            rank.tied.remove(0);
        } else if i == rank.tied.len() {
            rank.tied.pop();
        } else {
            // The neighbours of `x` are tied only if they were both tied with `x`.
            rank.tied[i - 1] = rank.tied[i - 1] && rank.tied[i];
            rank.tied.remove(i);
        }
        debug_assert!(rank.valid());
        rank
    }

    /// Reverses the ranking in place.
    pub fn reverse(&mut self) {
        self.order.reverse();
        self.tied.reverse();
    }

    /// Generate a random ranking of some of the alternatives in `cands`. The
    /// ranking may be truncated and may contain ties.
    pub fn random<R: Rng>(rng: &mut R, cands: &[A]) -> Self {
        if cands.is_empty() {
            return Ranking::new_zero();
        }
        let order_len = rng.random_range(0..=cands.len());
        let mut order: Vec<A> = cands.iter().cloned().choose_multiple(rng, order_len);
        order.shuffle(rng);
        let tied_len = order_len.saturating_sub(1);
        let tied = (0..tied_len).map(|_| rng.random_bool(0.5)).collect();
        let rank = Ranking { order, tied };
        debug_assert!(rank.valid());
        rank
    }

    fn valid(&self) -> bool {
        (self.tied.len() + 1 == self.order.len() || self.order.is_empty() && self.tied.is_empty())
            && unique(&self.order)
    }
}

impl<A: Ord + Clone + FromStr> Ranking<A> {
    /// Try to parse a ranking from `s`. Returns None if `s` is not a valid
    /// ranking.
    ///
    /// ```
    /// use orders::ranking::Ranking;
    ///
    /// let order_str = "2,{0,1},4";
    /// let order: Ranking<usize> = Ranking::parse_order(order_str).expect("Parse failed");
    /// assert_eq!(format!("{}", order), order_str);
    /// ```
    ///
    /// There can be multiple string representations for the same ranking:
    /// ```
    /// use orders::ranking::Ranking;
    ///
    /// let rank: Ranking<usize> = Ranking::parse_order("0,{1}").unwrap();
    /// assert!(rank.to_string() == "0,1");
    /// ```
    pub fn parse_order(s: &str) -> Option<Self> {
        if s.is_empty() {
            return Some(Ranking::new_zero());
        }
        let mut order: Vec<A> = Vec::new();
        let mut tied: Vec<bool> = Vec::new();
        let mut grouped = false;
        for mut part in s.split(',') {
            // Are we starting a group?
            if !grouped {
                part = part.strip_prefix('{').map_or(part, |s| {
                    grouped = true;
                    s
                });
            }

            // Are we ending a group? We check both cases as this part may be a group with
            // only one alternative.
            if grouped {
                part = part.strip_suffix('}').map_or(part, |s| {
                    grouped = !grouped;
                    s
                })
            }
            let x: A = part.parse().ok()?;
            order.push(x);
            tied.push(grouped);
        }
        // The last one will never be tied, so we'll ignore it.
        tied.pop();

        // We didn't end our group
        if grouped || !unique(&order) {
            return None;
        }
        Some(Ranking { order, tied })
    }
}

impl<A: Display> Display for Ranking<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut left = self.order.len();
        let groups = GroupIterator { order: &self.order, tied: &self.tied };
        for group in groups {
            left -= group.len();
            let grouped = group.len() > 1;
            if grouped {
                f.write_char('{')?;
            }
            for (i, x) in group.iter().enumerate() {
                if i != 0 {
                    f.write_char(',')?;
                }
                write!(f, "{}", x)?;
            }
            if grouped {
                f.write_char('}')?;
            }
            if left != 0 {
                f.write_char(',')?;
            }
        }
        Ok(())
    }
}

fn unique<A: Ord>(order: &[A]) -> bool {
    let mut seen = BTreeSet::new();
    order.iter().all(|x| seen.insert(x))
}
