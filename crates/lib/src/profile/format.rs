//! Text format of utility profiles:
//!
//! ```text
//! <num_alternatives>;<num_voters>;<voter 1>;<voter 2>;...
//! ```
//!
//! where every voter is a comma separated list of `alternative:utility`,
//! which is empty if the voter assigns no utilities.
use std::{collections::BTreeMap, str::FromStr};

use tracing::debug;

use super::{ProfileOptions, UtilityProfile};
use crate::{
    Alternative,
    error::{Error, Result},
};

impl<A: Alternative> UtilityProfile<A> {
    /// Write the profile to a string, which can be read back using
    /// [`UtilityProfile::from_string`]. There is one entry for every voter,
    /// listing alternatives in the order of the domain.
    ///
    /// Only profiles over the domain `0..n` can be read back as they were
    /// written.
    pub fn write(&self) -> String {
        let mut out = format!("{};{}", self.num_alternatives(), self.num_voters());
        for u in self.utilities() {
            let pairs: Vec<String> = u
                .domain()
                .iter()
                .filter_map(|x| Some(format!("{}:{}", x, u.utils().get(x)?)))
                .collect();
            out.push(';');
            out.push_str(&pairs.join(","));
        }
        out
    }
}

impl UtilityProfile<usize> {
    /// Read a profile in the format written by [`UtilityProfile::write`]. The
    /// domain of the profile will be `0..num_alternatives`.
    ///
    /// ```
    /// use utility_profiles::UtilityProfile;
    ///
    /// let profile = UtilityProfile::from_string("3;2;0:1,1:0.5;2:-1").unwrap();
    /// assert_eq!(profile.domain(), &[0, 1, 2]);
    /// assert_eq!(profile.util_sum(&0), Some(1.0));
    /// assert_eq!(profile.write(), "3;2;0:1,1:0.5;2:-1");
    /// ```
    pub fn from_string(s: &str) -> Result<Self> {
        let s = s.strip_suffix('\n').map_or(s, |s| s.strip_suffix('\r').unwrap_or(s));
        let mut fields = s.split(';');
        let num_alternatives = parse_count(fields.next(), "number of alternatives")?;
        let num_voters = parse_count(fields.next(), "number of voters")?;
        let utilities = fields.map(parse_utility).collect::<Result<Vec<_>>>()?;
        if utilities.len() != num_voters {
            return Err(Error::VoterCountMismatch { declared: num_voters, parsed: utilities.len() });
        }
        debug!(alternatives = num_alternatives, voters = num_voters, "parsed utility profile");
        let options = ProfileOptions::new().domain((0..num_alternatives).collect());
        UtilityProfile::with_options(utilities, options)
    }
}

impl FromStr for UtilityProfile<usize> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        UtilityProfile::from_string(s)
    }
}

fn parse_count(field: Option<&str>, what: &str) -> Result<usize> {
    let field = field.ok_or_else(|| Error::Parse(format!("missing {}", what)))?;
    field.parse().map_err(|_| Error::Parse(format!("{} `{}` is not a number", what, field)))
}

fn parse_utility(s: &str) -> Result<BTreeMap<usize, f64>> {
    if s.is_empty() {
        return Ok(BTreeMap::new());
    }
    s.split(',')
        .map(|pair| {
            let (x, u) = pair
                .split_once(':')
                .ok_or_else(|| Error::Parse(format!("`{}` is not `alternative:utility`", pair)))?;
            let x = x.parse().map_err(|_| Error::Parse(format!("`{}` is not an alternative", x)))?;
            let u = u
                .parse::<f64>()
                .ok()
                .filter(|u| u.is_finite())
                .ok_or_else(|| Error::Parse(format!("`{}` is not a utility", u)))?;
            Ok((x, u))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Utility;

    // Every utility assigns every alternative, so writing and reading gives
    // back the same utilities.
    #[quickcheck]
    fn roundtrip_complete(values: Vec<Vec<i16>>, elements: usize) -> bool {
        let elements = 1 + elements % 6;
        let utilities: Vec<Utility<usize>> = values
            .iter()
            .map(|v| (0..elements).map(|x| (x, *v.get(x).unwrap_or(&0) as f64 / 8.0)).collect())
            .collect();
        let profile = UtilityProfile::new(utilities);
        let Ok(read) = UtilityProfile::from_string(&profile.write()) else {
            return false;
        };
        read.num_voters() == profile.num_voters()
            && read.num_alternatives() == profile.num_alternatives()
            && read.utilities().iter().zip(profile.utilities()).all(|(a, b)| a.utils() == b.utils())
    }

    #[test]
    fn write_expands_counts() {
        let profile = UtilityProfile::with_options(
            vec![BTreeMap::from([(0, 1.5), (2, 2.0)]), BTreeMap::new()],
            ProfileOptions::new().counts(vec![2, 1]).domain(vec![0, 1, 2]),
        )
        .unwrap();
        assert_eq!(profile.write(), "3;3;0:1.5,2:2;0:1.5,2:2;");
    }

    #[test]
    fn read_empty_voter() {
        let profile: UtilityProfile<usize> = "2;2;;1:3".parse().unwrap();
        let utilities = profile.utilities();
        assert!(utilities[0].is_empty());
        assert_eq!(utilities[1].val(&0), Ok(None));
        assert_eq!(utilities[1].val(&1), Ok(Some(3.0)));
        assert_eq!(profile.write(), "2;2;;1:3");
    }

    #[test]
    fn read_trailing_newline() {
        assert!(UtilityProfile::from_string("1;1;0:2\r\n").is_ok());
        assert!(UtilityProfile::from_string("1;1;0:2\n").is_ok());
    }

    #[test]
    fn read_no_voters() {
        let profile = UtilityProfile::from_string("4;0").unwrap();
        assert_eq!(profile.num_voters(), 0);
        assert_eq!(profile.domain(), &[0, 1, 2, 3]);
    }

    #[test]
    fn read_errors() {
        assert_eq!(
            UtilityProfile::from_string("3;2;0:1"),
            Err(Error::VoterCountMismatch { declared: 2, parsed: 1 })
        );
        assert_eq!(
            UtilityProfile::from_string("3;1"),
            Err(Error::VoterCountMismatch { declared: 1, parsed: 0 })
        );
        let outside = UtilityProfile::from_string("2;1;5:1");
        assert_eq!(outside, Err(Error::NotInDomain("5".to_string())));
        let malformed = ["", "x;1;0:1", "3", "3;y", "3;1;0-1", "3;1;a:1", "3;1;0:b", "3;1;0:1,"];
        let not_real = ["2;1;0:NaN", "2;1;0:NaN,1:1", "2;1;1:inf", "2;1;0:-inf"];
        for s in malformed.into_iter().chain(not_real) {
            match UtilityProfile::from_string(s) {
                Err(Error::Parse(_)) => {}
                other => panic!("`{}` gave {:?}", s, other),
            }
        }
    }

    #[test]
    fn write_other_domain() {
        let profile = UtilityProfile::new(vec![BTreeMap::from([("b", 1.0), ("a", 0.0)])]);
        assert_eq!(profile.write(), "2;1;a:0,b:1");
        // Only integer domains can be read back.
        assert!(UtilityProfile::from_string(&profile.write()).is_err());
    }
}
