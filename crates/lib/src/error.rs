use thiserror::Error;

/// Errors from building, querying and parsing utilities and utility profiles.
///
/// Alternatives are stored by their display form, so the error doesn't carry
/// the alternative type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An alternative was used that is not in the domain.
    #[error("{0} must be in the domain")]
    NotInDomain(String),

    /// A probability was given to an alternative outside the domain.
    #[error("the probability distribution assigns {0}, which is not in the domain")]
    ProbabilityOutsideDomain(String),

    #[error("the number of utilities ({utilities}) must equal the number of counts ({counts})")]
    CountMismatch { utilities: usize, counts: usize },

    #[error("utility {index} has a count of zero")]
    ZeroCount { index: usize },

    #[error("number of voters ({declared}) does not match the number of utilities ({parsed})")]
    VoterCountMismatch { declared: usize, parsed: usize },

    /// Malformed utility profile string.
    #[error("could not parse utility profile: {0}")]
    Parse(String),

    #[error("could not create ranking profile: {0}")]
    RankingProfile(&'static str),

    #[error("invalid distribution: {0}")]
    Distribution(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
