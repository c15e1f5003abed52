use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("too many patterns: got {count}, limit is {limit}")]
    TooManyPatterns { count: usize, limit: usize },

    #[error("rolling hash needs at least one base")]
    NoHashBases,

    #[error("rolling hash modulus must be at least 2, got {0}")]
    InvalidModulus(u64),
}

pub type Result<T> = std::result::Result<T, Error>;
