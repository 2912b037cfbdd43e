use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Profile identifier in the external directory service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fid(u64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FidError {
    #[error("fid is required")]
    Missing,

    #[error("fid must be a positive integer, got {0:?}")]
    Malformed(String),

    #[error("fid given more than once")]
    Duplicate,
}

impl Fid {
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Parse an optional raw value, as it arrives from a query string
    pub fn parse_opt(raw: Option<&str>) -> Result<Self, FidError> {
        match raw {
            None => Err(FidError::Missing),
            Some(s) if s.trim().is_empty() => Err(FidError::Missing),
            Some(s) => s.parse(),
        }
    }
}

impl Fid {
    /// Pick `fid` out of decoded query pairs; it must appear exactly once.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Result<Self, FidError> {
        let mut values = pairs.iter().filter(|(k, _)| k == "fid").map(|(_, v)| v);
        let first = values.next();
        if values.next().is_some() {
            return Err(FidError::Duplicate);
        }
        Self::parse_opt(first.map(String::as_str))
    }
}

impl FromStr for Fid {
    type Err = FidError;

    /// Only plain ASCII digits are accepted: no sign, no whitespace, no
    /// exponent, and zero is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FidError::Malformed(s.to_string()));
        }
        s.parse::<u64>()
            .ok()
            .and_then(Fid::new)
            .ok_or_else(|| FidError::Malformed(s.to_string()))
    }
}

impl fmt::Display for Fid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
