//! Path and specifier patterns.
//!
//! A [`Pattern`] is one of three kinds:
//!
//! - **exact**: `"lodash"` matches only `lodash`
//! - **prefix**: `"src/core/*"` matches anything starting with `src/core/`
//! - **regex**: `{ regex = "^@app/(core|shared)/" }` matches when the
//!   expression finds a match anywhere in the candidate. Use `^` and `$`
//!   to anchor.
//!
//! Only a single trailing `*` is special. A `*` anywhere else is literal.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// A compiled pattern matched against file paths and import specifiers.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches by string equality.
    Exact(String),
    /// Matches by string prefix. Stored without the trailing `*`.
    Prefix(String),
    /// Matches when the expression matches any part of the candidate.
    Regex(regex::Regex),
}

impl Pattern {
    /// Parses a plain string pattern. A trailing `*` makes it a prefix pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw.is_empty() {
            return Err(PatternError::Empty);
        }
        Ok(match raw.strip_suffix('*') {
            Some(prefix) => Self::Prefix(prefix.to_string()),
            None => Self::Exact(raw.to_string()),
        })
    }

    /// Compiles a regular-expression pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the expression is empty or does not compile.
    pub fn regex(expr: &str) -> Result<Self, PatternError> {
        if expr.is_empty() {
            return Err(PatternError::Empty);
        }
        regex::Regex::new(expr)
            .map(Self::Regex)
            .map_err(|e| PatternError::InvalidRegex {
                pattern: expr.to_string(),
                reason: e.to_string(),
            })
    }

    /// Tests whether `candidate` matches this pattern.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(p) => candidate == p,
            Self::Prefix(p) => candidate.starts_with(p.as_str()),
            Self::Regex(re) => re.is_match(candidate),
        }
    }

    /// Returns `true` for regular-expression patterns.
    #[must_use]
    pub fn is_regex(&self) -> bool {
        matches!(self, Self::Regex(_))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) | (Self::Prefix(a), Self::Prefix(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for Pattern {}

/// Renders the pattern the way it is written in configuration.
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(p) => write!(f, "{p}"),
            Self::Prefix(p) => write!(f, "{p}*"),
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Exact(_) | Self::Prefix(_) => serializer.collect_str(self),
            Self::Regex(re) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("regex", re.as_str())?;
                map.end()
            }
        }
    }
}

/// Errors when building a [`Pattern`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// Pattern is empty.
    #[error("pattern must not be empty")]
    Empty,

    /// Regular expression failed to compile.
    #[error("invalid regex `{pattern}`: {reason}")]
    InvalidRegex {
        /// The offending expression.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
}
