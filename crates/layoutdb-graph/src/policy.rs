//! Policies for input the parser should never emit.
//!
//! The names match external configuration strings (snake_case).

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// What the identity index does when two records share an identifier.
///
/// # Variants
///
/// - `Reject` - Fail with a duplicate-identifier error (default)
/// - `LastWins` - Keep the record inserted last, leave the shadowed records
///   out of the resolved design and log a warning
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    LastWins,
}

impl FromStr for DuplicatePolicy {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(Self::Reject),
            "last_wins" => Ok(Self::LastWins),
            _ => Err("Unsupported duplicate policy"),
        }
    }
}

impl From<DuplicatePolicy> for &'static str {
    fn from(val: DuplicatePolicy) -> Self {
        match val {
            DuplicatePolicy::Reject => "reject",
            DuplicatePolicy::LastWins => "last_wins",
        }
    }
}

impl Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// What resolution does when a reference names no existing record.
///
/// # Variants
///
/// - `Abort` - Fail the whole conversion with a dangling-reference error (default)
/// - `MarkMissing` - Keep a stub flagged as missing and log a warning
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingPolicy {
    #[default]
    Abort,
    MarkMissing,
}

impl FromStr for DanglingPolicy {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(Self::Abort),
            "mark_missing" => Ok(Self::MarkMissing),
            _ => Err("Unsupported dangling policy"),
        }
    }
}

impl From<DanglingPolicy> for &'static str {
    fn from(val: DanglingPolicy) -> Self {
        match val {
            DanglingPolicy::Abort => "abort",
            DanglingPolicy::MarkMissing => "mark_missing",
        }
    }
}

impl Display for DanglingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}
