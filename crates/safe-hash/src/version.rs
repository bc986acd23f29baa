//! Safe contract version handling.
//!
//! The Safe transaction service reports versions such as `1.3.0+L2`. Build tags never affect
//! hashing, so they are stripped before comparison, and missing trailing components count as
//! zero (`1.3` equals `1.3.0`).

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::Serialize;

use crate::{constants::MIN_SUPPORTED_VERSION, Result, SafeHashError};

/// A `major.minor.patch` Safe contract version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SafeVersion {
    /// Major component
    pub major: u64,
    /// Minor component
    pub minor: u64,
    /// Patch component
    pub patch: u64,
}

impl SafeVersion {
    /// Creates a version from its components.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch }
    }

    /// Parses a version string, stripping any `+tag` suffix.
    pub fn parse(version: &str) -> Result<Self> {
        let cleaned = clean_version(version);
        if cleaned.is_empty() {
            return Err(SafeHashError::unsupported(version, "empty version string"));
        }

        let mut components = [0u64; 3];
        for (index, part) in cleaned.split('.').enumerate() {
            if index >= components.len() {
                return Err(SafeHashError::unsupported(version, "more than three components"));
            }
            components[index] = part.parse().map_err(|_| {
                SafeHashError::unsupported(version, format!("invalid component \"{part}\""))
            })?;
        }

        Ok(Self::new(components[0], components[1], components[2]))
    }

    /// Returns `true` if `self >= other`.
    pub fn gte(&self, other: &Self) -> bool {
        self >= other
    }

    /// Returns `true` if `self <= other`.
    pub fn lte(&self, other: &Self) -> bool {
        self <= other
    }

    /// Returns `true` if `self < other`.
    pub fn lt(&self, other: &Self) -> bool {
        self < other
    }
}

impl fmt::Display for SafeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SafeVersion {
    type Err = SafeHashError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Strips a `+tag` build suffix and surrounding whitespace.
pub fn clean_version(version: &str) -> &str {
    version.split_once('+').map_or(version, |(base, _)| base).trim()
}

/// Compares two version strings component-wise.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    Ok(SafeVersion::parse(a)?.cmp(&SafeVersion::parse(b)?))
}

/// Validates that `version` names a Safe whose hashing scheme is supported.
///
/// An empty version is what the transaction service reports for an address without a Safe
/// deployed, so it gets a dedicated message.
pub fn validate_version(version: &str) -> Result<SafeVersion> {
    if clean_version(version).is_empty() {
        return Err(SafeHashError::unsupported(
            version,
            "no Safe contract found at this address",
        ));
    }

    let parsed = SafeVersion::parse(version)?;
    if parsed.lt(&MIN_SUPPORTED_VERSION) {
        return Err(SafeHashError::unsupported(
            version,
            format!("versions below {MIN_SUPPORTED_VERSION} are not supported"),
        ));
    }

    Ok(parsed)
}
