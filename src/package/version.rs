//! Version comparison for package deduplication.
//!
//! Only the last dot-separated segment of a version is compared, numerically.
//! `1.2.10` is newer than `1.2.3`, but `1.0.0rc1` cannot be compared at all and
//! yields [`VersionError::NonNumericSegment`].

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The trailing segment of the version is not a plain integer.
    NonNumericSegment { package: String, version: String },
}

impl fmt::Display for VersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionError::NonNumericSegment { package, version } => write!(
                f,
                "Cannot compare versions of {}: trailing segment of '{}' is not numeric",
                package, version
            ),
        }
    }
}

impl std::error::Error for VersionError {}

/// Returns the last dot-separated segment of `version` as a number.
pub fn trailing_segment(package: &str, version: &str) -> Result<u64, VersionError> {
    let segment = version.rsplit('.').next().unwrap_or(version);
    segment
        .trim()
        .parse::<u64>()
        .map_err(|_| VersionError::NonNumericSegment {
            package: package.to_string(),
            version: version.to_string(),
        })
}

/// True when `candidate` is strictly newer than `current`. Equal segments are not newer.
pub fn is_newer(package: &str, candidate: &str, current: &str) -> Result<bool, VersionError> {
    Ok(trailing_segment(package, candidate)? > trailing_segment(package, current)?)
}
