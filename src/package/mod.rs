//! Package selection: which version of each package gets mirrored.

mod listing;
mod version;

pub use listing::{LatestPackages, PackageRef, SkippedAsset, list_latest};
pub use version::{VersionError, is_newer, trailing_segment};
