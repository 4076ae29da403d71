//! Download-then-upload mirroring of selected packages.
//!
//! Every package is downloaded first, then every downloaded file is uploaded,
//! one request at a time and in discovery order. Nothing is rolled back: a
//! failed upload does not stop the ones after it, and the staged files stay in
//! the temporary directory.

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use reqwest::Url;
use std::path::{Path, PathBuf};

use crate::nexus::{Registry, UploadOutcome};
use crate::package::{LatestPackages, PackageRef};
use crate::runtime::Runtime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved { path: PathBuf, bytes: u64 },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRecord {
    pub package: String,
    pub version: String,
    pub url: String,
    pub outcome: DownloadOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub path: PathBuf,
    pub outcome: UploadOutcome,
}

/// What happened to every package during a mirror run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    pub downloads: Vec<DownloadRecord>,
    pub uploads: Vec<UploadRecord>,
}

impl MirrorReport {
    pub fn downloaded(&self) -> usize {
        self.downloads
            .iter()
            .filter(|d| matches!(d.outcome, DownloadOutcome::Saved { .. }))
            .count()
    }

    pub fn uploaded(&self) -> usize {
        self.uploads
            .iter()
            .filter(|u| u.outcome.is_uploaded())
            .count()
    }
}

/// Final path segment of `url`, used as the local file name.
pub fn file_name_from_url(url: &str) -> Result<String> {
    let name = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        Err(_) => url.rsplit('/').next().map(str::to_string),
    };

    name.filter(|n| !n.is_empty())
        .ok_or_else(|| anyhow!("No file name in download URL {}", url))
}

async fn download<G: Registry + ?Sized, R: Runtime>(
    registry: &G,
    runtime: &R,
    package: &PackageRef,
) -> DownloadOutcome {
    let path = match file_name_from_url(&package.download_url) {
        Ok(name) => runtime.temp_dir().join(name),
        Err(e) => return DownloadOutcome::Failed(e.to_string()),
    };

    debug!("Downloading {} {} to {:?}", package.name, package.version, path);

    let dest = match runtime
        .create_file(&path)
        .with_context(|| format!("Failed to stage {:?}", path))
    {
        Ok(dest) => dest,
        Err(e) => return DownloadOutcome::Failed(format!("{:#}", e)),
    };

    match registry.download_asset(&package.download_url, dest).await {
        Ok(bytes) => DownloadOutcome::Saved { path, bytes },
        Err(e) => DownloadOutcome::Failed(format!("{:#}", e)),
    }
}

async fn upload<G: Registry + ?Sized, R: Runtime>(
    registry: &G,
    runtime: &R,
    destination: &str,
    path: &Path,
) -> Result<UploadOutcome> {
    let contents = runtime
        .read(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    registry.upload_asset(destination, &file_name, contents).await
}

/// Mirrors `packages` into `destination`.
///
/// Failures are recorded in the returned report rather than raised: a package
/// that cannot be staged or downloaded is not uploaded, and a file that cannot
/// be read back or posted is marked [`UploadOutcome::Failed`].
#[tracing::instrument(skip(registry, runtime, packages))]
pub async fn mirror<G: Registry + ?Sized, R: Runtime>(
    registry: &G,
    runtime: &R,
    packages: &LatestPackages,
    destination: &str,
) -> MirrorReport {
    let mut report = MirrorReport::default();

    for package in packages.iter() {
        let outcome = download(registry, runtime, package).await;
        match &outcome {
            DownloadOutcome::Saved { path, .. } => {
                println!("pkg {} downloaded", path.display());
            }
            DownloadOutcome::Failed(reason) => {
                eprintln!(
                    "pkg {} {} not downloaded: {}",
                    package.name, package.version, reason
                );
            }
        }
        report.downloads.push(DownloadRecord {
            package: package.name.clone(),
            version: package.version.clone(),
            url: package.download_url.clone(),
            outcome,
        });
    }

    let staged: Vec<PathBuf> = report
        .downloads
        .iter()
        .filter_map(|d| match &d.outcome {
            DownloadOutcome::Saved { path, .. } => Some(path.clone()),
            DownloadOutcome::Failed(_) => None,
        })
        .collect();

    for path in staged {
        let outcome = match upload(registry, runtime, destination, &path).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Upload of {:?} failed: {:#}", path, e);
                UploadOutcome::Failed(format!("{:#}", e))
            }
        };
        println!("uploaded: {}", path.display());
        println!("{}", outcome);
        report.uploads.push(UploadRecord { path, outcome });
    }

    info!(
        "Mirrored into {}: {}/{} downloaded, {}/{} uploaded",
        destination,
        report.downloaded(),
        report.downloads.len(),
        report.uploaded(),
        report.uploads.len()
    );

    report
}
