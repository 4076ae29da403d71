//! Latest-version listing of a source repository.

use anyhow::Result;
use log::{debug, info, warn};
use std::collections::HashMap;

use super::version::{VersionError, is_newer};
use crate::nexus::{Asset, Registry};

/// A package selected for mirroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    pub name: String,
    pub version: String,
    pub download_url: String,
}

/// An asset without package attributes, kept for the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAsset {
    pub component: Option<String>,
    pub path: Option<String>,
    pub download_url: String,
}

/// Newest version of every package seen, in discovery order.
#[derive(Debug, Default)]
pub struct LatestPackages {
    packages: Vec<PackageRef>,
    index: HashMap<String, usize>,
    pub skipped: Vec<SkippedAsset>,
    pub pages: usize,
}

impl LatestPackages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `candidate`, replacing the current entry for its name only when
    /// the candidate's trailing version segment is strictly greater.
    ///
    /// Returns whether the candidate was kept. The first version seen for a
    /// name is never parsed, so a lone pre-release version is accepted as is.
    pub fn offer(&mut self, candidate: PackageRef) -> Result<bool, VersionError> {
        match self.index.get(&candidate.name) {
            None => {
                self.index
                    .insert(candidate.name.clone(), self.packages.len());
                self.packages.push(candidate);
                Ok(true)
            }
            Some(&pos) => {
                let current = &mut self.packages[pos];
                if is_newer(&candidate.name, &candidate.version, &current.version)? {
                    debug!(
                        "{}: {} replaces {}",
                        candidate.name, candidate.version, current.version
                    );
                    *current = candidate;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&PackageRef> {
        self.index.get(name).map(|&pos| &self.packages[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageRef> {
        self.packages.iter()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

fn package_ref(asset: &Asset) -> Option<PackageRef> {
    asset.pypi.as_ref().map(|pypi| PackageRef {
        name: pypi.name.clone(),
        version: pypi.version.clone(),
        download_url: asset.download_url.clone(),
    })
}

/// Walks every page of `source` and keeps the newest version of each package.
///
/// Fails when a page cannot be fetched, or when two versions of one package
/// have to be compared and a trailing segment is not numeric.
#[tracing::instrument(skip(registry))]
pub async fn list_latest<G: Registry + ?Sized>(registry: &G, source: &str) -> Result<LatestPackages> {
    println!("Getting information about last versions of packages, please wait...");

    let mut latest = LatestPackages::new();
    let mut token: Option<String> = None;

    loop {
        let page = registry.list_components(source, token.take()).await?;
        latest.pages += 1;
        debug!(
            "Page {} of {}: {} components",
            latest.pages,
            source,
            page.items.len()
        );

        for component in &page.items {
            for asset in &component.assets {
                match package_ref(asset) {
                    Some(candidate) => {
                        latest.offer(candidate)?;
                    }
                    None => {
                        warn!("Skipping asset without package attributes: {:?}", asset);
                        latest.skipped.push(SkippedAsset {
                            component: component.name.clone(),
                            path: asset.path.clone(),
                            download_url: asset.download_url.clone(),
                        });
                    }
                }
            }
        }

        match page.next_token() {
            Some(next) => token = Some(next.to_string()),
            None => break,
        }
    }

    info!(
        "Found {} packages in {} ({} pages, {} assets skipped)",
        latest.len(),
        source,
        latest.pages,
        latest.skipped.len()
    );

    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nexus::{Component, ComponentPage, MockRegistry, PypiAttributes};
    use mockall::Sequence;
    use mockall::predicate::eq;

    fn pkg(name: &str, version: &str) -> PackageRef {
        PackageRef {
            name: name.to_string(),
            version: version.to_string(),
            download_url: format!("https://nexus/{}-{}.tar.gz", name, version),
        }
    }

    fn asset(name: &str, version: &str) -> Asset {
        Asset {
            download_url: format!("https://nexus/{}-{}.tar.gz", name, version),
            path: Some(format!("packages/{}/{}/{}-{}.tar.gz", name, version, name, version)),
            format: Some("pypi".to_string()),
            pypi: Some(PypiAttributes {
                name: name.to_string(),
                version: version.to_string(),
            }),
            ..Default::default()
        }
    }

    fn page(assets: Vec<Asset>, token: Option<&str>) -> ComponentPage {
        ComponentPage {
            items: vec![Component {
                assets,
                ..Default::default()
            }],
            continuation_token: token.map(str::to_string),
        }
    }

    #[test]
    fn test_offer_keeps_numerically_greater() {
        let mut latest = LatestPackages::new();
        assert!(latest.offer(pkg("alpha", "1.2.3")).unwrap());
        assert!(latest.offer(pkg("alpha", "1.2.10")).unwrap());
        assert!(!latest.offer(pkg("alpha", "1.2.9")).unwrap());

        assert_eq!(latest.len(), 1);
        assert_eq!(latest.get("alpha").unwrap().version, "1.2.10");
    }

    #[test]
    fn test_offer_tie_keeps_first_seen() {
        let mut latest = LatestPackages::new();
        let first = PackageRef {
            download_url: "https://nexus/first.whl".to_string(),
            ..pkg("alpha", "1.0.2")
        };
        latest.offer(first).unwrap();
        assert!(!latest.offer(pkg("alpha", "1.0.2")).unwrap());

        assert_eq!(
            latest.get("alpha").unwrap().download_url,
            "https://nexus/first.whl"
        );
    }

    #[test]
    fn test_offer_preserves_discovery_order() {
        let mut latest = LatestPackages::new();
        latest.offer(pkg("zeta", "1.0.0")).unwrap();
        latest.offer(pkg("alpha", "1.0.0")).unwrap();
        latest.offer(pkg("zeta", "1.0.5")).unwrap();

        let names: Vec<&str> = latest.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_offer_non_numeric_only_fails_on_comparison() {
        let mut latest = LatestPackages::new();
        // A single pre-release version is never parsed
        assert!(latest.offer(pkg("alpha", "1.0.0rc1")).unwrap());

        let err = latest.offer(pkg("alpha", "1.0.1")).unwrap_err();
        assert!(matches!(err, VersionError::NonNumericSegment { .. }));
    }

    #[tokio::test]
    async fn test_list_latest_three_pages() {
        let mut registry = MockRegistry::new();
        let mut seq = Sequence::new();

        registry
            .expect_list_components()
            .with(eq("production"), eq(None::<String>))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(vec![asset("alpha", "1.0.1")], Some("t1"))));
        registry
            .expect_list_components()
            .with(eq("production"), eq(Some("t1".to_string())))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(vec![asset("alpha", "1.0.2")], Some("t2"))));
        registry
            .expect_list_components()
            .with(eq("production"), eq(Some("t2".to_string())))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(vec![asset("beta", "2.0.0")], None)));

        let latest = list_latest(&registry, "production").await.unwrap();

        assert_eq!(latest.pages, 3);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest.get("alpha").unwrap().version, "1.0.2");
        assert_eq!(latest.get("beta").unwrap().version, "2.0.0");
    }

    #[tokio::test]
    async fn test_list_latest_stops_on_empty_token() {
        let mut registry = MockRegistry::new();
        registry
            .expect_list_components()
            .times(1)
            .returning(|_, _| Ok(page(vec![asset("alpha", "1.0.1")], Some(""))));

        let latest = list_latest(&registry, "production").await.unwrap();

        assert_eq!(latest.pages, 1);
        assert_eq!(latest.len(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_list_latest_collects_skipped_assets() {
        let mut registry = MockRegistry::new();
        registry.expect_list_components().times(1).returning(|_, _| {
            let untagged = Asset {
                download_url: "https://nexus/simple/alpha/".to_string(),
                path: Some("simple/alpha/".to_string()),
                ..Default::default()
            };
            Ok(ComponentPage {
                items: vec![Component {
                    name: Some("alpha".to_string()),
                    assets: vec![asset("alpha", "1.0.1"), untagged],
                    ..Default::default()
                }],
                continuation_token: None,
            })
        });

        let latest = list_latest(&registry, "production").await.unwrap();

        assert_eq!(latest.len(), 1);
        assert_eq!(
            latest.skipped,
            vec![SkippedAsset {
                component: Some("alpha".to_string()),
                path: Some("simple/alpha/".to_string()),
                download_url: "https://nexus/simple/alpha/".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_list_latest_empty_repository() {
        let mut registry = MockRegistry::new();
        registry
            .expect_list_components()
            .times(1)
            .returning(|_, _| Ok(ComponentPage::default()));

        let latest = list_latest(&registry, "empty").await.unwrap();

        assert!(latest.is_empty());
        assert_eq!(latest.pages, 1);
    }

    #[tokio::test]
    async fn test_list_latest_non_numeric_version_is_fatal() {
        let mut registry = MockRegistry::new();
        registry.expect_list_components().times(1).returning(|_, _| {
            Ok(page(
                vec![asset("alpha", "1.0.0"), asset("alpha", "1.0.1rc1")],
                Some("never-followed"),
            ))
        });

        let err = list_latest(&registry, "production").await.unwrap_err();

        assert!(err.downcast_ref::<VersionError>().is_some());
    }

    #[tokio::test]
    async fn test_list_latest_propagates_listing_error() {
        let mut registry = MockRegistry::new();
        registry
            .expect_list_components()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("connection refused")));

        assert!(list_latest(&registry, "production").await.is_err());
    }
}
