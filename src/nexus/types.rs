use serde::{Deserialize, Serialize};

/// One page of `GET /service/rest/v1/components`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPage {
    #[serde(default)]
    pub items: Vec<Component>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

impl ComponentPage {
    /// Token for the next page, if the listing has more pages.
    pub fn next_token(&self) -> Option<&str> {
        self.continuation_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Component {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A stored file belonging to a component.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub download_url: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    /// Present only on assets Nexus recognised as Python packages
    #[serde(default)]
    pub pypi: Option<PypiAttributes>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct PypiAttributes {
    pub name: String,
    pub version: String,
}

/// Body of `POST /service/rest/v1/repositories/pypi/hosted`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RepositoryDescriptor {
    pub name: String,
    pub online: bool,
    pub storage: Storage,
    pub cleanup: Cleanup,
    pub component: ComponentPolicy,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Storage {
    pub blob_store_name: String,
    pub strict_content_type_validation: bool,
    pub write_policy: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cleanup {
    pub policy_names: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPolicy {
    pub proprietary_components: bool,
}

impl RepositoryDescriptor {
    /// Online hosted repository on the default blob store, strict content
    /// validation, redeploy allowed, proprietary components.
    pub fn hosted(name: &str) -> Self {
        Self {
            name: name.to_string(),
            online: true,
            storage: Storage {
                blob_store_name: "default".to_string(),
                strict_content_type_validation: true,
                write_policy: "allow".to_string(),
            },
            cleanup: Cleanup {
                policy_names: vec!["string".to_string()],
            },
            component: ComponentPolicy {
                proprietary_components: true,
            },
        }
    }
}
