//! Nexus REST API access.
//!
//! [`Registry`] is the seam between the workflow and the server; [`Nexus`] is
//! the implementation that talks to a real instance over HTTP.

mod outcome;
mod types;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};
use std::io::Write;

use crate::http::HttpClient;

pub use outcome::{CreateOutcome, DeleteOutcome, KNOWN_ISSUE_URL, UploadOutcome};
pub use types::{
    Asset, Cleanup, Component, ComponentPage, ComponentPolicy, PypiAttributes,
    RepositoryDescriptor, Storage,
};

pub const COMPONENTS_PATH: &str = "/service/rest/v1/components";
pub const REPOSITORIES_PATH: &str = "/service/rest/v1/repositories";
pub const HOSTED_PYPI_PATH: &str = "/service/rest/v1/repositories/pypi/hosted";

/// Multipart field Nexus expects for a Python package upload.
pub const UPLOAD_FIELD: &str = "pypi.asset";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Registry: Send + Sync {
    async fn create_repository(&self, descriptor: &RepositoryDescriptor) -> Result<CreateOutcome>;
    async fn delete_repository(&self, name: &str) -> Result<DeleteOutcome>;
    async fn list_components(
        &self,
        repository: &str,
        continuation_token: Option<String>,
    ) -> Result<ComponentPage>;
    /// Streams `url` into `dest`, returning the number of bytes written.
    async fn download_asset(&self, url: &str, dest: Box<dyn Write + Send>) -> Result<u64>;
    /// Posts `contents` as the `pypi.asset` part, named `file_name`.
    async fn upload_asset(
        &self,
        repository: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<UploadOutcome>;
    /// Name of the authenticated user, for messages.
    fn user(&self) -> &str;
}

pub struct Nexus {
    http: HttpClient,
    base_url: String,
}

impl Nexus {
    #[tracing::instrument(skip(http, base_url))]
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Registry for Nexus {
    #[tracing::instrument(skip(self, descriptor))]
    async fn create_repository(&self, descriptor: &RepositoryDescriptor) -> Result<CreateOutcome> {
        let url = self.url(HOSTED_PYPI_PATH);
        debug!("Creating hosted repository {} at {}", descriptor.name, url);

        let status = self
            .http
            .post_json(&url, descriptor)
            .await
            .with_context(|| format!("Failed to create repository {}", descriptor.name))?;

        Ok(CreateOutcome::from_status(status))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_repository(&self, name: &str) -> Result<DeleteOutcome> {
        let url = format!("{}/{}", self.url(REPOSITORIES_PATH), name);

        let status = self
            .http
            .delete(&url)
            .await
            .with_context(|| format!("Failed to delete repository {}", name))?;

        Ok(DeleteOutcome::from_status(status))
    }

    #[tracing::instrument(skip(self))]
    async fn list_components(
        &self,
        repository: &str,
        continuation_token: Option<String>,
    ) -> Result<ComponentPage> {
        let url = self.url(COMPONENTS_PATH);

        let mut query = vec![("repository", repository)];
        if let Some(token) = continuation_token.as_deref() {
            query.push(("continuationToken", token));
        }

        self.http
            .get_json_with_query(&url, &query)
            .await
            .with_context(|| format!("Failed to list components of {}", repository))
    }

    #[tracing::instrument(skip(self, dest))]
    async fn download_asset(&self, url: &str, dest: Box<dyn Write + Send>) -> Result<u64> {
        self.http.download_file(url, move || Ok(dest)).await
    }

    #[tracing::instrument(skip(self, contents))]
    async fn upload_asset(
        &self,
        repository: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<UploadOutcome> {
        debug!("Uploading {} ({} bytes) to {}", file_name, contents.len(), repository);

        let form = Form::new().part(
            UPLOAD_FIELD,
            Part::bytes(contents).file_name(file_name.to_string()),
        );

        let status = self
            .http
            .post_multipart(&self.url(COMPONENTS_PATH), &[("repository", repository)], form)
            .await
            .with_context(|| format!("Failed to upload {}", file_name))?;

        Ok(UploadOutcome::from_status(status))
    }

    fn user(&self) -> &str {
        self.http.user()
    }
}
