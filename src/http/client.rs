//! HTTP client carrying the Nexus basic-auth credentials.

use anyhow::{Context, Result};
use log::debug;
use reqwest::multipart::Form;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;

use crate::commands::config::Credentials;

/// HTTP client that signs every request with basic credentials.
///
/// Only the listing and download calls treat a non-success status as an error.
/// The create/delete/upload calls hand the raw status back so callers can map it
/// to an outcome.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    credentials: Credentials,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub fn user(&self) -> &str {
        &self.credentials.user
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.credentials.user, Some(&self.credentials.password))
    }

    /// Performs a GET request with query parameters and deserializes the JSON response.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET JSON from {} with query {:?}...", url, query);

        let response = self
            .authorized(self.client.get(url).query(query))
            .send()
            .await
            .context("Failed to send request")?;

        let response = response
            .error_for_status()
            .with_context(|| format!("GET {} failed", url))?;

        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// POSTs a JSON body and returns the response status.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<StatusCode> {
        debug!("POST JSON to {}...", url);

        let response = self
            .authorized(self.client.post(url).json(body))
            .send()
            .await
            .context("Failed to send request")?;

        Ok(response.status())
    }

    /// POSTs a multipart form and returns the response status.
    #[tracing::instrument(skip(self, query, form))]
    pub async fn post_multipart(
        &self,
        url: &str,
        query: &[(&str, &str)],
        form: Form,
    ) -> Result<StatusCode> {
        debug!("POST multipart to {} with query {:?}...", url, query);

        let response = self
            .authorized(self.client.post(url).query(query).multipart(form))
            .send()
            .await
            .context("Failed to send request")?;

        Ok(response.status())
    }

    /// Sends a DELETE request and returns the response status.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, url: &str) -> Result<StatusCode> {
        debug!("DELETE {}...", url);

        let response = self
            .authorized(self.client.delete(url))
            .send()
            .await
            .context("Failed to send request")?;

        Ok(response.status())
    }

    /// Downloads a file from a URL into the writer returned by `create_writer`.
    /// The writer is only created once the server has answered with a success status.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(&self, url: &str, create_writer: F) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        debug!("Downloading file from {}...", url);

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .context("Failed to start download request")?;

        let mut response = response
            .error_for_status()
            .with_context(|| format!("Download of {} failed", url))?;

        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read chunk from download stream")?
        {
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
            downloaded_bytes += chunk.len() as u64;
        }
        writer.flush().context("Failed to flush downloaded file")?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}
