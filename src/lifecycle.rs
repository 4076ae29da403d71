//! Creation and deletion of hosted repositories.

use anyhow::Result;
use log::info;

use crate::nexus::{CreateOutcome, DeleteOutcome, KNOWN_ISSUE_URL, Registry, RepositoryDescriptor};

pub fn create_message(repository: &str, outcome: CreateOutcome) -> String {
    match outcome {
        CreateOutcome::Created => format!("repository {} created", repository),
        CreateOutcome::AlreadyExists => format!("repository {} already exists", repository),
        CreateOutcome::Unauthorized => format!(
            "Can't create repository {}. Authentication required, status: 401",
            repository
        ),
        CreateOutcome::Forbidden => format!(
            "Can't create repository {}. Permission denied, status: 403",
            repository
        ),
        CreateOutcome::ServerError(status) => format!(
            "This can be the Nexus bug {}, status: {}",
            KNOWN_ISSUE_URL,
            status.as_u16()
        ),
        CreateOutcome::Unhandled(status) => {
            format!("Unhandled error with status: {}", status.as_u16())
        }
    }
}

pub fn delete_message(repository: &str, user: &str, outcome: DeleteOutcome) -> String {
    match outcome {
        DeleteOutcome::Deleted => format!("Repository {} deleted, status: 204", repository),
        DeleteOutcome::NotFound => format!("Repository {} not found, status: 404", repository),
        DeleteOutcome::Unauthorized => format!(
            "Can't delete repository {}. Authentication required, status: 401",
            repository
        ),
        DeleteOutcome::Forbidden => format!(
            "Can't delete repository {}. User {} doesn't have permissions, status: 403",
            repository, user
        ),
        DeleteOutcome::ServerError(status) => format!(
            "This can be the Nexus bug {}, status: {}",
            KNOWN_ISSUE_URL,
            status.as_u16()
        ),
        DeleteOutcome::Unhandled(status) => {
            format!("Unhandled error with status: {}", status.as_u16())
        }
        DeleteOutcome::Skipped => format!("Repository {} is protected, skipping", repository),
    }
}

/// Creates `repository` as a hosted PyPI repository with the fixed defaults.
///
/// An existing repository is reported, not treated as an error.
#[tracing::instrument(skip(registry))]
pub async fn create_repository<G: Registry + ?Sized>(
    registry: &G,
    repository: &str,
) -> Result<CreateOutcome> {
    let descriptor = RepositoryDescriptor::hosted(repository);
    let outcome = registry.create_repository(&descriptor).await?;
    println!("{}", create_message(repository, outcome));
    Ok(outcome)
}

/// Deletes `repository` unless it is listed in `protected`.
///
/// A protected name is skipped without sending any request.
#[tracing::instrument(skip(registry, protected))]
pub async fn delete_repository<G: Registry + ?Sized>(
    registry: &G,
    repository: &str,
    protected: &[String],
) -> Result<DeleteOutcome> {
    if protected.iter().any(|name| name == repository) {
        info!("{} is protected, not deleting", repository);
        return Ok(DeleteOutcome::Skipped);
    }

    let outcome = registry.delete_repository(repository).await?;
    println!("{}", delete_message(repository, registry.user(), outcome));
    Ok(outcome)
}
