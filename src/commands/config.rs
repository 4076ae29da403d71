//! Run configuration and credential resolution.

use std::fmt;

use log::debug;

use crate::runtime::Runtime;

/// Environment variable that takes precedence over `--user`.
pub const USER_ENV: &str = "NEXUS_USER";

/// Environment variable that takes precedence over `--password`.
pub const PASSWORD_ENV: &str = "NEXUS_PASSWORD";

/// Source repository used by `create` when `--source` is omitted.
pub const DEFAULT_SOURCE: &str = "production";

/// Repositories that `delete` never touches, in addition to `--protect`.
pub const PROTECTED_REPOSITORIES: &[&str] = &[];

/// What the run should do with the destination repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Operation {
    /// Create the destination and copy the latest packages into it
    Create,
    /// Delete the destination repository
    Delete,
}

/// Basic-auth credentials for the Nexus API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"*********")
            .finish()
    }
}

/// A credential that was neither passed on the command line nor set in the environment.
#[derive(Debug, PartialEq, Eq)]
pub enum MissingCredential {
    User,
    Password,
}

impl fmt::Display for MissingCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingCredential::User => write!(
                f,
                "the following required argument was not provided: --user <USER> (or set {})",
                USER_ENV
            ),
            MissingCredential::Password => write!(
                f,
                "the following required argument was not provided: --password <PASSWORD> (or set {})",
                PASSWORD_ENV
            ),
        }
    }
}

impl std::error::Error for MissingCredential {}

/// Merges `NEXUS_USER` / `NEXUS_PASSWORD` with the command-line credentials.
///
/// A variable set in the environment wins; the flags fill the gaps.
pub fn resolve_credentials<R: Runtime>(
    runtime: &R,
    user: Option<String>,
    password: Option<String>,
) -> Result<Credentials, MissingCredential> {
    let user = match runtime.env_var(USER_ENV) {
        Ok(user) => {
            debug!("Using {} for the Nexus login", USER_ENV);
            user
        }
        Err(_) => user.ok_or(MissingCredential::User)?,
    };

    let password = match runtime.env_var(PASSWORD_ENV) {
        Ok(password) => {
            debug!("Using {} for the Nexus password", PASSWORD_ENV);
            password
        }
        Err(_) => password.ok_or(MissingCredential::Password)?,
    };

    Ok(Credentials { user, password })
}

/// Everything a run needs, built once in `main` and passed down by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub operation: Operation,
    pub source: String,
    pub dest: String,
    pub fqdn: String,
    /// Root of the REST API, `https://{fqdn}` unless overridden.
    pub base_url: String,
    pub credentials: Credentials,
    pub protected: Vec<String>,
}

impl Config {
    pub fn new(
        operation: Operation,
        source: Option<String>,
        dest: String,
        fqdn: String,
        api_url: Option<String>,
        credentials: Credentials,
        extra_protected: Vec<String>,
    ) -> Self {
        let base_url = api_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://{}", fqdn));

        let mut protected: Vec<String> = PROTECTED_REPOSITORIES
            .iter()
            .map(|name| name.to_string())
            .collect();
        protected.extend(extra_protected);

        Self {
            operation,
            source: source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            dest,
            fqdn,
            base_url,
            credentials,
            protected,
        }
    }

    pub fn is_protected(&self, repository: &str) -> bool {
        self.protected.iter().any(|name| name == repository)
    }
}
