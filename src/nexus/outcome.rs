//! Named outcomes for the Nexus calls whose status codes are expected answers
//! rather than failures.

use reqwest::StatusCode;
use std::fmt;

/// Upstream Nexus defect that surfaces as a 500 on repository and upload calls.
pub const KNOWN_ISSUE_URL: &str = "https://issues.sonatype.org/browse/NEXUS-31674";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
    Unauthorized,
    Forbidden,
    ServerError(StatusCode),
    Unhandled(StatusCode),
}

impl CreateOutcome {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::CREATED => CreateOutcome::Created,
            // Older releases answer 415 for a duplicate name, newer ones 400
            StatusCode::UNSUPPORTED_MEDIA_TYPE | StatusCode::BAD_REQUEST => {
                CreateOutcome::AlreadyExists
            }
            StatusCode::UNAUTHORIZED => CreateOutcome::Unauthorized,
            StatusCode::FORBIDDEN => CreateOutcome::Forbidden,
            s if s.is_server_error() => CreateOutcome::ServerError(s),
            s => CreateOutcome::Unhandled(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    Unauthorized,
    Forbidden,
    ServerError(StatusCode),
    Unhandled(StatusCode),
    /// The name is protected; no request was sent.
    Skipped,
}

impl DeleteOutcome {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NO_CONTENT => DeleteOutcome::Deleted,
            StatusCode::NOT_FOUND => DeleteOutcome::NotFound,
            StatusCode::UNAUTHORIZED => DeleteOutcome::Unauthorized,
            StatusCode::FORBIDDEN => DeleteOutcome::Forbidden,
            s if s.is_server_error() => DeleteOutcome::ServerError(s),
            s => DeleteOutcome::Unhandled(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    AlreadyUploaded,
    KnownIssue(StatusCode),
    Unhandled(StatusCode),
    /// The request never produced a status (connection or local I/O error).
    Failed(String),
}

impl UploadOutcome {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NO_CONTENT => UploadOutcome::Uploaded,
            StatusCode::BAD_REQUEST => UploadOutcome::AlreadyUploaded,
            StatusCode::INTERNAL_SERVER_ERROR => UploadOutcome::KnownIssue(status),
            s => UploadOutcome::Unhandled(s),
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded)
    }
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadOutcome::Uploaded => write!(f, "package uploaded successfully"),
            UploadOutcome::AlreadyUploaded => write!(f, "package already uploaded"),
            UploadOutcome::KnownIssue(status) => write!(
                f,
                "this can be the Nexus bug {}, status: {}",
                KNOWN_ISSUE_URL,
                status.as_u16()
            ),
            UploadOutcome::Unhandled(status) => write!(f, "upload: {}", status.as_u16()),
            UploadOutcome::Failed(reason) => write!(f, "upload failed: {}", reason),
        }
    }
}
