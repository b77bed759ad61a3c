use std::path::PathBuf;

use thiserror::Error;

use crate::concurrency::Superseded;

/// The remote version source could not be read or did not contain a version.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read version document '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to '{url}' failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to '{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed version document from '{location}'")]
    Malformed {
        location: String,
        #[source]
        source: shipgate_manifest::DocumentError,
    },
}

/// A publish or label action reported failure.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("failed to launch '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed with {status}: {diagnostic}")]
    Failed {
        command: String,
        status: String,
        diagnostic: String,
    },

    #[error("{action} rejected: {reason}")]
    Rejected { action: String, reason: String },
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Manifest(#[from] shipgate_manifest::ManifestError),

    #[error(transparent)]
    Project(#[from] shipgate_project::ProjectError),

    #[error("failed to fetch the published version")]
    Fetch(#[from] FetchError),

    #[error("invalid change-request title")]
    Title(#[from] shipgate_title::TitleError),

    #[error("action failed")]
    Action(#[from] ActionError),

    #[error(transparent)]
    Superseded(#[from] Superseded),

    #[error("no remote version source configured; set `remote` or pass --remote")]
    MissingRemote,

    #[error("no publish command configured; set `publish-command` or pass --publish-command")]
    MissingPublishCommand,
}

pub type Result<T> = std::result::Result<T, OperationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_action_includes_diagnostic() {
        let err = ActionError::Failed {
            command: "npm publish".to_string(),
            status: "exit status: 1".to_string(),
            diagnostic: "E403 forbidden".to_string(),
        };

        let msg = err.to_string();

        assert!(msg.contains("npm publish"));
        assert!(msg.contains("E403 forbidden"));
    }

    #[test]
    fn action_error_is_kept_as_source() {
        let err: OperationError = ActionError::Rejected {
            action: "add label".to_string(),
            reason: "read-only token".to_string(),
        }
        .into();

        let source = std::error::Error::source(&err).expect("has source");

        assert!(source.to_string().contains("read-only token"));
    }

    #[test]
    fn missing_remote_message_names_flag() {
        assert!(OperationError::MissingRemote.to_string().contains("--remote"));
    }
}
