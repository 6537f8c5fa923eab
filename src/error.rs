// Error types for the library. Every operation returns `Result<T>` and the
// CLI layer is the only place these are turned into user-facing text.

use std::fmt;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ActopusError>;

/// Which half of an endpoint lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    /// No endpoint group has the requested type.
    UnknownType,
    /// The type exists but has no such action.
    UnknownAction,
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType => write!(f, "unknown endpoint type"),
            Self::UnknownAction => write!(f, "unknown endpoint action"),
        }
    }
}

/// Everything that can go wrong talking to the deployment server.
#[derive(Error, Debug)]
pub enum ActopusError {
    /// The registry has no definition for the requested operation.
    #[error("{kind} ({endpoint_type}/{action})")]
    EndpointNotFound {
        kind: LookupFailure,
        endpoint_type: String,
        action: String,
    },

    /// A project name did not resolve to an id.
    #[error("no project id found for {0}")]
    ResourceNotFound(String),

    /// The release version is already present on the server.
    #[error("release already exists for version {0}")]
    ResourceAlreadyExists(String),

    /// The release lookup answered with something other than 200 or 404.
    #[error("got bad response code {status}: {body}")]
    UnexpectedResponse { status: u16, body: String },

    /// The server refused to create the release.
    #[error("got error code {status}: {body}")]
    ResourceCreationError { status: u16, body: String },

    /// The HTTP round trip never completed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body was not the JSON we expected. Status and body are
    /// kept since they usually hold the server's own error message.
    #[error("could not decode response ({status}): {source}: {body}")]
    Decode {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// Channel ids are derived from the project id suffix, which needs a `-`.
    #[error("project id '{0}' has no '-' separated suffix")]
    InvalidProjectId(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ActopusError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedResponse { status, .. }
            | Self::ResourceCreationError { status, .. }
            | Self::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }
}
