use thiserror::Error;

/// All errors produced by the drive filesystem adapter.
#[derive(Debug, Error)]
pub enum Error {
    /// `stat` target (or one of its ancestors) does not exist.
    #[error("stat: not found: {0}")]
    StatNotFound(String),

    /// `read` target (or one of its ancestors) does not exist.
    #[error("read: not found: {0}")]
    FileNotFound(String),

    /// A file operation found a directory. Raised by callers layered on top of
    /// this adapter; kept here so the whole error surface lives in one type.
    #[error("is a directory: {0}")]
    IsDirectory(String),

    /// `write` would create an object under a folder that does not exist.
    #[error("folder {0} does not exist")]
    CreateTargetMissing(String),

    /// The remote store answered with a non-2xx status.
    #[error("remote call failed: {status_text}")]
    RemoteCallFailed { status: u16, status_text: String },

    /// No bearer token was configured.
    #[error("bearer auth token required")]
    MissingToken,

    /// The requested path could not be decoded.
    #[error("invalid path `{0}`")]
    InvalidPath(String),

    /// Settings could not be loaded.
    #[error("config: {0}")]
    Config(#[from] config::ConfigError),

    /// A response body did not have the expected shape.
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),

    /// Transport-level failure (connection, TLS, body stream).
    #[error(transparent)]
    Transport(#[from] drivefs_utils::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error means the remote store answered `404 Not Found`.
    pub fn is_remote_not_found(&self) -> bool {
        matches!(self, Error::RemoteCallFailed { status: 404, .. })
    }

    /// Whether this is one of the not-found kinds surfaced by `stat`/`read`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::StatNotFound(_) | Error::FileNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_failure_displays_status_text() {
        let err = Error::RemoteCallFailed {
            status: 403,
            status_text: "403 Forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "remote call failed: 403 Forbidden");
        assert!(!err.is_remote_not_found());
    }

    #[test]
    fn not_found_kinds() {
        assert!(Error::StatNotFound("/a".into()).is_not_found());
        assert!(Error::FileNotFound("/a".into()).is_not_found());
        assert!(!Error::CreateTargetMissing("/a".into()).is_not_found());
    }

    #[test]
    fn transport_errors_convert() {
        let err: Error = drivefs_utils::error::Error::internal_msg("connection reset").into();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.to_string(), "connection reset");
    }
}
