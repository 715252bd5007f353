//! Error taxonomy shared by every command.
//!
//! Each [`Error`] belongs to one [`ErrorKind`], and each kind maps to a
//! sysexits-style process exit code so scripts can tell a bad environment
//! from an unreachable host.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification used for exit codes and log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid configuration, environment, or certificate.
    Config,
    /// Connection, TLS, or timeout failure.
    Transport,
    /// The engine answered, but not with what we expected.
    Protocol,
    /// A collaborator (publisher, file provider, archive writer) failed.
    Delegate,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "configuration",
            ErrorKind::Transport => "transport",
            ErrorKind::Protocol => "protocol",
            ErrorKind::Delegate => "delegate",
        }
    }

    /// Exit code from `sysexits.h`.
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorKind::Config => 78,
            ErrorKind::Transport => 69,
            ErrorKind::Protocol => 76,
            ErrorKind::Delegate => 70,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown server '{0}': no [servers.{0}] entry in config")]
    UnknownServer(String),

    #[error("unknown connector plugin '{0}'")]
    UnknownPlugin(String),

    #[error("invalid client certificate {}: {reason}", path.display())]
    Certificate { path: PathBuf, reason: String },

    #[error("transport error talking to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("protocol error from {url}: {detail}")]
    Protocol { url: String, detail: String },

    #[error("{operation} failed: {detail}")]
    Delegate {
        operation: &'static str,
        detail: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_)
            | Error::UnknownServer(_)
            | Error::UnknownPlugin(_)
            | Error::Certificate { .. } => ErrorKind::Config,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Protocol { .. } => ErrorKind::Protocol,
            Error::Delegate { .. } | Error::Io { .. } | Error::Archive(_) => ErrorKind::Delegate,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }

    /// Fold a collaborator's `anyhow` error into the taxonomy.
    ///
    /// Errors that already carry one of our kinds keep it; anything else
    /// is attributed to the collaborator.
    pub fn from_delegate(operation: &'static str, err: anyhow::Error) -> Self {
        match err.downcast::<Error>() {
            Ok(own) => own,
            Err(other) => Error::Delegate {
                operation,
                detail: format!("{:#}", other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(Error::Config("x".into()).exit_code(), 78);
        assert_eq!(Error::UnknownPlugin("x".into()).exit_code(), 78);
        assert_eq!(
            Error::Protocol {
                url: "u".into(),
                detail: "d".into()
            }
            .exit_code(),
            76
        );
        assert_eq!(
            Error::Delegate {
                operation: "publish schema",
                detail: "boom".into()
            }
            .exit_code(),
            70
        );
    }

    #[test]
    fn from_delegate_keeps_own_kind() {
        let err = anyhow::Error::new(Error::UnknownServer("nope".into()));
        let folded = Error::from_delegate("publish schema", err);
        assert!(matches!(folded, Error::UnknownServer(ref id) if id == "nope"));
        assert_eq!(folded.kind(), ErrorKind::Config);
    }

    #[test]
    fn from_delegate_wraps_foreign_errors_with_context() {
        let err = anyhow::anyhow!("disk full").context("writing schema");
        let folded = Error::from_delegate("publish schema", err);
        assert_eq!(folded.kind(), ErrorKind::Delegate);
        let msg = folded.to_string();
        assert!(msg.contains("publish schema failed"));
        assert!(msg.contains("writing schema"));
        assert!(msg.contains("disk full"));
    }
}
