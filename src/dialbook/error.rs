use std::fmt;
use thiserror::Error;

/// What went wrong on the way to (or back from) the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The gateway could not be reached at all.
    Unreachable,
    /// The gateway answered with a non-2xx status.
    Status,
    /// The gateway answered 2xx but the body was not what we expected.
    Malformed,
    /// No answer arrived within the configured time.
    Timeout,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportErrorKind::Unreachable => "unreachable",
            TransportErrorKind::Status => "status",
            TransportErrorKind::Malformed => "malformed response",
            TransportErrorKind::Timeout => "timeout",
        };
        f.write_str(label)
    }
}

/// Closed error shape for every gateway failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.describe())]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Unreachable,
            status: None,
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Status,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn malformed(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Malformed,
            status,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Timeout,
            status: None,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    fn describe(&self) -> String {
        match self.status {
            Some(code) if self.message.is_empty() => format!("gateway returned {}", code),
            Some(code) => format!("gateway returned {}: {}", code, self.message),
            None => format!("gateway {}: {}", self.kind, self.message),
        }
    }
}

#[derive(Error, Debug)]
pub enum DialbookError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Field '{0}' cannot be changed while editing")]
    ImmutableField(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DialbookError>;
