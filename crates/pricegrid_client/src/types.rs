use std::fmt;
use std::io;

use pricegrid_core::{SearchFailure, SearchOutcome};
use thiserror::Error;

/// Caller-chosen tag echoed back with the result of a dispatched search.
pub type RequestTag = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SearchCompleted {
        tag: RequestTag,
        query: String,
        result: Result<SearchOutcome, SearchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct SearchError {
    pub kind: FailureKind,
    pub message: String,
}

impl SearchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// True when the request never produced a usable answer from the server.
    pub fn is_connectivity(&self) -> bool {
        !matches!(self.kind, FailureKind::Declined { .. })
    }

    /// Collapses the error into what the state machine distinguishes.
    pub fn into_failure(self) -> SearchFailure {
        match self.kind {
            FailureKind::Declined { message, .. } => SearchFailure::Declined { message },
            _ => SearchFailure::Unreachable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The server answered with `success: false` or a non-2xx status.
    Declined {
        status: u16,
        message: Option<String>,
    },
    /// The body was not a JSON search response.
    InvalidBody,
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Declined { status, message } => match message {
                Some(message) => write!(f, "declined (status {status}): {message}"),
                None => write!(f, "declined (status {status})"),
            },
            FailureKind::InvalidBody => write!(f, "invalid response body"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not build http client: {0}")]
    Client(#[from] SearchError),
    #[error("could not start async runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("search engine is no longer running")]
    Disconnected,
}
