use reqwest::header::{InvalidHeaderName, InvalidHeaderValue};
use std::{fmt::Display, io};
use thiserror::Error;

/// Which of the two compared services an operation was addressed to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Side {
    Old,
    New,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Old => write!(f, "old"),
            Side::New => write!(f, "new"),
        }
    }
}

/// Coarse classification used by callers to decide whether a failure is fatal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    Configuration,
    Resolution,
    Transport,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingConfiguration(Vec<&'static str>),
    #[error("Invalid value for {name}: {value}")]
    InvalidConfiguration { name: &'static str, value: String },
    #[error("Collection {0} was not found")]
    CollectionNotFound(String),
    #[error("Collection {collection_id} could not be loaded (status {status})")]
    CollectionUnavailable { collection_id: String, status: u16 },
    #[error("Request with ID {0} not found in the collection")]
    RequestNotFound(String),
    #[error("Invalid method {0}")]
    UnsupportedMethod(String),
    #[error("Request to the {side} service failed: {source}")]
    Transport {
        side: Side,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid header name")]
    InvalidHeaderName,
    #[error("Invalid header value")]
    InvalidHeaderValue,
    #[error("reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("Json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingConfiguration(_) | Error::InvalidConfiguration { .. } => {
                ErrorKind::Configuration
            }
            Error::CollectionNotFound(_)
            | Error::CollectionUnavailable { .. }
            | Error::RequestNotFound(_)
            | Error::UnsupportedMethod(_)
            | Error::InvalidHeaderName
            | Error::InvalidHeaderValue
            | Error::JsonError(_) => ErrorKind::Resolution,
            Error::Transport { .. } | Error::ReqwestError(_) | Error::IoError(_) => {
                ErrorKind::Transport
            }
        }
    }

    pub(crate) fn transport(side: Side) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Error::Transport { side, source }
    }
}

impl From<InvalidHeaderName> for Error {
    fn from(_: InvalidHeaderName) -> Self {
        Error::InvalidHeaderName
    }
}

impl From<InvalidHeaderValue> for Error {
    fn from(_: InvalidHeaderValue) -> Self {
        Error::InvalidHeaderValue
    }
}
