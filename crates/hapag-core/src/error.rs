//! Error types for hapag-core.
//!
//! Every failure a polling cycle can hit is represented here. None of them are
//! fatal to a poller: a failed cycle marks the dashboard offline and the next
//! tick starts from scratch. [`Error::offline_reason`] maps each error onto the
//! [`OfflineReason`] taxonomy used by the pollers.
//!
//! | Error | Offline reason |
//! |-------|----------------|
//! | [`Error::NotReachable`] | [`OfflineReason::Transport`] |
//! | [`Error::Request`] (decode failure) | [`OfflineReason::Malformed`] |
//! | [`Error::Request`] (other) | [`OfflineReason::Transport`] |
//! | [`Error::Api`] | [`OfflineReason::Transport`] |
//! | [`Error::Malformed`] | [`OfflineReason::Malformed`] |

use std::path::PathBuf;

use thiserror::Error;

use hapag_types::ParseError;

use crate::poller::OfflineReason;

/// Errors that can occur while talking to the dashboard backend or managing
/// local client state.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The backend could not be reached.
    #[error("Backend not reachable at {url}: {source}")]
    NotReachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP request failed after a response started arriving.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The backend answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response parsed but does not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(#[from] ParseError),

    /// Reading or writing the preference store failed.
    #[error("Preference store {path}: {source}")]
    Preferences {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The preference store is not valid JSON.
    #[error("Preference store {path} is corrupt: {source}")]
    PreferencesFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Classify the error for the connection indicator.
    ///
    /// Errors that cannot come out of a fetch are reported as transport
    /// failures.
    #[must_use]
    pub fn offline_reason(&self) -> OfflineReason {
        match self {
            Error::Malformed(_) => OfflineReason::Malformed,
            Error::Request(e) if e.is_decode() => OfflineReason::Malformed,
            _ => OfflineReason::Transport,
        }
    }
}

/// Result type alias using hapag-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
