//! Error type for fetching and parsing MyAnimeList data.

use thiserror::Error;

/// Errors surfaced by the fetch cache and the record parser
#[derive(Debug, Error)]
pub enum Error {
    /// The site answered with a status other than 200 or 429
    #[error("Request to {url} failed with status {status}")]
    Network { url: String, status: u16 },

    /// Every attempt was answered with 429
    #[error("Request to {url} still rate limited after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },

    /// The request never produced a response
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The HTTP client could not be configured
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// A field the record cannot exist without
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A best-effort field; callers normally replace it with a default
    #[error("Missing optional field: {0}")]
    MissingOptionalField(&'static str),

    /// A `my_status` code outside the known table
    #[error("Unmapped watch status code: {0}")]
    UnmappedWatchState(String),

    /// A link that does not point at an anime detail page
    #[error("Not a MyAnimeList anime URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    Selector(String),

    #[error("Failed to parse user list: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error came from talking to the site
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Error::Network { .. } | Error::RetriesExhausted { .. } | Error::Transport { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
