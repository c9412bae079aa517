use std::net::AddrParseError;

use rspotify::ClientError;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between the proxy, Spotify and the configuration
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream answered with "no content" or an error status
    #[error("Spotify API responded with status {0}")]
    UpstreamStatus(u16),

    /// The top tracks proxy itself answered with a non-success status
    #[error("Top tracks proxy responded with status {0}")]
    ProxyStatus(u16),

    #[error("Top tracks list is empty")]
    NoTracks,

    #[error("Failed to parse Spotify API payload, error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Spotify error: {0}")]
    SpotifyError(#[from] ClientError),

    #[error("Spotify access token unavailable: {0}")]
    TokenUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<AddrParseError> for Error {
    fn from(err: AddrParseError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}
