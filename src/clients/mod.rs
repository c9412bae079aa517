/// Data entities for tracks and response bodies
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Spotify API client
pub mod spotify;

pub use spotify::{SpotifyClient, TopTracksSource};
