//! Topdeck - Spotify top tracks proxy and resilient song list
//!
//! The proxy fetches a listener's top tracks from Spotify with server-held
//! credentials and hands out a small normalized list. The dashboard consumes
//! that list and falls back to built-in songs whenever it cannot.

/// Client modules for interacting with Spotify
pub mod clients;
/// Environment driven configuration of the proxy
pub mod config;
/// Song list consumer with a static fallback
pub mod dashboard;
/// HTTP endpoint serving the normalized top tracks
pub mod proxy;
